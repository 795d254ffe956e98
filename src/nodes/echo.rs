use std::collections::HashMap;

use async_trait::async_trait;
use node_plugin::NodeError;
use node_plugin::node::{
    Connection, EditorSpec, NodeDefinition, NodeId, NodeInstance, NodeUiData, PortDescriptor,
    ProcessContext, Project, data_as, try_data_as,
};
use node_plugin::value::{DataType, DataValue, Inputs, Outputs, string_input_or_data};
use schemars::schema::RootSchema;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const ECHO_TYPE: &str = "echo";

const TEXT_PORT: &str = "text";

/// Stored configuration of the echo node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EchoData {
    /// The text passed through when the input toggle is off.
    pub text: String,
    /// Read the text from an input port instead of the stored field.
    pub use_text_input: bool,
}

impl Default for EchoData {
    fn default() -> Self {
        EchoData {
            text: "Hello World".to_string(),
            use_text_input: false,
        }
    }
}

/// Trivial pass-through node: emits its configured (or bound) text unchanged.
/// Runs under any executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoNode;

#[async_trait]
impl NodeDefinition for EchoNode {
    fn type_name(&self) -> &'static str {
        ECHO_TYPE
    }

    fn create(&self) -> NodeInstance {
        let data = serde_json::to_value(EchoData::default()).unwrap_or_else(|_| json!({}));
        NodeInstance::new(ECHO_TYPE, "Echo", data)
    }

    fn input_ports(
        &self,
        data: &Value,
        _connections: &[Connection],
        _nodes: &HashMap<NodeId, NodeInstance>,
        _project: &Project,
    ) -> Vec<PortDescriptor> {
        let data: EchoData = data_as(data);
        let mut ports = Vec::new();
        if data.use_text_input {
            ports.push(PortDescriptor::new(TEXT_PORT, DataType::String, "Text"));
        }
        ports
    }

    fn output_ports(
        &self,
        _data: &Value,
        _connections: &[Connection],
        _nodes: &HashMap<NodeId, NodeInstance>,
        _project: &Project,
    ) -> Vec<PortDescriptor> {
        vec![PortDescriptor::new(TEXT_PORT, DataType::String, "Text")]
    }

    fn ui_data(&self) -> NodeUiData {
        NodeUiData {
            context_menu_title: "Echo",
            group: "Scripting",
            info_box_title: "Echo Node",
            info_box_body: "Passes its configured text through unchanged.",
        }
    }

    fn editors(&self, _data: &Value) -> Vec<EditorSpec> {
        vec![EditorSpec::string("text", "Text").with_input_toggle("useTextInput")]
    }

    fn body(&self, data: &Value) -> String {
        let data: EchoData = data_as(data);
        if data.use_text_input {
            "(using input)".to_string()
        } else {
            data.text
        }
    }

    fn data_schema(&self) -> RootSchema {
        schema_for!(EchoData)
    }

    async fn process(
        &self,
        data: &Value,
        inputs: &Inputs,
        _context: &ProcessContext,
    ) -> Result<Outputs, NodeError> {
        let data: EchoData = try_data_as(data)?;
        let text = string_input_or_data(data.use_text_input, inputs, TEXT_PORT, &data.text)?;

        let mut outputs = Outputs::new();
        outputs.insert(TEXT_PORT.into(), DataValue::String(text));
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_plugin::node::{ExecutorKind, PortId};
    use std::collections::HashSet;

    fn derive_inputs(data: &Value) -> Vec<PortDescriptor> {
        EchoNode.input_ports(data, &[], &HashMap::new(), &Project::default())
    }

    #[test]
    fn text_port_appears_only_when_toggled() {
        assert!(derive_inputs(&json!({"useTextInput": false})).is_empty());

        let ports = derive_inputs(&json!({"useTextInput": true}));
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].id.as_str(), "text");
        assert_eq!(ports[0].data_type, DataType::String);
    }

    #[tokio::test]
    async fn outputs_match_declared_ports() {
        let node = EchoNode;
        let data = serde_json::to_value(EchoData::default()).unwrap();
        let outputs = node
            .process(&data, &Inputs::new(), &ProcessContext::new(ExecutorKind::Embedded))
            .await
            .unwrap();

        let declared: HashSet<PortId> = node
            .output_ports(&data, &[], &HashMap::new(), &Project::default())
            .into_iter()
            .map(|p| p.id)
            .collect();
        let produced: HashSet<PortId> = outputs.keys().cloned().collect();
        assert_eq!(declared, produced);
    }

    #[tokio::test]
    async fn bound_input_wins_over_stored_text() {
        let data = json!({"text": "stored", "useTextInput": true});
        let mut inputs = Inputs::new();
        inputs.insert(PortId::from("text"), DataValue::String("bound".into()));

        let outputs = EchoNode
            .process(&data, &inputs, &ProcessContext::new(ExecutorKind::Native))
            .await
            .unwrap();
        assert_eq!(outputs.get("text"), Some(&DataValue::String("bound".into())));
    }

    #[test]
    fn body_reflects_the_toggle() {
        assert_eq!(EchoNode.body(&json!({"text": "hi"})), "hi");
        assert_eq!(EchoNode.body(&json!({"useTextInput": true})), "(using input)");
        // Unparseable data still summarizes.
        assert_eq!(EchoNode.body(&json!(42)), "Hello World");
    }

    #[test]
    fn create_uses_defaults() {
        let node = EchoNode.create();
        assert_eq!(node.node_type, ECHO_TYPE);
        let data: EchoData = data_as(&node.data);
        assert_eq!(data, EchoData::default());
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::NodeError;
use crate::node::{
    Connection, NodeDefinition, NodeId, NodeInstance, PortDescriptor, ProcessContext, Project,
};
use crate::value::{Inputs, Outputs};

/// All node definitions known to the host, keyed by type tag. Constructed
/// explicitly at startup and handed to whatever orchestrates execution; there
/// is no process-wide registry.
#[derive(Default)]
pub struct NodeRegistry {
    definitions: DashMap<String, Arc<dyn NodeDefinition>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        NodeRegistry {
            definitions: DashMap::new(),
        }
    }

    /// Register one definition. A type tag can be registered only once per
    /// registry.
    pub fn register(&self, definition: Arc<dyn NodeDefinition>) -> Result<(), NodeError> {
        let tag = definition.type_name().to_string();
        if self.definitions.contains_key(&tag) {
            return Err(NodeError::DuplicateNodeType(tag));
        }
        debug!(node_type = %tag, "registered node definition");
        self.definitions.insert(tag, definition);
        Ok(())
    }

    pub fn get(&self, node_type: &str) -> Option<Arc<dyn NodeDefinition>> {
        self.definitions.get(node_type).map(|e| e.value().clone())
    }

    pub fn type_names(&self) -> Vec<String> {
        self.definitions.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn resolve(&self, node_type: &str) -> Result<Arc<dyn NodeDefinition>, NodeError> {
        self.get(node_type)
            .ok_or_else(|| NodeError::UnknownNodeType(node_type.to_string()))
    }

    /// Fresh instance of the given node type with its default configuration.
    pub fn create(&self, node_type: &str) -> Result<NodeInstance, NodeError> {
        Ok(self.resolve(node_type)?.create())
    }

    pub fn input_ports(
        &self,
        node: &NodeInstance,
        connections: &[Connection],
        nodes: &HashMap<NodeId, NodeInstance>,
        project: &Project,
    ) -> Result<Vec<PortDescriptor>, NodeError> {
        Ok(self
            .resolve(&node.node_type)?
            .input_ports(&node.data, connections, nodes, project))
    }

    pub fn output_ports(
        &self,
        node: &NodeInstance,
        connections: &[Connection],
        nodes: &HashMap<NodeId, NodeInstance>,
        project: &Project,
    ) -> Result<Vec<PortDescriptor>, NodeError> {
        Ok(self
            .resolve(&node.node_type)?
            .output_ports(&node.data, connections, nodes, project))
    }

    pub fn body(&self, node: &NodeInstance) -> Result<String, NodeError> {
        Ok(self.resolve(&node.node_type)?.body(&node.data))
    }

    /// Dispatch one processing invocation by the instance's type tag.
    pub async fn process(
        &self,
        node: &NodeInstance,
        inputs: &Inputs,
        context: &ProcessContext,
    ) -> Result<Outputs, NodeError> {
        let definition = self.resolve(&node.node_type)?;
        definition.process(&node.data, inputs, context).await
    }

    /// Schemas of every registered node's `data` record, keyed by type tag.
    pub fn data_schemas(&self) -> HashMap<String, Value> {
        self.definitions
            .iter()
            .map(|e| {
                let schema = serde_json::to_value(e.value().data_schema())
                    .unwrap_or(Value::Null);
                (e.key().clone(), schema)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeUiData, data_as};
    use async_trait::async_trait;
    use schemars::schema::RootSchema;
    use schemars::{JsonSchema, schema_for};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
    #[serde(default)]
    struct NoopData {
        label: String,
    }

    #[derive(Debug)]
    struct NoopNode;

    #[async_trait]
    impl NodeDefinition for NoopNode {
        fn type_name(&self) -> &'static str {
            "noop"
        }

        fn create(&self) -> NodeInstance {
            NodeInstance::new("noop", "Noop", json!({"label": ""}))
        }

        fn input_ports(
            &self,
            _data: &Value,
            _connections: &[Connection],
            _nodes: &HashMap<NodeId, NodeInstance>,
            _project: &Project,
        ) -> Vec<PortDescriptor> {
            Vec::new()
        }

        fn output_ports(
            &self,
            _data: &Value,
            _connections: &[Connection],
            _nodes: &HashMap<NodeId, NodeInstance>,
            _project: &Project,
        ) -> Vec<PortDescriptor> {
            Vec::new()
        }

        fn ui_data(&self) -> NodeUiData {
            NodeUiData {
                context_menu_title: "Noop",
                group: "Test",
                info_box_title: "Noop",
                info_box_body: "Does nothing.",
            }
        }

        fn editors(&self, _data: &Value) -> Vec<crate::node::EditorSpec> {
            Vec::new()
        }

        fn body(&self, data: &Value) -> String {
            let d: NoopData = data_as(data);
            d.label
        }

        fn data_schema(&self) -> RootSchema {
            schema_for!(NoopData)
        }

        async fn process(
            &self,
            _data: &Value,
            _inputs: &Inputs,
            _context: &ProcessContext,
        ) -> Result<Outputs, NodeError> {
            Ok(Outputs::new())
        }
    }

    #[test]
    fn register_and_create() {
        let registry = NodeRegistry::new();
        registry.register(Arc::new(NoopNode)).unwrap();
        let node = registry.create("noop").unwrap();
        assert_eq!(node.node_type, "noop");
        assert_eq!(node.visual.width, 200.0);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = NodeRegistry::new();
        registry.register(Arc::new(NoopNode)).unwrap();
        let err = registry.register(Arc::new(NoopNode)).unwrap_err();
        assert!(matches!(err, NodeError::DuplicateNodeType(t) if t == "noop"));
    }

    #[tokio::test]
    async fn unknown_type_dispatch_fails() {
        let registry = NodeRegistry::new();
        let node = NodeInstance::new("missing", "Missing", json!({}));
        let err = registry
            .process(&node, &Inputs::new(), &ProcessContext::new(crate::node::ExecutorKind::Embedded))
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::UnknownNodeType(t) if t == "missing"));
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use node_plugin::NodeError;
use node_plugin::node::{
    Connection, EditorSpec, ExecutorKind, NodeDefinition, NodeId, NodeInstance, NodeUiData,
    PortDescriptor, ProcessContext, Project, data_as, try_data_as,
};
use node_plugin::value::{DataType, DataValue, Inputs, Outputs, string_input_or_data};
use schemars::schema::RootSchema;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::PYTHON_PATH_OPTION;
use crate::native::NativeEntry;
use crate::util::split_args;

pub const RUN_SCRIPT_TYPE: &str = "runScript";

const SCRIPT_PATH_PORT: &str = "scriptPath";
const ARGUMENTS_PORT: &str = "arguments";
const OUTPUT_PORT: &str = "output";

/// Stored configuration of the run-script node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RunScriptData {
    /// Path of the script to run. Empty runs the built-in default script.
    pub script_path: String,
    /// Take the script path from an input port instead.
    pub use_script_path_input: bool,
    /// Raw argument string, tokenized before invocation.
    pub arguments: String,
    /// Take the arguments from an input port instead.
    pub use_arguments_input: bool,
}

/// The argument vector for one invocation: a bound array binds as-is, a bound
/// scalar is tokenized like the stored argument string.
fn resolve_args(data: &RunScriptData, inputs: &Inputs) -> Result<Vec<String>, NodeError> {
    match (data.use_arguments_input, inputs.get(ARGUMENTS_PORT)) {
        (true, Some(value)) => {
            if value.data_type().is_array() {
                value.clone().into_string_list()
            } else {
                Ok(split_args(&value.clone().into_string()?))
            }
        }
        _ => Ok(split_args(&data.arguments)),
    }
}

/// Runs an external script through the native entry and emits its captured
/// standard output. Only valid under the native executor.
#[derive(Debug, Clone, Default)]
pub struct RunScriptNode {
    entry: NativeEntry,
}

impl RunScriptNode {
    pub fn new() -> Self {
        RunScriptNode::default()
    }

    /// Use a pinned native entry location (hosts and tests).
    pub fn with_entry(entry: NativeEntry) -> Self {
        RunScriptNode { entry }
    }
}

#[async_trait]
impl NodeDefinition for RunScriptNode {
    fn type_name(&self) -> &'static str {
        RUN_SCRIPT_TYPE
    }

    fn create(&self) -> NodeInstance {
        let data = serde_json::to_value(RunScriptData::default()).unwrap_or_else(|_| json!({}));
        NodeInstance::new(RUN_SCRIPT_TYPE, "Run Script", data)
    }

    fn input_ports(
        &self,
        data: &Value,
        _connections: &[Connection],
        _nodes: &HashMap<NodeId, NodeInstance>,
        _project: &Project,
    ) -> Vec<PortDescriptor> {
        let data: RunScriptData = data_as(data);
        let mut ports = Vec::new();
        if data.use_script_path_input {
            ports.push(PortDescriptor::new(
                SCRIPT_PATH_PORT,
                DataType::String,
                "Script Path",
            ));
        }
        if data.use_arguments_input {
            ports.push(PortDescriptor::new(
                ARGUMENTS_PORT,
                DataType::StringList,
                "Arguments",
            ));
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
        vec![PortDescriptor::new(OUTPUT_PORT, DataType::String, "Output")]
    }

    fn ui_data(&self) -> NodeUiData {
        NodeUiData {
            context_menu_title: "Run Script",
            group: "Scripting",
            info_box_title: "Run Script Node",
            info_box_body: "Runs an external script and captures its standard output.",
        }
    }

    fn editors(&self, _data: &Value) -> Vec<EditorSpec> {
        vec![
            EditorSpec::string("scriptPath", "Script Path").with_input_toggle("useScriptPathInput"),
            EditorSpec::string("arguments", "Arguments").with_input_toggle("useArgumentsInput"),
        ]
    }

    fn body(&self, data: &Value) -> String {
        let data: RunScriptData = data_as(data);
        format!("{} {}", data.script_path, data.arguments)
            .trim()
            .to_string()
    }

    fn data_schema(&self) -> RootSchema {
        schema_for!(RunScriptData)
    }

    #[tracing::instrument(name = "run_script_process", skip(self, data, inputs, context))]
    async fn process(
        &self,
        data: &Value,
        inputs: &Inputs,
        context: &ProcessContext,
    ) -> Result<Outputs, NodeError> {
        if context.executor() != ExecutorKind::Native {
            return Err(NodeError::UnsupportedExecutor {
                required: ExecutorKind::Native,
                actual: context.executor(),
            });
        }

        let data: RunScriptData = try_data_as(data)?;

        let script_path = string_input_or_data(
            data.use_script_path_input,
            inputs,
            SCRIPT_PATH_PORT,
            &data.script_path,
        )?;
        let args = resolve_args(&data, inputs)?;

        let interpreter = context.config(PYTHON_PATH_OPTION).filter(|p| !p.is_empty());
        let output = self
            .entry
            .run_script(&script_path, &args, interpreter)
            .await?;

        let mut outputs = Outputs::new();
        outputs.insert(OUTPUT_PORT.into(), DataValue::String(output));
        Ok(outputs)
    }
}

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::NodeError;
use crate::value::{DataType, Inputs, Outputs};

/// Opaque node-instance identifier, generated once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn generate() -> Self {
        NodeId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named connection point on a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PortId(String);

impl PortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PortId {
    fn from(id: &str) -> Self {
        PortId(id.to_string())
    }
}

impl From<String> for PortId {
    fn from(id: String) -> Self {
        PortId(id)
    }
}

impl Borrow<str> for PortId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-owned placement of a node on the canvas. Opaque to processing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VisualData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Default for VisualData {
    fn default() -> Self {
        VisualData {
            x: 0.0,
            y: 0.0,
            width: 200.0,
        }
    }
}

/// One configured node placed in a graph. `data` is a plain key/value record
/// whose shape is node-type-specific; it is mutated only through the host's
/// editor, never by processing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeInstance {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub data: Value,
    pub visual: VisualData,
}

impl NodeInstance {
    pub fn new(node_type: impl Into<String>, title: impl Into<String>, data: Value) -> Self {
        NodeInstance {
            id: NodeId::generate(),
            node_type: node_type.into(),
            title: title.into(),
            data,
            visual: VisualData::default(),
        }
    }
}

/// An input or output port derived from a node's current configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PortDescriptor {
    pub id: PortId,
    pub data_type: DataType,
    pub title: String,
}

impl PortDescriptor {
    pub fn new(id: &str, data_type: DataType, title: &str) -> Self {
        PortDescriptor {
            id: PortId::from(id),
            data_type,
            title: title.to_string(),
        }
    }
}

/// A wire between two node ports, as the host stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub output_node: NodeId,
    pub output_port: PortId,
    pub input_node: NodeId,
    pub input_port: PortId,
}

/// Slim view of the enclosing project, passed to port derivation for
/// advanced use only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Static presentation strings; never affect execution semantics.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NodeUiData {
    pub context_menu_title: &'static str,
    pub group: &'static str,
    pub info_box_title: &'static str,
    pub info_box_body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    String,
}

/// Describes one entry of the host's configuration UI for a node. Purely
/// descriptive; processing never consults it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EditorSpec {
    pub kind: EditorKind,
    pub data_key: &'static str,
    pub label: &'static str,
    pub use_input_toggle_key: Option<&'static str>,
}

impl EditorSpec {
    pub fn string(data_key: &'static str, label: &'static str) -> Self {
        EditorSpec {
            kind: EditorKind::String,
            data_key,
            label,
            use_input_toggle_key: None,
        }
    }

    pub fn with_input_toggle(mut self, toggle_key: &'static str) -> Self {
        self.use_input_toggle_key = Some(toggle_key);
        self
    }
}

/// The runtime environment a processing function is invoked under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExecutorKind {
    /// Full OS access: may spawn processes and touch the filesystem.
    Native,
    /// The host's embedded, sandboxed runtime.
    Embedded,
}

/// Read-only per-invocation context. Nodes must consult `executor()` before
/// assuming native capability is available.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    executor: ExecutorKind,
    plugin_config: HashMap<String, String>,
}

impl ProcessContext {
    pub fn new(executor: ExecutorKind) -> Self {
        ProcessContext {
            executor,
            plugin_config: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: HashMap<String, String>) -> Self {
        self.plugin_config = config;
        self
    }

    pub fn executor(&self) -> ExecutorKind {
        self.executor
    }

    /// Host-supplied value for one of the plugin's configuration options.
    pub fn config(&self, key: &str) -> Option<&str> {
        self.plugin_config.get(key).map(String::as_str)
    }
}

/// Everything the host needs to place, configure, connect and run one kind of
/// node. `process` is the only operation permitted side effects.
#[async_trait]
pub trait NodeDefinition: Send + Sync {
    /// Type tag, unique within the plugin's namespace.
    fn type_name(&self) -> &'static str;

    /// Fresh instance with default configuration. Deterministic apart from
    /// id generation.
    fn create(&self) -> NodeInstance;

    /// Input ports for the given configuration. Pure; ids must be unique
    /// within the returned sequence.
    fn input_ports(
        &self,
        data: &Value,
        connections: &[Connection],
        nodes: &HashMap<NodeId, NodeInstance>,
        project: &Project,
    ) -> Vec<PortDescriptor>;

    /// Output ports for the given configuration. Pure. A successful `process`
    /// result carries exactly these ids as its key set.
    fn output_ports(
        &self,
        data: &Value,
        connections: &[Connection],
        nodes: &HashMap<NodeId, NodeInstance>,
        project: &Project,
    ) -> Vec<PortDescriptor>;

    /// Constant per definition.
    fn ui_data(&self) -> NodeUiData;

    /// Configuration UI description. Pure; unused at processing time.
    fn editors(&self, data: &Value) -> Vec<EditorSpec>;

    /// At-a-glance summary of the configuration. Must complete synchronously
    /// and never fail for any stored configuration.
    fn body(&self, data: &Value) -> String;

    /// JSON schema of this node's `data` record.
    fn data_schema(&self) -> RootSchema;

    async fn process(
        &self,
        data: &Value,
        inputs: &Inputs,
        context: &ProcessContext,
    ) -> Result<Outputs, NodeError>;
}

/// Lenient view of a node's `data`: unknown shapes fall back to the node's
/// defaults. Used by the pure derivation functions, which must not fail.
pub fn data_as<T: DeserializeOwned + Default>(data: &Value) -> T {
    serde_json::from_value(data.clone()).unwrap_or_default()
}

/// Strict view of a node's `data`, for `process`.
pub fn try_data_as<T: DeserializeOwned>(data: &Value) -> Result<T, NodeError> {
    serde_json::from_value(data.clone()).map_err(|e| NodeError::InvalidConfig(e.to_string()))
}

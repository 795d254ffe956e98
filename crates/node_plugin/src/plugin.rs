use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::registry::NodeRegistry;

/// Kinds of host-side configuration editors for plugin options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
}

/// One host-level configuration option exposed by a plugin.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigOptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    pub label: &'static str,
    pub description: &'static str,
    pub helper_text: &'static str,
}

/// A context-menu group the plugin's nodes appear under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuGroup {
    pub id: &'static str,
    pub label: &'static str,
}

/// Identity and host-facing surface of a plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PluginManifest {
    pub id: &'static str,
    pub name: &'static str,
    pub options: Vec<ConfigOptionSpec>,
    pub groups: Vec<MenuGroup>,
}

/// One activatable plugin: a manifest plus its node definitions. The host
/// calls `register` exactly once per activation.
pub trait NodePlugin: Send + Sync {
    fn manifest(&self) -> PluginManifest;
    fn register(&self, registry: &NodeRegistry) -> Result<(), NodeError>;
}

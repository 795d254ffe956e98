//! Portable artifact of the script_nodes plugin: node definitions and all
//! pure logic. Native capability is reached only through the deferred
//! dispatch in [`native`], after an executor check, so this crate stays
//! loadable inside sandboxed hosts.

pub mod native;
pub mod nodes;
pub mod util;

use std::sync::Arc;

use node_plugin::NodeError;
use node_plugin::plugin::{ConfigOptionSpec, MenuGroup, NodePlugin, OptionKind, PluginManifest};
use node_plugin::registry::NodeRegistry;
use tracing::info;

pub use nodes::{EchoNode, RunScriptNode};

pub const PLUGIN_ID: &str = "script-nodes";

/// Plugin option holding the interpreter path the run-script node forwards to
/// the native entry.
pub const PYTHON_PATH_OPTION: &str = "pythonPath";

pub struct ScriptNodesPlugin;

impl NodePlugin for ScriptNodesPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest {
            id: PLUGIN_ID,
            name: "Script Nodes",
            options: vec![ConfigOptionSpec {
                key: PYTHON_PATH_OPTION,
                kind: OptionKind::String,
                label: "Python Path",
                description: "Interpreter used by the Run Script node.",
                helper_text: "Leave empty to use python3 from PATH.",
            }],
            groups: vec![MenuGroup {
                id: "scripting",
                label: "Scripting",
            }],
        }
    }

    fn register(&self, registry: &NodeRegistry) -> Result<(), NodeError> {
        registry.register(Arc::new(EchoNode))?;
        registry.register(Arc::new(RunScriptNode::new()))?;
        info!(plugin = PLUGIN_ID, "registered node definitions");
        Ok(())
    }
}

/// Factory the host calls when activating the plugin.
pub fn plugin() -> ScriptNodesPlugin {
    ScriptNodesPlugin
}

mod echo;
mod run_script;

pub use echo::{ECHO_TYPE, EchoData, EchoNode};
pub use run_script::{RUN_SCRIPT_TYPE, RunScriptData, RunScriptNode};

//! External script invocation: run an interpreter against a script path and
//! capture its standard output. The result exists only once the process has
//! fully exited; partial output is never streamed and no timeout is applied.

use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use node_plugin::jsonrpc::{self, RunScriptParams, codes};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Interpreter override, consulted when the request carries none.
pub const INTERPRETER_ENV: &str = "SCRIPT_NODES_PYTHON";
/// Override for the script run when the request's path is empty.
pub const DEFAULT_SCRIPT_ENV: &str = "SCRIPT_NODES_DEFAULT_SCRIPT";

const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_SCRIPT: &str = "python-script.py";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("interpreter `{interpreter}` could not be launched: {reason}")]
    InterpreterNotFound { interpreter: String, reason: String },

    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("script exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("i/o failure while running script: {0}")]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    pub fn code(&self) -> i64 {
        match self {
            ScriptError::InterpreterNotFound { .. } => codes::INTERPRETER_NOT_FOUND,
            ScriptError::ScriptNotFound(_) => codes::SCRIPT_NOT_FOUND,
            ScriptError::Failed { .. } | ScriptError::Io(_) => codes::SCRIPT_FAILED,
        }
    }

    pub fn into_rpc(self) -> jsonrpc::Error {
        jsonrpc::Error::new(self.code(), self.to_string())
    }
}

/// Entry point for the `runScript` method.
#[instrument(skip(params), fields(script = %params.script_path))]
pub async fn run_script(params: &RunScriptParams) -> Result<String, ScriptError> {
    let interpreter = params
        .interpreter
        .clone()
        .or_else(|| env::var(INTERPRETER_ENV).ok())
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());
    let path = if params.script_path.is_empty() {
        default_script_path()
    } else {
        PathBuf::from(&params.script_path)
    };
    invoke(&interpreter, &path, &params.args).await
}

/// The script used when no path is configured: an env override, then
/// `scripts/python-script.py` beside the executable, then CWD-relative.
fn default_script_path() -> PathBuf {
    if let Ok(path) = env::var(DEFAULT_SCRIPT_ENV) {
        return PathBuf::from(path);
    }
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join("scripts").join(DEFAULT_SCRIPT);
            if candidate.exists() {
                return candidate;
            }
        }
    }
    PathBuf::from("scripts").join(DEFAULT_SCRIPT)
}

pub(crate) async fn invoke(
    interpreter: &str,
    path: &Path,
    args: &[String],
) -> Result<String, ScriptError> {
    if !path.exists() {
        return Err(ScriptError::ScriptNotFound(path.to_path_buf()));
    }
    debug!(%interpreter, path = %path.display(), ?args, "spawning script");

    let output = Command::new(interpreter)
        .arg(path)
        .args(args)
        .output()
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ScriptError::InterpreterNotFound {
                interpreter: interpreter.to_string(),
                reason: e.to_string(),
            },
            _ => ScriptError::Io(e),
        })?;

    if !output.status.success() {
        return Err(ScriptError::Failed {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout
        .strip_suffix("\r\n")
        .or_else(|| stdout.strip_suffix('\n'))
        .unwrap_or(&stdout);
    Ok(stdout.to_string())
}

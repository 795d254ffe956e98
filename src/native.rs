//! Deferred dispatch to the native artifact. Nothing here runs at load time:
//! the artifact is located and spawned per call, and only after the calling
//! node has checked the executor supports native capability.

use std::env;
use std::path::PathBuf;
use std::process::Stdio;

use node_plugin::NodeError;
use node_plugin::jsonrpc::{Id, Method, Request, Response, RunScriptParams, RunScriptResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Overrides where the native entry executable is looked up.
pub const NATIVE_ENTRY_ENV: &str = "SCRIPT_NODES_NATIVE_ENTRY";

const NATIVE_ENTRY_BIN: &str = "native_entry";

/// Handle to the separately-built native artifact.
#[derive(Debug, Clone, Default)]
pub struct NativeEntry {
    override_path: Option<PathBuf>,
}

impl NativeEntry {
    pub fn new() -> Self {
        NativeEntry::default()
    }

    /// Pin the artifact to an explicit location instead of resolving it.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        NativeEntry {
            override_path: Some(path.into()),
        }
    }

    /// Resolve the artifact's location. Called per invocation; a missing
    /// artifact is a load failure of that invocation, never of plugin load.
    fn locate(&self) -> Result<PathBuf, NodeError> {
        if let Some(path) = &self.override_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(NodeError::DeferredLoad(format!(
                "no native entry at {}",
                path.display()
            )));
        }

        if let Ok(path) = env::var(NATIVE_ENTRY_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
            return Err(NodeError::DeferredLoad(format!(
                "{NATIVE_ENTRY_ENV} points at {}, which does not exist",
                path.display()
            )));
        }

        let exe = env::current_exe()
            .map_err(|e| NodeError::DeferredLoad(format!("cannot resolve current executable: {e}")))?;
        let candidate = exe
            .parent()
            .map(|dir| dir.join(format!("{NATIVE_ENTRY_BIN}{}", env::consts::EXE_SUFFIX)));
        match candidate {
            Some(path) if path.exists() => Ok(path),
            Some(path) => Err(NodeError::DeferredLoad(format!(
                "no native entry beside the host executable ({})",
                path.display()
            ))),
            None => Err(NodeError::DeferredLoad(
                "host executable has no parent directory".to_string(),
            )),
        }
    }

    /// Run one script through the native artifact and return its captured
    /// standard output. One request, one response, then the child is reaped;
    /// no timeout is applied and cancellation is left to the host.
    pub async fn run_script(
        &self,
        script_path: &str,
        args: &[String],
        interpreter: Option<&str>,
    ) -> Result<String, NodeError> {
        let entry = self.locate()?;
        debug!(entry = %entry.display(), script = script_path, "invoking native entry");

        let params = RunScriptParams {
            script_path: script_path.to_string(),
            args: args.to_vec(),
            interpreter: interpreter.map(str::to_string),
        };
        let request = Request::call(
            Id::Number(1),
            Method::RunScript,
            Some(
                serde_json::to_value(&params)
                    .map_err(|e| NodeError::Internal(e.to_string()))?,
            ),
        );

        let mut child = Command::new(&entry)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                NodeError::DeferredLoad(format!("failed to launch {}: {e}", entry.display()))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| NodeError::Internal("native entry stdin unavailable".to_string()))?;
        let mut line = serde_json::to_string(&request)
            .map_err(|e| NodeError::Internal(e.to_string()))?;
        line.push('\n');
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| NodeError::NativeProcess(format!("failed to send request: {e}")))?;
        // Closing stdin lets the entry exit once it has answered.
        drop(stdin);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| NodeError::Internal("native entry stdout unavailable".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();
        let reply = lines
            .next_line()
            .await
            .map_err(|e| NodeError::DeferredLoad(format!("native entry gave no response: {e}")))?
            .ok_or_else(|| {
                NodeError::DeferredLoad("native entry closed without a response".to_string())
            })?;
        let _ = child.wait().await;

        let response: Response = serde_json::from_str(&reply).map_err(|e| {
            NodeError::DeferredLoad(format!("malformed response from native entry: {e}"))
        })?;
        if let Some(error) = response.error {
            return Err(NodeError::NativeProcess(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }
        let result: RunScriptResult = response
            .result
            .ok_or_else(|| NodeError::DeferredLoad("response carried no result".to_string()))
            .and_then(|v| {
                serde_json::from_value(v).map_err(|e| {
                    NodeError::DeferredLoad(format!("unexpected result shape: {e}"))
                })
            })?;
        Ok(result.output)
    }
}

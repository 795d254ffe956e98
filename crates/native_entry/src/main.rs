//! Native artifact of the script_nodes plugin. Serves `runScript` over
//! line-delimited JSON-RPC on stdin/stdout; built and shipped separately from
//! the portable artifact, which resolves it at call time.

mod logging;
mod script;

use anyhow::Result;
use async_trait::async_trait;
use node_plugin::jsonrpc::{Error, Method, RunScriptParams, RunScriptResult, VersionResult, codes};
use node_plugin::runtime::{self, NativeHandler};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct ScriptEntry;

#[async_trait]
impl NativeHandler for ScriptEntry {
    async fn handle(&self, method: Method, params: Option<Value>) -> Result<Value, Error> {
        match method {
            Method::Version => to_wire(VersionResult {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            Method::RunScript => {
                let params: RunScriptParams = params
                    .ok_or_else(|| Error::new(codes::INVALID_PARAMS, "missing params"))
                    .and_then(|v| {
                        serde_json::from_value(v)
                            .map_err(|e| Error::new(codes::INVALID_PARAMS, e.to_string()))
                    })?;
                let output = script::run_script(&params).await.map_err(script::ScriptError::into_rpc)?;
                to_wire(RunScriptResult { output })
            }
        }
    }
}

fn to_wire<T: serde::Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::new(codes::INTERNAL_ERROR, e.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    info!(version = env!("CARGO_PKG_VERSION"), "native entry listening on stdio");
    runtime::serve(ScriptEntry).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_plugin::runtime::handle_line;
    use serde_json::json;

    #[tokio::test]
    async fn version_answers() {
        let resp = handle_line(&ScriptEntry, r#"{"jsonrpc":"2.0","method":"version","id":1}"#)
            .await
            .unwrap();
        assert_eq!(
            resp.result.unwrap()["version"],
            json!(env!("CARGO_PKG_VERSION"))
        );
    }

    #[tokio::test]
    async fn run_script_requires_params() {
        let resp = handle_line(&ScriptEntry, r#"{"jsonrpc":"2.0","method":"runScript","id":2}"#)
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn run_script_reports_missing_script() {
        let req = json!({
            "jsonrpc": "2.0",
            "method": "runScript",
            "params": {"scriptPath": "/definitely/not/here.py", "args": []},
            "id": 3
        });
        let resp = handle_line(&ScriptEntry, &req.to_string()).await.unwrap();
        assert_eq!(resp.error.unwrap().code, codes::SCRIPT_NOT_FOUND);
    }
}

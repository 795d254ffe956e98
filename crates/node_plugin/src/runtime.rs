//! Stdio loop run by the native entry: one JSON-RPC request per line on
//! stdin, one response per line on stdout. Logging must never write to
//! stdout, which is reserved for the protocol.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, warn};

use crate::jsonrpc::{Error, Id, Method, Request, Response, codes};

/// Implemented by the native artifact; one call per incoming request.
#[async_trait]
pub trait NativeHandler: Send + Sync + 'static {
    async fn handle(&self, method: Method, params: Option<Value>) -> Result<Value, Error>;
}

/// Dispatch one wire line. Returns `None` for blank lines and notifications.
pub async fn handle_line<H: NativeHandler>(handler: &H, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let req: Request = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            return Some(Response::fail(
                Id::Null,
                Error::new(codes::PARSE_ERROR, format!("invalid request: {e}")),
            ));
        }
    };
    let id = req.id;
    let method = match req.method.parse::<Method>() {
        Ok(m) => m,
        Err(_) => {
            warn!(method = %req.method, "request for unknown method");
            return id.map(|id| {
                Response::fail(
                    id,
                    Error::new(
                        codes::METHOD_NOT_FOUND,
                        format!("unknown method: {}", req.method),
                    ),
                )
            });
        }
    };
    debug!(%method, "dispatching request");
    let outcome = handler.handle(method, req.params).await;
    let id = id?;
    Some(match outcome {
        Ok(result) => Response::success(id, result),
        Err(error) => Response::fail(id, error),
    })
}

/// Serve requests until stdin reaches EOF.
pub async fn serve<H: NativeHandler>(handler: H) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = BufWriter::new(io::stdout());

    while let Some(line) = lines.next_line().await? {
        if let Some(response) = handle_line(&handler, &line).await {
            let mut out = serde_json::to_string(&response)?;
            out.push('\n');
            stdout.write_all(out.as_bytes()).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

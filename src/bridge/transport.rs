//! Line-delimited JSON transport for a [`MethodChannel`].
//!
//! Each input line is one call:
//!
//! ```text
//! {"id": 7, "channel": "fcode/image_clipboard", "method": "copyImage", "arguments": {"path": "/tmp/a.png"}}
//! ```
//!
//! and produces exactly one output line echoing the `id`:
//!
//! ```text
//! {"id": 7, "status": "success", "result": null}
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use super::channel::{MethodCall, MethodChannel, MethodResult};
use super::errors::BridgeError;

#[derive(Debug, Deserialize)]
struct CallEnvelope {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    channel: Option<String>,
    #[serde(flatten)]
    call: MethodCall,
}

#[derive(Debug, Serialize)]
struct ReplyEnvelope {
    id: Value,
    #[serde(flatten)]
    result: MethodResult,
}

/// Best-effort `id` from a line that failed to parse as a call.
fn recover_id(line: &[u8]) -> Value {
    serde_json::from_slice::<Value>(line)
        .ok()
        .and_then(|value| value.get("id").cloned())
        .unwrap_or(Value::Null)
}

/// Answer one request line.
async fn handle_line(channel: &Arc<MethodChannel>, line: &[u8]) -> ReplyEnvelope {
    let envelope: CallEnvelope = match serde_json::from_slice(line) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Rejecting malformed call");
            return ReplyEnvelope {
                id: recover_id(line),
                result: MethodResult::error(BridgeError::malformed_call(e.to_string())),
            };
        }
    };

    if let Some(name) = envelope.channel.as_deref() {
        if name != channel.name() {
            debug!(requested = %name, served = %channel.name(), "Call addressed to another channel");
            return ReplyEnvelope {
                id: envelope.id,
                result: MethodResult::NotImplemented,
            };
        }
    }

    let call = envelope.call;
    let method = call.method.clone();
    let worker = Arc::clone(channel);
    let result = match tokio::task::spawn_blocking(move || worker.invoke(&call)).await {
        Ok(result) => result,
        Err(e) => {
            error!(method = %method, error = %e, "Method handler panicked");
            MethodResult::error(BridgeError::internal("Method handler failed"))
        }
    };

    ReplyEnvelope {
        id: envelope.id,
        result,
    }
}

/// Serve calls from `reader` until EOF, writing one reply line per call.
///
/// Lines are handled as raw bytes, so invalid UTF-8 gets a `MALFORMED_CALL`
/// reply instead of ending the loop. Returns the number of calls answered.
pub async fn serve<R, W>(channel: Arc<MethodChannel>, mut reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(channel = %channel.name(), methods = ?channel.methods(), "Method channel listening");

    let mut line = Vec::new();
    let mut answered = 0;

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .context("Failed to read call")?;
        if read == 0 {
            break;
        }
        if line.trim_ascii().is_empty() {
            continue;
        }

        let reply = handle_line(&channel, line.trim_ascii()).await;
        let mut encoded = serde_json::to_vec(&reply).context("Failed to encode reply")?;
        encoded.push(b'\n');

        writer.write_all(&encoded).await.context("Failed to write reply")?;
        writer.flush().await.context("Failed to flush reply")?;
        answered += 1;
    }

    info!(answered, "Method channel input closed");
    Ok(answered)
}

/// Serve the channel on the process's stdin and stdout.
pub async fn serve_stdio(channel: Arc<MethodChannel>) -> Result<usize> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(channel, stdin, tokio::io::stdout()).await
}

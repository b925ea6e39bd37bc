use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use s3lens_core::api as core_api;

use crate::error::CliError;

#[derive(Serialize)]
struct ServeReply {
    output: String,
}

/// One `CommandRequest` per stdin line, one `{"output": ...}` per stdout line.
/// Malformed lines get an error reply; the loop only ends at EOF.
pub async fn handle_serve(dispatcher: &core_api::CommandDispatcher) -> Result<(), CliError> {
    let mut stdout = tokio::io::stdout();
    let served = serve_lines(dispatcher, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    tracing::info!(target: "s3lens.serve", served, "stdin closed, serve loop finished");
    Ok(())
}

/// Blank lines are skipped; every other line gets exactly one reply line.
pub async fn serve_lines<R, W>(
    dispatcher: &core_api::CommandDispatcher,
    reader: R,
    writer: &mut W,
) -> Result<usize, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut served = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let output = reply_for_line(dispatcher, &line).await;
        let mut encoded = serde_json::to_string(&ServeReply { output })
            .map_err(|e| CliError::Command(format!("failed to encode reply: {e}")))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        served += 1;
    }

    Ok(served)
}

async fn reply_for_line(dispatcher: &core_api::CommandDispatcher, line: &str) -> String {
    match serde_json::from_str::<core_api::CommandRequest>(line) {
        Ok(req) => dispatcher.invoke_request(&req).await,
        Err(e) => {
            tracing::warn!(target: "s3lens.serve", error = %e, "malformed request line");
            format!("RequestError: malformed request: {e}")
        }
    }
}

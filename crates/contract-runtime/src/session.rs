//! # Line Session
//!
//! One JSON invocation per input line, one JSON response per output line.
//! A line that is not UTF-8 or not a valid invocation is answered with a
//! serialization error and the session continues.

use lc_01_world_state::Ledger;
use shared_types::errors::ContractError;
use shared_types::invocation::{Invocation, Response};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::runtime::ContractRuntime;

/// Parse one input line, without its terminator.
pub fn decode_line(line: &[u8]) -> Result<Invocation, ContractError> {
    serde_json::from_slice(line).map_err(ContractError::from)
}

fn trim_line(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    let start = line[..end]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(end);
    &line[start..end]
}

/// Answer every line of `input` on `output` until end of input. Returns the
/// number of responses written. Only I/O failures end the session early.
pub async fn serve_lines<L, R, W>(
    runtime: &ContractRuntime<L>,
    mut input: R,
    mut output: W,
) -> std::io::Result<usize>
where
    L: Ledger,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut answered = 0;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = trim_line(&buf);
        if line.is_empty() {
            continue;
        }

        let response = match decode_line(line) {
            Ok(invocation) => runtime.invoke(invocation).await,
            Err(err) => {
                warn!(error = %err, "Rejected malformed invocation");
                Response::from_error(&err)
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        output.write_all(&out).await?;
        output.flush().await?;
        answered += 1;
    }

    Ok(answered)
}

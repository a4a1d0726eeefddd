//! # Serve Loop
//!
//! Reads requests line by line and writes one reply per request, flushing
//! after each so a caller can work in lockstep. Stops at end of input or
//! when `shutdown` resolves.

use crate::handlers::handle_line;
use provenance_core::{DispatchStats, ProvenanceApi, Router};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

pub async fn serve<A, R, W, S>(
    router: &Router<A>,
    input: R,
    mut output: W,
    shutdown: S,
) -> anyhow::Result<DispatchStats>
where
    A: ProvenanceApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                if let Some(reply) = handle_line(router, &line) {
                    let mut encoded = serde_json::to_vec(&reply)?;
                    encoded.push(b'\n');
                    output.write_all(&encoded).await?;
                    output.flush().await?;
                }
            }
        }
    }

    Ok(router.stats())
}

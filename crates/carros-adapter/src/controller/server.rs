//! Line-delimited RPC server over stdio or TCP

use std::future::Future;
use std::net::SocketAddr;

use carros_domain::CarRepository;
use shared::{CarrosError, Result};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use super::rpc::{oversized_frame, CarsEndpoint};

/// Longest request line accepted, excluding the newline
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Serve one connection until the reader hits EOF.
///
/// Requests on a connection are answered in order.
pub async fn serve_connection<R, Rd, W>(
    endpoint: &CarsEndpoint<R>,
    reader: Rd,
    writer: W,
) -> Result<()>
where
    R: CarRepository,
    Rd: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    serve_connection_with_limit(endpoint, reader, writer, MAX_FRAME_BYTES).await
}

/// [`serve_connection`] with an explicit line length limit.
///
/// A longer line is discarded up to its newline and answered with an
/// invalid request error; the connection stays open.
pub async fn serve_connection_with_limit<R, Rd, W>(
    endpoint: &CarsEndpoint<R>,
    reader: Rd,
    mut writer: W,
    max_frame_bytes: usize,
) -> Result<()>
where
    R: CarRepository,
    Rd: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut frame = Vec::new();

    while let Some(read) = read_frame(&mut reader, &mut frame, max_frame_bytes).await? {
        let response = match read {
            Frame::Complete => endpoint.handle_frame(&frame),
            Frame::Oversized => {
                warn!(limit = max_frame_bytes, "Dropped oversized RPC line");
                oversized_frame(max_frame_bytes)
            }
        };

        if let Some(response) = response {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}

enum Frame {
    Complete,
    Oversized,
}

/// Read up to the next newline into `frame`, never buffering more than
/// `limit` bytes. `None` at EOF with nothing pending.
async fn read_frame<Rd>(
    reader: &mut Rd,
    frame: &mut Vec<u8>,
    limit: usize,
) -> std::io::Result<Option<Frame>>
where
    Rd: AsyncBufRead + Unpin,
{
    frame.clear();
    let mut oversized = false;
    let mut pending = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (pending, oversized) {
                (false, _) => None,
                (true, true) => Some(Frame::Oversized),
                (true, false) => Some(Frame::Complete),
            });
        }
        pending = true;

        let (chunk, consumed, done) = match available.iter().position(|&b| b == b'\n') {
            Some(end) => (&available[..end], end + 1, true),
            None => (available, available.len(), false),
        };

        if !oversized {
            if frame.len() + chunk.len() > limit {
                oversized = true;
                frame.clear();
            } else {
                frame.extend_from_slice(chunk);
            }
        }
        reader.consume(consumed);

        if done {
            return Ok(Some(if oversized {
                Frame::Oversized
            } else {
                Frame::Complete
            }));
        }
    }
}

/// Serve on this process's stdin/stdout
pub async fn serve_stdio<R: CarRepository>(endpoint: CarsEndpoint<R>) -> Result<()> {
    info!("Serving JSON-RPC on stdio");
    serve_connection(&endpoint, tokio::io::stdin(), tokio::io::stdout()).await
}

/// Bind a TCP listener
pub async fn bind_tcp(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| CarrosError::Transport(format!("failed to bind {}: {}", addr, e)))
}

/// Accept TCP connections until `shutdown` resolves.
///
/// Each connection runs in its own task; all share the endpoint's service.
pub async fn serve_tcp<R, F>(
    endpoint: CarsEndpoint<R>,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    R: CarRepository + 'static,
    F: Future<Output = ()>,
{
    let local = listener.local_addr()?;
    info!(addr = %local, "Serving JSON-RPC on TCP");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                debug!(peer = %peer, "Connection opened");
                let endpoint = endpoint.clone();
                tokio::spawn(async move {
                    let (reader, writer) = stream.into_split();
                    match serve_connection(&endpoint, reader, writer).await {
                        Ok(()) => debug!(peer = %peer, "Connection closed"),
                        Err(e) => warn!(peer = %peer, error = %e, "Connection failed"),
                    }
                });
            }
        }
    }
}

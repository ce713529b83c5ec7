use super::request::{classify, Incoming};
use super::transport::Transport;
use super::writer::{ReplyWriter, TransportWriter};
use crate::error::Error;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Receive buffer size used unless configured otherwise
pub const DEFAULT_BUFFER_SIZE: usize = 65536;

/// Application logic invoked for every classified request.
///
/// The server awaits each call before reading the next datagram. Handlers
/// doing slow work should move the request into a spawned task and reply
/// from there.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve_dhcp(&self, request: Incoming);
}

pub struct DhcpServer<T> {
    transport: Arc<T>,
    writer: Arc<dyn ReplyWriter>,
    buffer_size: usize,
}

impl<T: Transport + 'static> DhcpServer<T> {
    /// A server replying through the transport it reads from
    pub fn new(transport: Arc<T>) -> Self {
        let writer = Arc::new(TransportWriter::new(Arc::clone(&transport)));
        Self::with_writer(transport, writer)
    }

    /// A server handing requests a custom reply writer
    pub fn with_writer(transport: Arc<T>, writer: Arc<dyn ReplyWriter>) -> Self {
        Self {
            transport,
            writer,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Read and dispatch requests until the transport fails, then return the
    /// read error.
    pub async fn serve<H: Handler + ?Sized>(&self, handler: &H) -> Error {
        let mut buf = vec![0u8; self.buffer_size];

        info!("DHCP server waiting for requests");

        loop {
            let (len, source) = match self.transport.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!("Transport read failed, stopping: {}", e);
                    return Error::Io(e);
                }
            };
            debug!("Received {} bytes from {}", len, source);

            match classify(&buf[..len], source, &self.writer) {
                Ok(request) => {
                    debug!(
                        "{} from {} (xid {:#010x})",
                        request.message_type(),
                        source,
                        request.packet().xid()
                    );
                    handler.serve_dhcp(request).await;
                }
                Err(reason) => debug!("Discarding datagram from {}: {}", source, reason),
            }
        }
    }
}

/// Serve `handler` on `transport` with default settings
pub async fn serve<T, H>(transport: Arc<T>, handler: &H) -> Error
where
    T: Transport + 'static,
    H: Handler + ?Sized,
{
    DhcpServer::new(transport).serve(handler).await
}

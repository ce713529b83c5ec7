use super::transport::Transport;
use crate::error::Result;
use async_trait::async_trait;
use dhcp_proto::{Packet, Reply};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;
use tracing::debug;

/// Sends replies for requests received from `source`
#[async_trait]
pub trait ReplyWriter: Send + Sync {
    /// Validate, serialize and transmit `reply`, returning the bytes sent
    async fn write_reply(&self, reply: &dyn Reply, source: SocketAddr) -> Result<usize>;
}

/// Where a reply to `request`, received from `source`, must go.
///
/// A client that set the broadcast flag, or one sending from 0.0.0.0, has no
/// usable address yet and is reached at 255.255.255.255. Everyone else gets
/// the reply at the address the request came from. The source port is kept.
///
/// Relay agents (`giaddr` set) are not treated specially; requests relayed
/// to this server are answered at the relay's source address.
pub fn destination(request: &Packet, source: SocketAddr) -> SocketAddr {
    let port = source.port();
    match source {
        SocketAddr::V4(addr) if request.broadcast() || addr.ip().is_unspecified() => {
            SocketAddrV4::new(Ipv4Addr::BROADCAST, port).into()
        }
        _ => source,
    }
}

/// [`ReplyWriter`] writing to the transport the server reads from
pub struct TransportWriter<T> {
    transport: Arc<T>,
}

impl<T: Transport> TransportWriter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> ReplyWriter for TransportWriter<T> {
    async fn write_reply(&self, reply: &dyn Reply, source: SocketAddr) -> Result<usize> {
        reply.validate()?;
        let bytes = reply.to_bytes()?;

        let target = destination(reply.request(), source);
        debug!(
            "Sending {} byte reply for xid {:#010x} to {}",
            bytes.len(),
            reply.packet().xid(),
            target
        );

        Ok(self.transport.send_to(&bytes, target).await?)
    }
}

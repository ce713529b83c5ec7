use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

/// Datagram transport the server reads requests from and writes replies to.
///
/// Implementations must accept concurrent `send_to` calls; replies may be
/// written from tasks spawned by a handler while the server keeps reading.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Wait for the next datagram. An error means the transport is closed.
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;
}

#[async_trait]
impl Transport for UdpSocket {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target).await
    }
}

/// Bind a UDP socket able to send to the limited broadcast address
pub async fn bind(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(addr).await?;
    socket.set_broadcast(true)?;
    Ok(socket)
}

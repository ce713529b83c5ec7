use super::request::Incoming;
use super::server::Handler;
use super::transport::Transport;
use super::writer::ReplyWriter;
use crate::error::Result;
use async_trait::async_trait;
use dhcp_proto::{MacAddress, MessageType, OpCode, Packet, Reply, Tag};
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// In-memory transport: queued datagrams are read in order, then reads fail
/// as if the socket had been closed. Writes are recorded.
#[derive(Default)]
pub struct MemoryTransport {
    incoming: Mutex<VecDeque<(Vec<u8>, SocketAddr)>>,
    sent: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
    fail_sends: Mutex<bool>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, datagram: Vec<u8>, source: SocketAddr) {
        self.incoming.lock().unwrap().push_back((datagram, source));
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends(&self) {
        *self.fail_sends.lock().unwrap() = true;
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let (datagram, source) = self
            .incoming
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionAborted, "transport closed"))?;

        // UDP semantics: the excess of a datagram larger than the buffer is lost
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok((len, source))
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        if *self.fail_sends.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "send refused"));
        }
        self.sent.lock().unwrap().push((buf.to_vec(), target));
        Ok(buf.len())
    }
}

/// Handler remembering every request it was given
#[derive(Default)]
pub struct RecordingHandler {
    requests: Mutex<Vec<Incoming>>,
}

impl RecordingHandler {
    pub fn message_types(&self) -> Vec<MessageType> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(Incoming::message_type)
            .collect()
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn serve_dhcp(&self, request: Incoming) {
        self.requests.lock().unwrap().push(request);
    }
}

/// Writer recording validated replies instead of sending them
#[derive(Default)]
pub struct RecordingWriter {
    replies: Mutex<Vec<(SocketAddr, MessageType)>>,
}

impl RecordingWriter {
    pub fn replies(&self) -> Vec<(SocketAddr, MessageType)> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplyWriter for RecordingWriter {
    async fn write_reply(&self, reply: &dyn Reply, source: SocketAddr) -> Result<usize> {
        reply.validate()?;
        let bytes = reply.to_bytes()?;
        if let Some(message_type) = reply.packet().message_type() {
            self.replies.lock().unwrap().push((source, message_type));
        }
        Ok(bytes.len())
    }
}

/// A writer for requests whose replies are never written
pub fn null_writer() -> Arc<dyn ReplyWriter> {
    Arc::new(RecordingWriter::default())
}

/// Create a client request of the given type
pub fn create_request(message_type: MessageType, mac: &str) -> Packet {
    let mut packet = Packet::new(OpCode::BootRequest);
    packet.set_xid(12345);
    packet.set_client_mac(mac.parse::<MacAddress>().unwrap());
    packet.set_message_type(message_type);
    packet.set(Tag::PARAMETER_LIST, vec![1u8, 3, 6, 15]);
    packet
}

pub fn create_request_bytes(message_type: MessageType, mac: &str) -> Vec<u8> {
    create_request(message_type, mac).to_bytes().unwrap()
}

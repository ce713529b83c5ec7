pub mod config;
pub mod dhcp;
pub mod error;

pub use config::{Config, InformConfig};
pub use dhcp::{serve, DhcpServer, Handler, Incoming, ReplyWriter, Transport};
pub use error::{Error, Result};

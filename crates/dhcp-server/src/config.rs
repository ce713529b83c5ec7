use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;

/// Configuration structure loaded from YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Address the DHCP socket binds to
    #[serde(default = "default_listen_address")]
    pub listen_address: Ipv4Addr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Receive buffer size, the largest datagram the server accepts
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Parameters returned to DHCPINFORM clients. Without this section
    /// requests are logged but never answered.
    #[serde(default)]
    pub inform: Option<InformConfig>,
}

fn default_listen_address() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

fn default_port() -> u16 {
    67
}

fn default_buffer_size() -> usize {
    65536
}

/// Network parameters for hosts configured by other means (RFC 2131 3.4)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformConfig {
    /// Server identifier (option 54), usually the address of this server
    pub server_id: Ipv4Addr,

    #[serde(default)]
    pub subnet_mask: Option<Ipv4Addr>,

    #[serde(default)]
    pub routers: Vec<Ipv4Addr>,

    #[serde(default)]
    pub dns_servers: Vec<Ipv4Addr>,

    #[serde(default)]
    pub domain_name: Option<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddrV4::new(self.listen_address, self.port).into()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            port: default_port(),
            buffer_size: default_buffer_size(),
            inform: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:67".parse().unwrap());
    }

    #[test]
    fn test_inform_section() {
        let yaml = r#"
listen_address: 192.168.1.1
port: 1067
inform:
  server_id: 192.168.1.1
  subnet_mask: 255.255.255.0
  routers: [192.168.1.254]
  dns_servers: [192.168.1.53, 9.9.9.9]
  domain_name: home.lan
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.port, 1067);
        assert_eq!(config.buffer_size, 65536);

        let inform = config.inform.unwrap();
        assert_eq!(inform.server_id, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(inform.routers, vec![Ipv4Addr::new(192, 168, 1, 254)]);
        assert_eq!(inform.dns_servers.len(), 2);
        assert_eq!(inform.domain_name.as_deref(), Some("home.lan"));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("dhcp-server-config-{}.yaml", std::process::id()));
        let config = Config {
            port: 6767,
            inform: Some(InformConfig {
                server_id: Ipv4Addr::new(10, 0, 0, 1),
                subnet_mask: None,
                routers: vec![],
                dns_servers: vec![Ipv4Addr::new(10, 0, 0, 53)],
                domain_name: None,
            }),
            ..Config::default()
        };

        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = serde_yaml::from_str::<Config>("port: not-a-number").unwrap_err();
        assert!(matches!(Error::from(err), Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/dhcp-server.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}

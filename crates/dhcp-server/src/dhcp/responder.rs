use super::request::{DhcpInform, Incoming};
use super::server::Handler;
use crate::config::InformConfig;
use crate::error::Result;
use async_trait::async_trait;
use dhcp_proto::{Ack, Tag};
use tracing::{debug, info, warn};

/// Handler answering DHCPINFORM from static configuration.
///
/// Address allocation needs a lease store, which this server does not have:
/// DISCOVER and REQUEST are logged and left unanswered so another server on
/// the segment can handle them.
pub struct InformResponder {
    config: Option<InformConfig>,
}

impl InformResponder {
    pub fn new(config: Option<InformConfig>) -> Self {
        Self { config }
    }

    /// Build the DHCPACK for `inform`, `None` when nothing is configured
    pub fn build_ack<'a>(&self, inform: &'a DhcpInform) -> Option<Ack<'a>> {
        let config = self.config.as_ref()?;
        let mut ack = inform.create_ack();

        // RFC 2131 4.3.5: the client already has an address, echo it
        ack.set_ciaddr(inform.packet().ciaddr());
        ack.set_ipv4(Tag::DHCP_SERVER_ID, config.server_id);

        if let Some(mask) = config.subnet_mask {
            ack.set_ipv4(Tag::SUBNET_MASK, mask);
        }
        if !config.routers.is_empty() {
            ack.set_ipv4_list(Tag::ROUTER, &config.routers);
        }
        if !config.dns_servers.is_empty() {
            ack.set_ipv4_list(Tag::DOMAIN_SERVER, &config.dns_servers);
        }
        if let Some(domain) = &config.domain_name {
            ack.set_string(Tag::DOMAIN_NAME, domain);
        }

        Some(ack)
    }

    async fn answer_inform(&self, inform: &DhcpInform) -> Result<()> {
        let Some(ack) = self.build_ack(inform) else {
            debug!("No inform parameters configured, ignoring DHCPINFORM");
            return Ok(());
        };
        let sent = inform.write_reply(&ack).await?;
        debug!("DHCPACK of {} bytes sent for DHCPINFORM", sent);
        Ok(())
    }
}

#[async_trait]
impl Handler for InformResponder {
    async fn serve_dhcp(&self, request: Incoming) {
        let mac = request
            .packet()
            .client_mac()
            .map_or_else(|| "unknown".to_string(), |mac| mac.to_string());
        info!("{} from {} ({})", request.message_type(), mac, request.source());

        match &request {
            Incoming::Inform(inform) => {
                if let Err(e) = self.answer_inform(inform).await {
                    warn!("Failed to answer DHCPINFORM from {}: {}", mac, e);
                }
            }
            Incoming::Discover(_) | Incoming::Request(_) => {
                debug!("No address pool, leaving {} unanswered", request.message_type());
            }
            Incoming::Decline(_) | Incoming::Release(_) => {}
        }
    }
}

use std::fmt;

/// DHCP option tag (RFC 2132 and later registrations)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u8);

macro_rules! tags {
    ($( $(#[$meta:meta])* $name:ident = $value:literal, $label:literal; )*) => {
        impl Tag {
            $( $(#[$meta])* pub const $name: Tag = Tag($value); )*

            /// Human readable name for recognized tags
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( $value => Some($label), )*
                    _ => None,
                }
            }
        }
    };
}

tags! {
    // RFC 2132 section 3: RFC 1497 vendor extensions
    PAD = 0, "Pad";
    SUBNET_MASK = 1, "SubnetMask";
    TIME_OFFSET = 2, "TimeOffset";
    ROUTER = 3, "Router";
    TIME_SERVER = 4, "TimeServer";
    NAME_SERVER = 5, "NameServer";
    DOMAIN_SERVER = 6, "DomainServer";
    LOG_SERVER = 7, "LogServer";
    QUOTES_SERVER = 8, "QuotesServer";
    LPR_SERVER = 9, "LPRServer";
    IMPRESS_SERVER = 10, "ImpressServer";
    RLP_SERVER = 11, "RLPServer";
    HOSTNAME = 12, "Hostname";
    BOOT_FILE_SIZE = 13, "BootFileSize";
    MERIT_DUMP_FILE = 14, "MeritDumpFile";
    DOMAIN_NAME = 15, "DomainName";
    SWAP_SERVER = 16, "SwapServer";
    ROOT_PATH = 17, "RootPath";
    EXTENSION_FILE = 18, "ExtensionFile";

    // RFC 2132 section 4: IP layer parameters per host
    FORWARD_ON_OFF = 19, "ForwardOnOff";
    SRC_RTE_ON_OFF = 20, "SrcRteOnOff";
    POLICY_FILTER = 21, "PolicyFilter";
    MAX_DG_ASSEMBLY = 22, "MaxDGAssembly";
    DEFAULT_IP_TTL = 23, "DefaultIPTTL";
    MTU_TIMEOUT = 24, "MTUTimeout";
    MTU_PLATEAU = 25, "MTUPlateau";

    // RFC 2132 section 5: IP layer parameters per interface
    MTU_INTERFACE = 26, "MTUInterface";
    MTU_SUBNET = 27, "MTUSubnet";
    BROADCAST_ADDRESS = 28, "BroadcastAddress";
    MASK_DISCOVERY = 29, "MaskDiscovery";
    MASK_SUPPLIER = 30, "MaskSupplier";
    ROUTER_DISCOVERY = 31, "RouterDiscovery";
    ROUTER_REQUEST = 32, "RouterRequest";
    STATIC_ROUTE = 33, "StaticRoute";

    // RFC 2132 section 6: link layer parameters per interface
    TRAILERS = 34, "Trailers";
    ARP_TIMEOUT = 35, "ARPTimeout";
    ETHERNET = 36, "Ethernet";

    // RFC 2132 section 7: TCP parameters
    DEFAULT_TCP_TTL = 37, "DefaultTCPTTL";
    KEEPALIVE_TIME = 38, "KeepaliveTime";
    KEEPALIVE_DATA = 39, "KeepaliveData";

    // RFC 2132 section 8: application and service parameters
    NIS_DOMAIN = 40, "NISDomain";
    NIS_SERVERS = 41, "NISServers";
    NTP_SERVERS = 42, "NTPServers";
    VENDOR_SPECIFIC = 43, "VendorSpecific";
    NETBIOS_NAME_SRV = 44, "NETBIOSNameSrv";
    NETBIOS_DIST_SRV = 45, "NETBIOSDistSrv";
    NETBIOS_NODE_TYPE = 46, "NETBIOSNodeType";
    NETBIOS_SCOPE = 47, "NETBIOSScope";
    X_WINDOW_FONT = 48, "XWindowFont";
    X_WINDOW_MANAGER = 49, "XWindowManager";
    NIS_DOMAIN_NAME = 64, "NISDomainName";
    NIS_SERVER_ADDR = 65, "NISServerAddr";
    HOME_AGENT_ADDRS = 68, "HomeAgentAddrs";
    SMTP_SERVER = 69, "SMTPServer";
    POP3_SERVER = 70, "POP3Server";
    NNTP_SERVER = 71, "NNTPServer";
    WWW_SERVER = 72, "WWWServer";
    FINGER_SERVER = 73, "FingerServer";
    IRC_SERVER = 74, "IRCServer";
    STREET_TALK_SERVER = 75, "StreetTalkServer";
    STDA_SERVER = 76, "STDAServer";

    // RFC 2132 section 9: DHCP extensions
    ADDRESS_REQUEST = 50, "AddressRequest";
    ADDRESS_TIME = 51, "AddressTime";
    OVERLOAD = 52, "Overload";
    DHCP_MSG_TYPE = 53, "DhcpMsgType";
    DHCP_SERVER_ID = 54, "DhcpServerID";
    PARAMETER_LIST = 55, "ParameterList";
    DHCP_MESSAGE = 56, "DhcpMessage";
    DHCP_MAX_MSG_SIZE = 57, "DhcpMaxMsgSize";
    RENEWAL_TIME = 58, "RenewalTime";
    REBINDING_TIME = 59, "RebindingTime";
    CLASS_ID = 60, "ClassID";
    CLIENT_ID = 61, "ClientID";
    SERVER_NAME = 66, "ServerName";
    BOOTFILE_NAME = 67, "BootfileName";

    // RFC 2242
    NETWARE_IP_DOMAIN = 62, "NetWareIPDomain";
    NETWARE_IP_OPTION = 63, "NetWareIPOption";

    // RFC 3004
    USER_CLASS = 77, "UserClass";

    // RFC 2610
    DIRECTORY_AGENT = 78, "DirectoryAgent";
    SERVICE_SCOPE = 79, "ServiceScope";

    // RFC 4039
    RAPID_COMMIT = 80, "RapidCommit";

    // RFC 4702
    CLIENT_FQDN = 81, "ClientFQDN";

    // RFC 3046
    RELAY_AGENT_INFO = 82, "RelayAgentInfo";

    // RFC 4174
    ISNS = 83, "iSNS";

    // RFC 2241
    NDS_SERVERS = 85, "NDSServers";
    NDS_TREE_NAME = 86, "NDSTreeName";
    NDS_CONTEXT = 87, "NDSContext";

    // RFC 4280
    BCMCS_DOMAIN_LIST = 88, "BCMCSControllerDomainNameList";
    BCMCS_IPV4_ADDRESS = 89, "BCMCSControllerIPv4Address";

    // RFC 3118, carried as opaque bytes
    AUTHENTICATION = 90, "Authentication";

    // RFC 4388
    CLIENT_LAST_TRANSACTION_TIME = 91, "ClientLastTransactionTime";
    ASSOCIATED_IP = 92, "AssociatedIP";

    // RFC 4578
    CLIENT_SYSTEM = 93, "ClientSystem";
    CLIENT_NDI = 94, "ClientNDI";
    UUID_GUID = 97, "UUIDGUID";

    // RFC 3679
    LDAP = 95, "LDAP";

    // RFC 2485
    USER_AUTH = 98, "UserAuth";

    // RFC 4776
    GEOCONF_CIVIC = 99, "GeoConfCivic";

    // RFC 4833
    PCODE = 100, "PCode";
    TCODE = 101, "TCode";

    // RFC 3679
    NETINFO_ADDRESS = 112, "NetinfoAddress";
    NETINFO_TAG = 113, "NetinfoTag";
    URL = 114, "URL";

    // RFC 2563
    AUTO_CONFIG = 116, "AutoConfig";

    // RFC 2937
    NAME_SERVICE_SEARCH = 117, "NameServiceSearch";

    // RFC 3011
    SUBNET_SELECTION = 118, "SubnetSelection";

    // RFC 3397
    DOMAIN_SEARCH = 119, "DomainSearch";

    // RFC 3361
    SIP_SERVERS = 120, "SIPServers";

    // RFC 3442
    CLASSLESS_STATIC_ROUTE = 121, "ClasslessStaticRoute";

    // RFC 3495
    CCC = 122, "CCC";

    // RFC 6225
    GEOCONF = 123, "GeoConf";
    GEOLOC = 144, "GeoLoc";

    // RFC 3925
    VI_VENDOR_CLASS = 124, "VIVendorClass";
    VI_VENDOR_SPECIFIC = 125, "VIVendorSpecificInformation";

    // RFC 4578, PXE reserved
    PXE_128 = 128, "PXEUndefined128";
    PXE_129 = 129, "PXEUndefined129";
    PXE_130 = 130, "PXEUndefined130";
    PXE_131 = 131, "PXEUndefined131";
    PXE_132 = 132, "PXEUndefined132";
    PXE_133 = 133, "PXEUndefined133";
    PXE_134 = 134, "PXEUndefined134";
    PXE_135 = 135, "PXEUndefined135";

    END = 255, "End";
}

impl Tag {
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        Tag(value)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Tag({}, {})", self.0, name),
            None => write!(f, "Tag({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(Tag::DHCP_MSG_TYPE.name(), Some("DhcpMsgType"));
        assert_eq!(Tag(144).name(), Some("GeoLoc"));
        assert_eq!(Tag(200).name(), None);
    }

    #[test]
    fn test_tag_display_includes_number() {
        assert_eq!(Tag::ADDRESS_TIME.to_string(), "51 (AddressTime)");
        assert_eq!(Tag(250).to_string(), "250");
    }

    #[test]
    fn test_tag_ordering() {
        assert!(Tag::SUBNET_MASK < Tag::ROUTER);
        assert!(Tag::END > Tag::PXE_135);
    }
}

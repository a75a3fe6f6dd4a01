//! Wire constants and build options for synthetic sniff responses
use crate::config_error;
use crate::error::Result;

/// Cluster name reported by every synthetic response
pub const CLUSTER_NAME: &str = "elasticsearch-test-cluster";

/// Address every synthetic node reports for its own interfaces
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";

/// Transport port is the node's HTTP port shifted by this amount
pub const TRANSPORT_PORT_OFFSET: u32 = 1000;

/// Length of synthesized node, host and build-hash tokens
pub const TOKEN_LENGTH: usize = 8;

/// Parameters shared by every node entry in one response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SniffOptions {
    // Version written verbatim into each node entry
    pub version: String,

    // Replaces the loopback host in `http.publish_address` when non-blank
    pub publish_address_override: Option<String>,

    // Prefix bound/publish addresses with `fqdn<port>/`
    pub random_fqdn: bool,
}

impl SniffOptions {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            publish_address_override: None,
            random_fqdn: false,
        }
    }

    pub fn with_publish_address(mut self, address: impl Into<String>) -> Self {
        self.publish_address_override = Some(address.into());
        self
    }

    pub fn with_random_fqdn(mut self, random_fqdn: bool) -> Self {
        self.random_fqdn = random_fqdn;
        self
    }

    /// Host used in `http.publish_address`.
    pub fn publish_host(&self) -> &str {
        publish_host(self.publish_address_override.as_deref())
    }

    /// Reject options a real cluster could never report. The builder itself
    /// passes everything through; this is for callers that want a guard.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(config_error!("version must not be empty"));
        }
        Ok(())
    }
}

/// The override when it carries a non-whitespace value, otherwise loopback.
pub fn publish_host(address_override: Option<&str>) -> &str {
    match address_override {
        Some(host) if !host.trim().is_empty() => host,
        _ => LOOPBACK_ADDRESS,
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub mod node_id;

use crate::error::Result;
pub use node_id::{resolve_token, RandomTokenGenerator, SequentialTokenGenerator, TokenGenerator};

/// A cluster member as described by the test harness.
///
/// Nothing here is validated: a node with port 0 or an empty name is
/// rendered exactly as given.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Node {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Url,
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
    pub master_eligible: bool,
    pub holds_data: bool,
    pub ingest_enabled: bool,
    pub http_enabled: bool,
}

impl Node {
    /// A node with every capability enabled and no extra settings.
    pub fn new(address: Url) -> Self {
        Self {
            id: None,
            name: None,
            address,
            settings: IndexMap::new(),
            master_eligible: true,
            holds_data: true,
            ingest_enabled: true,
            http_enabled: true,
        }
    }

    pub fn parse(address: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(address)?))
    }

    /// Explicit port, else the scheme default, else 0.
    ///
    /// A port-less address with an unknown scheme therefore renders as
    /// `127.0.0.1:1000]` and `fqdn0/`, where a URI type with a signed port
    /// (reporting -1) would give `127.0.0.1:999]` and `fqdn-1/`.
    pub fn port(&self) -> u16 {
        self.address.port_or_known_default().unwrap_or(0)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn master_eligible(mut self, enabled: bool) -> Self {
        self.master_eligible = enabled;
        self
    }

    pub fn holds_data(mut self, enabled: bool) -> Self {
        self.holds_data = enabled;
        self
    }

    pub fn ingest_enabled(mut self, enabled: bool) -> Self {
        self.ingest_enabled = enabled;
        self
    }

    pub fn http_enabled(mut self, enabled: bool) -> Self {
        self.http_enabled = enabled;
        self
    }
}

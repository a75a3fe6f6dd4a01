//! Wire shapes of a node-discovery (`_nodes/http,settings`) response
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Role a node advertises in its `roles` list.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Master,
    Data,
    Ingest,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Master => "master",
            NodeRole::Data => "data",
            NodeRole::Ingest => "ingest",
        }
    }
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Top-level response body
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClusterResponse {
    pub cluster_name: String,
    pub nodes: IndexMap<String, NodeEntry>,
}

/// One member of the `nodes` object
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct NodeEntry {
    pub name: String,
    pub transport_address: String,
    pub host: String,
    pub ip: String,
    pub version: String,
    pub build_hash: String,
    pub roles: Vec<NodeRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpInfo>,
    pub settings: IndexMap<String, Value>,
}

/// HTTP interface block, present only on nodes serving HTTP
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HttpInfo {
    pub bound_address: Vec<String>,
    pub publish_address: String,
}

impl ClusterResponse {
    /// Parse a payload back into its wire shape.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl NodeEntry {
    pub fn has_role(&self, role: NodeRole) -> bool {
        self.roles.contains(&role)
    }
}

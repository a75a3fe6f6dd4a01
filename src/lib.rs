//! Synthetic responses for cluster node-discovery ("sniffing") tests.
//!
//! Describe the nodes of a pretend cluster with [`Node`] and render the body
//! its `_nodes/http,settings` endpoint would return with [`ResponseBuilder`].
pub mod error;
pub mod node;
pub mod settings;
pub mod sniff;

pub use error::{Result, SniffError};
pub use node::Node;
pub use settings::SniffOptions;
pub use sniff::{sniff_response_bytes, ClusterResponse, ResponseBuilder};

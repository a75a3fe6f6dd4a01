//! Synthetic node-discovery responses
pub mod builder;
pub mod messages;
pub mod serializer;

pub use builder::{sniff_response_bytes, transport_address, ResponseBuilder};
pub use messages::{ClusterResponse, HttpInfo, NodeEntry, NodeRole};
pub use serializer::{JsonSerializer, ResponseSerializer};

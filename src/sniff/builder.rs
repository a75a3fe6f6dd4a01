use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::node::{resolve_token, Node, RandomTokenGenerator, TokenGenerator};
use crate::settings::{self, SniffOptions, CLUSTER_NAME, LOOPBACK_ADDRESS, TRANSPORT_PORT_OFFSET};
use crate::sniff::messages::{ClusterResponse, HttpInfo, NodeEntry, NodeRole};
use crate::sniff::serializer::{JsonSerializer, ResponseSerializer};

/// Renders node descriptors as the body a real cluster returns from its
/// node-discovery endpoint.
///
/// Every call builds a fresh graph; nothing is kept between calls, so one
/// builder can serve concurrent callers as long as its collaborators can.
#[derive(Clone, Debug, Default)]
pub struct ResponseBuilder<G = RandomTokenGenerator, S = JsonSerializer> {
    generator: G,
    serializer: S,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: TokenGenerator, S: ResponseSerializer> ResponseBuilder<G, S> {
    pub fn with_parts(generator: G, serializer: S) -> Self {
        Self {
            generator,
            serializer,
        }
    }

    /// Serialize the response for `nodes`.
    ///
    /// Serializer failures come back as the serializer's own error.
    #[instrument(skip(self, nodes), fields(nodes = nodes.len()), level = "debug")]
    pub fn build(
        &self,
        nodes: &[Node],
        version: &str,
        address_override: Option<&str>,
        use_fqdn: bool,
    ) -> Result<Vec<u8>, S::Error> {
        let response = self.cluster_response(nodes, version, address_override, use_fqdn);
        let mut buffer = Vec::new();
        self.serializer.serialize(&response, &mut buffer)?;
        debug!("Serialized sniff response: {} bytes", buffer.len());
        Ok(buffer)
    }

    pub fn build_with_options(&self, nodes: &[Node], options: &SniffOptions) -> Result<Vec<u8>, S::Error> {
        self.build(
            nodes,
            &options.version,
            options.publish_address_override.as_deref(),
            options.random_fqdn,
        )
    }

    /// The response graph `build` would serialize.
    #[instrument(skip(self, nodes), fields(nodes = nodes.len()), level = "debug")]
    pub fn cluster_response(
        &self,
        nodes: &[Node],
        version: &str,
        address_override: Option<&str>,
        use_fqdn: bool,
    ) -> ClusterResponse {
        let publish_host = settings::publish_host(address_override);
        let mut entries = IndexMap::with_capacity(nodes.len());

        for node in nodes {
            let id = resolve_token(node.id.as_deref(), &self.generator);
            let name = resolve_token(node.name.as_deref(), &self.generator);
            let entry = self.node_entry(node, name, version, publish_host, use_fqdn);
            trace!("[Node<{}>] synthesized entry for {}", id, node.address);
            // Colliding ids keep the first position and the last entry
            entries.insert(id, entry);
        }

        ClusterResponse {
            cluster_name: CLUSTER_NAME.to_string(),
            nodes: entries,
        }
    }

    fn node_entry(
        &self,
        node: &Node,
        name: String,
        version: &str,
        publish_host: &str,
        use_fqdn: bool,
    ) -> NodeEntry {
        let port = node.port();
        let fqdn = if use_fqdn {
            format!("fqdn{}/", port)
        } else {
            String::new()
        };

        let http = node.http_enabled.then(|| HttpInfo {
            bound_address: vec![format!("{}{}:{}", fqdn, LOOPBACK_ADDRESS, port)],
            publish_address: format!("{}{}:{}", fqdn, publish_host, port),
        });

        NodeEntry {
            settings: merged_settings(node, &name),
            name,
            transport_address: transport_address(port),
            host: self.generator.new_token(),
            ip: LOOPBACK_ADDRESS.to_string(),
            version: version.to_string(),
            build_hash: self.generator.new_token(),
            roles: roles(node),
            http,
        }
    }
}

/// Transport endpoint as a real node reports it, trailing `]` included.
pub fn transport_address(port: u16) -> String {
    format!("{}:{}]", LOOPBACK_ADDRESS, u32::from(port) + TRANSPORT_PORT_OFFSET)
}

fn roles(node: &Node) -> Vec<NodeRole> {
    [
        (node.master_eligible, NodeRole::Master),
        (node.holds_data, NodeRole::Data),
        (node.ingest_enabled, NodeRole::Ingest),
    ]
    .into_iter()
    .filter_map(|(enabled, role)| enabled.then_some(role))
    .collect()
}

fn merged_settings(node: &Node, name: &str) -> IndexMap<String, Value> {
    let mut merged = IndexMap::with_capacity(node.settings.len() + 3);
    merged.insert("cluster.name".to_string(), Value::from(CLUSTER_NAME));
    merged.insert("node.name".to_string(), Value::from(name));
    for (key, value) in &node.settings {
        merged.insert(key.clone(), value.clone());
    }
    if !node.http_enabled {
        // The marker always sits last, even over a caller-supplied key
        merged.shift_remove("http.enabled");
        merged.insert("http.enabled".to_string(), Value::Bool(false));
    }
    merged
}

/// Serialize `nodes` with a random token source and compact JSON.
pub fn sniff_response_bytes(
    nodes: &[Node],
    version: &str,
    address_override: Option<&str>,
    use_fqdn: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    ResponseBuilder::new().build(nodes, version, address_override, use_fqdn)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::node::SequentialTokenGenerator;

    fn node(port: u16) -> Node {
        Node::parse(&format!("http://localhost:{}", port)).unwrap()
    }

    fn deterministic() -> ResponseBuilder<SequentialTokenGenerator, JsonSerializer> {
        ResponseBuilder::with_parts(SequentialTokenGenerator::new(), JsonSerializer::new())
    }

    #[test]
    fn test_transport_address_quirk() {
        assert_eq!(transport_address(9200), "127.0.0.1:10200]");
        assert_eq!(transport_address(0), "127.0.0.1:1000]");
        assert_eq!(transport_address(u16::MAX), "127.0.0.1:66535]");
    }

    #[test]
    fn test_roles_follow_flag_order() {
        let all = node(9200);
        assert_eq!(
            roles(&all),
            vec![NodeRole::Master, NodeRole::Data, NodeRole::Ingest]
        );

        let data_ingest = node(9200).master_eligible(false);
        assert_eq!(roles(&data_ingest), vec![NodeRole::Data, NodeRole::Ingest]);

        let none = node(9200)
            .master_eligible(false)
            .holds_data(false)
            .ingest_enabled(false);
        assert!(roles(&none).is_empty());
    }

    #[test]
    fn test_merged_settings_order_and_override() {
        let node = node(9200)
            .with_setting("custom.key", "v")
            .with_setting("cluster.name", "overridden")
            .http_enabled(false);
        let merged = merged_settings(&node, "n1");

        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["cluster.name", "node.name", "custom.key", "http.enabled"]
        );
        assert_eq!(merged["cluster.name"], "overridden");
        assert_eq!(merged["node.name"], "n1");
        assert_eq!(merged["http.enabled"], json!(false));
    }

    #[test]
    fn test_http_disabled_marker_wins_over_caller() {
        let node = node(9200)
            .with_setting("http.enabled", true)
            .http_enabled(false);
        let merged = merged_settings(&node, "n1");
        assert_eq!(merged["http.enabled"], json!(false));
    }

    #[test]
    fn test_http_disabled_marker_moves_to_end() {
        let node = node(9200)
            .with_setting("http.enabled", true)
            .with_setting("custom.after", "x")
            .http_enabled(false);
        let merged = merged_settings(&node, "n1");

        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["cluster.name", "node.name", "custom.after", "http.enabled"]
        );
        assert_eq!(merged["http.enabled"], json!(false));
    }

    #[test]
    fn test_caller_http_setting_kept_when_enabled() {
        let node = node(9200)
            .with_setting("http.enabled", true)
            .with_setting("custom.after", "x");
        let merged = merged_settings(&node, "n1");

        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["cluster.name", "node.name", "http.enabled", "custom.after"]
        );
        assert_eq!(merged["http.enabled"], json!(true));
    }

    #[test]
    fn test_deterministic_payload() {
        let builder = deterministic();
        let bytes = builder
            .build(&[node(9200)], "7.17.0", None, false)
            .unwrap();

        // id, name, host, build_hash drawn in that order
        let expected = json!({
            "cluster_name": "elasticsearch-test-cluster",
            "nodes": {
                "00000001": {
                    "name": "00000002",
                    "transport_address": "127.0.0.1:10200]",
                    "host": "00000003",
                    "ip": "127.0.0.1",
                    "version": "7.17.0",
                    "build_hash": "00000004",
                    "roles": ["master", "data", "ingest"],
                    "http": {
                        "bound_address": ["127.0.0.1:9200"],
                        "publish_address": "127.0.0.1:9200"
                    },
                    "settings": {
                        "cluster.name": "elasticsearch-test-cluster",
                        "node.name": "00000002"
                    }
                }
            }
        });
        let actual: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_field_order_on_the_wire() {
        let bytes = deterministic()
            .build(&[node(9200).with_id("a").with_name("b")], "v", None, false)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(r#"{"cluster_name":"elasticsearch-test-cluster","nodes":{"a":{"name":"b","transport_address":"127.0.0.1:10200]""#));
    }

    #[test]
    fn test_fqdn_and_override() {
        let response = deterministic().cluster_response(
            &[node(9201)],
            "7.17.0",
            Some("10.1.2.3"),
            true,
        );
        let entry = response.nodes.values().next().unwrap();
        let http = entry.http.as_ref().unwrap();
        assert_eq!(http.bound_address, vec!["fqdn9201/127.0.0.1:9201"]);
        assert_eq!(http.publish_address, "fqdn9201/10.1.2.3:9201");
        assert_eq!(entry.transport_address, "127.0.0.1:10201]");
    }

    #[test]
    fn test_blank_override_uses_loopback() {
        let response = deterministic().cluster_response(&[node(9200)], "v", Some("  "), false);
        let entry = response.nodes.values().next().unwrap();
        assert_eq!(entry.http.as_ref().unwrap().publish_address, "127.0.0.1:9200");
    }

    #[test]
    fn test_duplicate_ids_last_writer_wins() {
        let nodes = vec![
            node(9200).with_id("dup").with_name("first"),
            node(9201).with_id("other"),
            node(9202).with_id("dup").with_name("second"),
        ];
        let response = deterministic().cluster_response(&nodes, "v", None, false);

        assert_eq!(response.nodes.len(), 2);
        let keys: Vec<&str> = response.nodes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["dup", "other"]);
        assert_eq!(response.nodes["dup"].name, "second");
        assert_eq!(response.nodes["dup"].transport_address, "127.0.0.1:10202]");
    }

    #[test]
    fn test_empty_supplied_values_are_synthesized() {
        let response =
            deterministic().cluster_response(&[node(9200).with_id("").with_name("")], "v", None, false);
        let (id, entry) = response.nodes.iter().next().unwrap();
        assert_eq!(id, "00000001");
        assert_eq!(entry.name, "00000002");
    }

    #[test]
    fn test_build_with_options() {
        let options = SniffOptions::new("8.1.0")
            .with_publish_address("192.168.0.9")
            .with_random_fqdn(true);
        let bytes = deterministic()
            .build_with_options(&[node(9200)], &options)
            .unwrap();
        let response = ClusterResponse::from_slice(&bytes).unwrap();
        let entry = &response.nodes["00000001"];
        assert_eq!(entry.version, "8.1.0");
        assert_eq!(
            entry.http.as_ref().unwrap().publish_address,
            "fqdn9200/192.168.0.9:9200"
        );
    }
}

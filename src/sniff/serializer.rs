use std::io::Write;

use crate::sniff::messages::ClusterResponse;

/// Turns a response graph into wire bytes.
///
/// Implementations must keep the key order of the `nodes` and `settings`
/// maps. Errors are handed back to the caller untouched.
pub trait ResponseSerializer {
    type Error;

    fn serialize<W: Write>(&self, response: &ClusterResponse, sink: W) -> Result<(), Self::Error>;
}

/// JSON via serde_json, compact unless built with [`JsonSerializer::pretty`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ResponseSerializer for JsonSerializer {
    type Error = serde_json::Error;

    fn serialize<W: Write>(&self, response: &ClusterResponse, sink: W) -> Result<(), Self::Error> {
        if self.pretty {
            serde_json::to_writer_pretty(sink, response)
        } else {
            serde_json::to_writer(sink, response)
        }
    }
}

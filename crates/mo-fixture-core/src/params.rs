//! Per-process option maps (`procParams` in mongo-orchestration requests).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Options applied to every launched process unless overridden.
#[must_use]
pub fn default_options() -> Map<String, Value> {
    let defaults = json!({
        "logappend": true,
        "ipv6": true,
        "bind_ip": "127.0.0.1,::1",
        "setParameter": {
            "enableTestCommands": 1,
        },
    });

    match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Options for a single `mongod`/`mongos` process.
///
/// Serializes as a flat JSON object, for example
/// `{"logappend": true, ..., "port": 27017}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessParams(Map<String, Value>);

impl ProcessParams {
    /// Merge `overrides` over `defaults` and assign `port`.
    ///
    /// Overrides replace whole top-level keys; nested maps such as
    /// `setParameter` are not merged key by key.
    #[must_use]
    pub fn new(defaults: &Map<String, Value>, overrides: &Map<String, Value>, port: u16) -> Self {
        let mut options = defaults.clone();
        for (key, value) in overrides {
            options.insert(key.clone(), value.clone());
        }
        options.insert("port".to_string(), Value::from(port));
        Self(options)
    }

    /// The port assigned to this process.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.0
            .get("port")
            .and_then(Value::as_u64)
            .and_then(|port| u16::try_from(port).ok())
    }

    /// Look up a single option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying option map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

//! Settings shared by every create request sent to mongo-orchestration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Server versions the launcher knows how to pin.
pub const SUPPORTED_VERSIONS: [&str; 4] = ["2.6.12", "3.0.12", "3.2.10", "3.4.0-rc0"];

/// Login used to create the deployment's admin user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Admin user name.
    pub login: String,
    /// Admin password.
    pub password: String,
}

impl Credentials {
    /// Create credentials from a login and password.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

/// TLS settings passed as `sslParams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsParams {
    /// Require TLS on the regular listening port.
    pub ssl_on_normal_ports: bool,
    /// Server certificate and key.
    #[serde(rename = "sslPEMKeyFile")]
    pub ssl_pem_key_file: String,
    /// CA certificate.
    #[serde(rename = "sslCAFile")]
    pub ssl_ca_file: String,
    /// Accept clients that present no certificate.
    pub ssl_weak_certificate_validation: bool,
}

impl TlsParams {
    /// Build TLS settings from a directory holding `server.pem` and `ca.pem`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidCertPath` if the directory is not valid UTF-8.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let render = |file: &str| {
            let path = dir.join(file);
            path.to_str()
                .map(str::to_string)
                .ok_or_else(|| CoreError::InvalidCertPath(path.display().to_string()))
        };

        Ok(Self {
            ssl_on_normal_ports: true,
            ssl_pem_key_file: render("server.pem")?,
            ssl_ca_file: render("ca.pem")?,
            ssl_weak_certificate_validation: true,
        })
    }
}

/// Top-level keys merged into every create request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestTemplate {
    /// Admin credentials, serialized as `login` and `password`.
    #[serde(flatten)]
    pub credentials: Option<Credentials>,
    /// Shared key file contents used for internal authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    /// Server version to launch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// TLS settings.
    #[serde(rename = "sslParams", skip_serializing_if = "Option::is_none")]
    pub ssl_params: Option<TlsParams>,
}

impl RequestTemplate {
    /// Whether requests carry credentials, in which case the service reports
    /// an authenticated connection string.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Produce a request body: the template's keys, overridden by `config`'s
    /// top-level keys.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialize` if the template cannot be encoded.
    pub fn apply(&self, config: Value) -> Result<Value> {
        let mut body = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(match config {
            Value::Object(map) => {
                body.extend(map);
                Value::Object(body)
            }
            other => other,
        })
    }
}

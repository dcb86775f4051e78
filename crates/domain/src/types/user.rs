//! Session types: login credentials and the signed-in user's profile

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// Credentials used to sign in to the backend
///
/// Held by the backend only while the session is logged in. The secret is
/// never serialized and is redacted from `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AuthCredential {
    pub identifier: String,
    #[serde(skip_serializing, default)]
    pub secret: String,
    pub host: String,
}

impl AuthCredential {
    pub fn new<I, S, H>(identifier: I, secret: S, host: H) -> Self
    where
        I: Into<String>,
        S: Into<String>,
        H: Into<String>,
    {
        Self { identifier: identifier.into(), secret: secret.into(), host: host.into() }
    }

    /// True for the cleared credential (all fields empty)
    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() && self.secret.is_empty() && self.host.is_empty()
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredential")
            .field("identifier", &self.identifier)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("host", &self.host)
            .finish()
    }
}

/// Profile of the signed-in user
///
/// `id` is the identifier connectors expect when listing or booking time for
/// this user. Anything else the connector reports is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts-gen", ts(skip))]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, display_name: N) -> Self {
        Self { id: id.into(), display_name: display_name.into(), extra: Map::new() }
    }

    /// Attach a connector-defined field
    pub fn with_field<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

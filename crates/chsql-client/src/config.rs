//! Connection settings handed to an executor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings for connecting an executor to a ClickHouse server.
///
/// Deserializable so it can be loaded from JSON or TOML. The client itself
/// only uses the database name; the rest is for the executor.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server address, e.g. `http://localhost:8123`.
    pub url: String,
    /// Database user.
    pub user: String,
    /// Password for the user.
    pub password: String,
    /// Database every table name is resolved against.
    pub database: String,
    /// Ask the server to compress responses.
    #[serde(default = "default_compress_response")]
    pub compress_response: bool,
}

const fn default_compress_response() -> bool {
    true
}

impl ClientConfig {
    /// Creates a configuration with response compression enabled.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
            compress_response: default_compress_response(),
        }
    }

    /// Enables or disables response compression.
    #[must_use]
    pub const fn compress_response(mut self, enabled: bool) -> Self {
        self.compress_response = enabled;
        self
    }

    /// Returns the query-string settings an HTTP executor sends along.
    #[must_use]
    pub fn settings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("user", self.user.clone()),
            ("password", self.password.clone()),
            ("database", self.database.clone()),
            (
                "enable_http_compression",
                String::from(if self.compress_response { "1" } else { "0" }),
            ),
        ]
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("compress_response", &self.compress_response)
            .finish()
    }
}

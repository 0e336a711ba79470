//! API Domain Resolution
//!
//! Picks the base URL of the user REST API. The default environment is a
//! compile-time choice (the `local` cargo feature); configuration can still
//! name an environment or an explicit URL.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Production API base URL
pub const PRODUCTION_URL: &str = "https://sopra-fs25-tuor-manuel-server.oa.r.appspot.com";

/// Local development API base URL
pub const LOCAL_URL: &str = "http://localhost:8080";

/// Deployment environment the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Local,
}

impl Environment {
    /// Environment selected at build time
    pub const fn compiled() -> Self {
        if cfg!(feature = "local") {
            Environment::Local
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Local => "local",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::compiled()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "local" | "dev" | "development" => Ok(Environment::Local),
            other => Err(format!("unknown environment: {}", other)),
        }
    }
}

/// Base URL for the given environment
pub fn api_domain(env: Environment) -> String {
    match env {
        Environment::Production => PRODUCTION_URL.to_string(),
        Environment::Local => LOCAL_URL.to_string(),
    }
}

/// Base URL for the compiled-in environment
pub fn default_api_domain() -> String {
    api_domain(Environment::compiled())
}

/// Resolve the base URL: an explicit override wins over the environment.
/// Trailing slashes are removed so paths can be appended directly.
pub fn resolve(env: Environment, override_url: Option<&str>) -> String {
    let url = match override_url.map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => api_domain(env),
    };
    url.trim_end_matches('/').to_string()
}

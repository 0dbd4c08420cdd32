use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;

use csrhub_core::error::{CsrError, Result};
use csrhub_core::model::Role;
use csrhub_core::policy::PolicyTable;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub users: Vec<UserSeed>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CsrError::UnsupportedVersion);
        }
        if self.users.is_empty() {
            return Err(CsrError::BadRequest("users must not be empty".into()));
        }

        self.server.validate()?;
        self.policy.validate()?;

        let mut names = HashSet::new();
        let mut tokens = HashSet::new();
        for u in &self.users {
            u.validate()?;
            if !names.insert(u.username.as_str()) {
                return Err(CsrError::BadRequest(format!("duplicate username: {}", u.username)));
            }
            if !tokens.insert(u.token.as_str()) {
                return Err(CsrError::BadRequest(format!(
                    "duplicate token (user={})",
                    u.username
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1024..=16 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(CsrError::BadRequest(
                "server.max_body_bytes must be between 1024 and 16777216".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            CsrError::BadRequest(format!("server.listen must be a valid SocketAddr: {}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    /// `kind:operation=rule` entries replacing standard mutation rules.
    #[serde(default)]
    pub overrides: Vec<String>,
}

impl PolicySection {
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    pub fn compile(&self) -> Result<PolicyTable> {
        PolicyTable::with_overrides(&self.overrides)
    }
}

/// Account created at startup, reachable through its bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSeed {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub superuser: bool,
    pub token: String,
}

impl UserSeed {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(CsrError::BadRequest("users[].username must not be empty".into()));
        }
        if self.token.trim().is_empty() {
            return Err(CsrError::BadRequest(format!(
                "users[].token must not be empty (user={})",
                self.username
            )));
        }
        Ok(())
    }
}

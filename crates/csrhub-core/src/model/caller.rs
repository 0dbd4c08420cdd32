use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;
use crate::error::CsrError;

/// Account role. Informational for the policy engine: only the superuser flag
/// grants a bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    CsrManager,
    Editor,
    Recipient,
    Public,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::CsrManager => "csr_manager",
            Role::Editor => "editor",
            Role::Recipient => "recipient",
            Role::Public => "public",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "csr_manager" => Ok(Role::CsrManager),
            "editor" => Ok(Role::Editor),
            "recipient" => Ok(Role::Recipient),
            "public" => Ok(Role::Public),
            other => Err(CsrError::BadRequest(format!("unknown role: {other}"))),
        }
    }
}

/// Authenticated identity making a request. Already verified by the identity
/// collaborator; the engine trusts it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
    pub is_superuser: bool,
}

impl Caller {
    pub fn new(id: UserId, role: Role, is_superuser: bool) -> Self {
        Self { id, role, is_superuser }
    }

    /// True when `owner` names this caller.
    pub fn owns(&self, owner: Option<UserId>) -> bool {
        owner == Some(self.id)
    }
}

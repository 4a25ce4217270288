//! Session model as delivered by the authentication provider.
//!
//! # Responsibilities
//! - Represent the viewer (`UserIdentity`) and the provider's loading flag
//! - Parse raw role claims into the closed `Role` set
//!
//! # Design Decisions
//! - The raw role claim is kept as a string; parsing happens at evaluation
//!   time so an unexpected value degrades to "no permissions" instead of
//!   failing deserialization of the whole session
//! - The guard never mutates a session

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::AccessError;

/// Role of an authenticated viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
    Laboratory,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [Role::Patient, Role::Doctor, Role::Admin, Role::Laboratory];

    /// Lowercase wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
            Role::Laboratory => "laboratory",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            "laboratory" => Ok(Role::Laboratory),
            _ => Err(AccessError::UnrecognizedRole(s.to_string())),
        }
    }
}

/// Identity of an authenticated viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub username: String,
    /// Role claim exactly as the provider sent it.
    pub role: String,
}

impl UserIdentity {
    /// Create an identity with a known role.
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role: role.as_str().to_string(),
        }
    }

    /// Create an identity from an unparsed role claim.
    pub fn with_raw_role(
        id: impl Into<String>,
        username: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role: role.into(),
        }
    }

    /// Parse the role claim.
    pub fn role(&self) -> Result<Role, AccessError> {
        self.role.parse()
    }
}

/// Authentication state as observed by the guard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<UserIdentity>,
    pub is_loading: bool,
}

impl Session {
    /// The provider has not resolved yet.
    pub fn loading() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    /// Resolved with no user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolved with a logged-in user.
    pub fn authenticated(user: UserIdentity) -> Self {
        Self {
            user: Some(user),
            is_loading: false,
        }
    }
}

//! Role Value Objects
//!
//! [`Role`] is the closed set of assignable roles; [`RoleSet`] is the
//! ordered collection a user holds. The first entry is the primary role
//! used for display; authorization always consults the full set.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A role name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Reader,
    Author,
    Admin,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Author => "author",
            Role::Admin => "admin",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, UnknownRole> {
        match code {
            "reader" => Ok(Role::Reader),
            "author" => Ok(Role::Author),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Ordered set of roles, duplicates removed, insertion order kept.
///
/// May be empty only when reconstructed from an external claim; users
/// are always created with at least one role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn single(role: Role) -> Self {
        Self(vec![role])
    }

    pub fn from_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut set = Self::default();
        for role in roles {
            set.insert(role);
        }
        set
    }

    pub fn insert(&mut self, role: Role) {
        if !self.0.contains(&role) {
            self.0.push(role);
        }
    }

    /// The first role, used for display purposes only.
    pub fn primary(&self) -> Option<Role> {
        self.0.first().copied()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// Comma-joined role codes, the wire and storage representation.
    pub fn to_claim(&self) -> String {
        let codes: Vec<&str> = self.0.iter().map(Role::code).collect();
        codes.join(",")
    }

    /// Parse a comma-joined claim. Empty segments are skipped; an
    /// unknown role name rejects the whole claim.
    pub fn from_claim(claim: &str) -> Result<Self, UnknownRole> {
        let mut set = Self::default();
        for code in claim.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            set.insert(Role::from_code(code)?);
        }
        Ok(set)
    }
}

impl From<Role> for RoleSet {
    fn from(role: Role) -> Self {
        Self::single(role)
    }
}

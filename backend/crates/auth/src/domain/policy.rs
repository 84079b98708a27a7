//! Access Policy Engine
//!
//! Data-driven route authorization: an ordered list of (path prefix,
//! requirement) rules, evaluated most-specific-first, first match wins.
//! A path matching no rule requires authentication - the table fails
//! toward requiring identity, never toward openness.
//!
//! The table is process-wide configuration, built once at startup and
//! read-only afterwards.

use crate::domain::value_object::role::{Role, RoleSet};

/// What a matched route demands from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// No identity needed
    Public,
    /// Any validated identity
    Authenticated,
    /// A validated identity holding this role
    RequireRole(Role),
}

/// Outcome of an authorization check.
///
/// The unauthenticated/forbidden split is observable at the boundary
/// (401 vs 403) and must be preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No identity was established
    DenyUnauthenticated,
    /// Identity established but lacks the required role
    DenyForbidden,
}

/// One (prefix, requirement) pair.
#[derive(Debug, Clone)]
pub struct AccessRule {
    prefix: String,
    requirement: Requirement,
}

impl AccessRule {
    pub fn new(prefix: impl Into<String>, requirement: Requirement) -> Self {
        Self {
            prefix: prefix.into(),
            requirement,
        }
    }

    /// Segment-aware prefix match: "/api/auth" covers "/api/auth" and
    /// "/api/auth/login" but not "/api/authors".
    fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return true;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Ordered rule table. `caller` is `None` for anonymous requests and
/// `Some(roles)` once a token has been validated - an empty validated
/// role set still counts as authenticated.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Rule table for the blog API: auth endpoints are public, the
    /// admin/author/reader areas are role-gated, everything else needs
    /// a validated identity.
    pub fn defaults() -> Self {
        Self::new(vec![
            AccessRule::new("/api/auth", Requirement::Public),
            AccessRule::new("/api/admin", Requirement::RequireRole(Role::Admin)),
            AccessRule::new("/api/author", Requirement::RequireRole(Role::Author)),
            AccessRule::new("/api/reader", Requirement::RequireRole(Role::Reader)),
        ])
    }

    pub fn authorize(&self, path: &str, caller: Option<&RoleSet>) -> Decision {
        let requirement = self
            .rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.requirement)
            .unwrap_or(Requirement::Authenticated);

        match requirement {
            Requirement::Public => Decision::Allow,
            Requirement::Authenticated => match caller {
                Some(_) => Decision::Allow,
                None => Decision::DenyUnauthenticated,
            },
            Requirement::RequireRole(role) => match caller {
                None => Decision::DenyUnauthenticated,
                Some(roles) if roles.contains(role) => Decision::Allow,
                Some(_) => Decision::DenyForbidden,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(vec![
            AccessRule::new("/auth", Requirement::Public),
            AccessRule::new("/admin", Requirement::RequireRole(Role::Admin)),
            AccessRule::new("/reader", Requirement::RequireRole(Role::Reader)),
        ])
    }

    fn roles(list: &[Role]) -> RoleSet {
        RoleSet::from_roles(list.iter().copied())
    }

    #[test]
    fn test_public_allows_anonymous() {
        assert_eq!(policy().authorize("/auth/login", None), Decision::Allow);
    }

    #[test]
    fn test_role_rule_distinguishes_401_from_403() {
        let p = policy();
        assert_eq!(p.authorize("/admin/x", None), Decision::DenyUnauthenticated);
        assert_eq!(
            p.authorize("/admin/x", Some(&roles(&[Role::Reader]))),
            Decision::DenyForbidden
        );
        assert_eq!(
            p.authorize("/admin/x", Some(&roles(&[Role::Admin]))),
            Decision::Allow
        );
    }

    #[test]
    fn test_full_role_set_is_consulted() {
        // Reader is only the primary role; admin access still granted
        let set = roles(&[Role::Reader, Role::Admin]);
        assert_eq!(policy().authorize("/admin/x", Some(&set)), Decision::Allow);
    }

    #[test]
    fn test_unmatched_path_requires_identity() {
        let p = policy();
        assert_eq!(p.authorize("/posts", None), Decision::DenyUnauthenticated);
        assert_eq!(
            p.authorize("/posts", Some(&roles(&[Role::Reader]))),
            Decision::Allow
        );
    }

    #[test]
    fn test_empty_role_set_is_authenticated_only() {
        let empty = RoleSet::default();
        let p = policy();
        assert_eq!(p.authorize("/posts", Some(&empty)), Decision::Allow);
        assert_eq!(
            p.authorize("/admin/x", Some(&empty)),
            Decision::DenyForbidden
        );
    }

    #[test]
    fn test_first_match_wins() {
        let p = AccessPolicy::new(vec![
            AccessRule::new("/admin/health", Requirement::Public),
            AccessRule::new("/admin", Requirement::RequireRole(Role::Admin)),
        ]);
        assert_eq!(p.authorize("/admin/health", None), Decision::Allow);
        assert_eq!(p.authorize("/admin/users", None), Decision::DenyUnauthenticated);
    }

    #[test]
    fn test_prefix_match_is_segment_aware() {
        let p = AccessPolicy::new(vec![AccessRule::new("/auth", Requirement::Public)]);
        assert_eq!(p.authorize("/auth", None), Decision::Allow);
        assert_eq!(p.authorize("/auth/login", None), Decision::Allow);
        // "/authors" must not ride on the "/auth" rule
        assert_eq!(p.authorize("/authors", None), Decision::DenyUnauthenticated);
    }

    #[test]
    fn test_defaults_mirror_route_table() {
        let p = AccessPolicy::defaults();
        assert_eq!(p.authorize("/api/auth/login", None), Decision::Allow);
        assert_eq!(
            p.authorize("/api/admin/users", Some(&roles(&[Role::Admin]))),
            Decision::Allow
        );
        assert_eq!(
            p.authorize("/api/reader/feed", Some(&roles(&[Role::Author]))),
            Decision::DenyForbidden
        );
        assert_eq!(p.authorize("/api/posts", None), Decision::DenyUnauthenticated);
    }
}

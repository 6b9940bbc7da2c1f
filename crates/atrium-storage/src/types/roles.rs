//! Project role types for membership and permission checks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of a member within a project, ordered by privilege.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

/// Error type for parsing Role from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl std::fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "viewer" => Ok(Role::Viewer),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Viewer => "viewer",
        }
    }

    /// Numeric privilege level, strictly increasing with privilege.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Owner => 3,
            Role::Admin => 2,
            Role::Member => 1,
            Role::Viewer => 0,
        }
    }

    /// Check if this role has at least the privilege of another role
    pub fn at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Check if this role strictly outranks another role
    pub fn outranks(&self, other: Role) -> bool {
        self.rank() > other.rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Member, Role::Viewer];

    #[test]
    fn test_rank_is_strictly_increasing_with_privilege() {
        assert!(Role::Owner.rank() > Role::Admin.rank());
        assert!(Role::Admin.rank() > Role::Member.rank());
        assert!(Role::Member.rank() > Role::Viewer.rank());
        assert_eq!(Role::Viewer.rank(), 0);
    }

    #[test]
    fn test_at_least_matches_rank_ordering() {
        for a in ALL {
            for b in ALL {
                assert_eq!(a.at_least(b), a.rank() >= b.rank());
            }
        }
    }

    #[test]
    fn test_at_least_owner() {
        // Owner satisfies every requirement
        assert!(Role::Owner.at_least(Role::Owner));
        assert!(Role::Owner.at_least(Role::Admin));
        assert!(Role::Owner.at_least(Role::Member));
        assert!(Role::Owner.at_least(Role::Viewer));
    }

    #[test]
    fn test_at_least_admin() {
        assert!(!Role::Admin.at_least(Role::Owner));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Member));
        assert!(Role::Admin.at_least(Role::Viewer));
    }

    #[test]
    fn test_at_least_viewer() {
        assert!(!Role::Viewer.at_least(Role::Owner));
        assert!(!Role::Viewer.at_least(Role::Admin));
        assert!(!Role::Viewer.at_least(Role::Member));
        assert!(Role::Viewer.at_least(Role::Viewer));
    }

    #[test]
    fn test_outranks_is_strict() {
        for role in ALL {
            assert!(!role.outranks(role));
        }
        assert!(Role::Admin.outranks(Role::Member));
        assert!(!Role::Member.outranks(Role::Admin));
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Owner.as_str(), "owner");
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Member.as_str(), "member");
        assert_eq!(Role::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
    }

    #[test]
    fn test_role_parse_invalid() {
        assert!("invalid".parse::<Role>().is_err());
        assert!("Owner".parse::<Role>().is_err()); // Case sensitive
        assert!("OWNER".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_roundtrip() {
        for role in ALL {
            let s = role.as_str();
            let parsed: Role = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_parse_role_error_display() {
        let err = ParseRoleError("unknown".to_string());
        assert!(err.to_string().contains("unknown"));
    }
}

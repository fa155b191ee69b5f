use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission levels, least privileged first.
///
/// Variant order is the rank: a role satisfies every requirement at or
/// below its own position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    User,
    OrgAdmin,
    Dev,
    Admin,
    RootAdmin,
}

/// Canonical order, version 1. Changing it changes who can do what.
pub const ROLE_HIERARCHY: [Role; 5] = [
    Role::User,
    Role::OrgAdmin,
    Role::Dev,
    Role::Admin,
    Role::RootAdmin,
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::OrgAdmin => "org-admin",
            Role::Dev => "dev",
            Role::Admin => "admin",
            Role::RootAdmin => "root-admin",
        }
    }

    pub fn rank(&self) -> usize {
        ROLE_HIERARCHY
            .iter()
            .position(|role| role == self)
            .unwrap_or_default()
    }

    pub fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ROLE_HIERARCHY
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or(())
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct UserRole;

impl RequiredRole for UserRole {
    fn required() -> Role {
        Role::User
    }
}

pub struct OrgAdminRole;

impl RequiredRole for OrgAdminRole {
    fn required() -> Role {
        Role::OrgAdmin
    }
}

pub struct DevRole;

impl RequiredRole for DevRole {
    fn required() -> Role {
        Role::Dev
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AdminRole, DevRole, OrgAdminRole, ROLE_HIERARCHY, RequiredRole, Role, UserRole,
    };

    #[test]
    fn role_string_roundtrip() {
        for role in ROLE_HIERARCHY {
            assert_eq!(Role::try_from(role.as_str()), Ok(role));
            let json = serde_json::to_value(role).expect("role should serialize");
            assert_eq!(json, serde_json::json!(role.as_str()));
        }
        assert!(Role::try_from("smm").is_err());
    }

    #[test]
    fn higher_or_equal_rank_satisfies_requirement() {
        for (user_rank, user_role) in ROLE_HIERARCHY.iter().enumerate() {
            for (required_rank, required) in ROLE_HIERARCHY.iter().enumerate() {
                assert_eq!(
                    user_role.satisfies(*required),
                    user_rank >= required_rank,
                    "{user_role} vs {required}"
                );
            }
        }
    }

    #[test]
    fn enum_order_matches_hierarchy() {
        let mut sorted = ROLE_HIERARCHY;
        sorted.sort();
        assert_eq!(sorted, ROLE_HIERARCHY);
        assert!(Role::OrgAdmin < Role::Dev);
    }

    #[test]
    fn required_role_markers_map_to_expected_role() {
        assert_eq!(UserRole::required(), Role::User);
        assert_eq!(OrgAdminRole::required(), Role::OrgAdmin);
        assert_eq!(DevRole::required(), Role::Dev);
        assert_eq!(AdminRole::required(), Role::Admin);
    }
}

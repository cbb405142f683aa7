use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, NonEmptyString};

/// Back-office role carried by an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Listing agent.
    Agent,
    /// Branch manager.
    Manager,
    /// Vice president owning the budget step.
    Vp,
    /// Director.
    Director,
    /// Administrator; bypasses step role checks.
    Admin,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Manager => "manager",
            Self::Vp => "vp",
            Self::Director => "director",
            Self::Admin => "admin",
        }
    }

    /// Parses a storage or transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "agent" => Ok(Self::Agent),
            "manager" => Ok(Self::Manager),
            "vp" => Ok(Self::Vp),
            "director" => Ok(Self::Director),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Authenticated caller identity handed in by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: NonEmptyString,
    role: Role,
}

impl Actor {
    /// Creates an actor from a validated identifier and role.
    pub fn new(id: impl Into<String>, role: Role) -> AppResult<Self> {
        Ok(Self {
            id: NonEmptyString::new(id)?,
            role,
        })
    }

    /// Returns the stable actor identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the actor role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns whether the actor holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::{Actor, Role};

    #[test]
    fn role_roundtrip_storage_value() {
        for role in [
            Role::Agent,
            Role::Manager,
            Role::Vp,
            Role::Director,
            Role::Admin,
        ] {
            let restored = Role::parse(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Role::Agent), role);
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert!(matches!(Role::parse(" Director "), Ok(Role::Director)));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::parse("owner").is_err());
    }

    #[test]
    fn actor_requires_identifier() {
        assert!(Actor::new("  ", Role::Manager).is_err());
    }
}

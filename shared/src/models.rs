use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Creator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Creator => "creator",
            Role::Admin => "admin",
        }
    }

    /// May publish strategies
    pub fn can_create_strategies(&self) -> bool {
        matches!(self, Role::Creator | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "creator" => Ok(Role::Creator),
            "admin" => Ok(Role::Admin),
            other => Err(anyhow::anyhow!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Strategy,
    Trade,
    Royalty,
    Campaign,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Strategy => "strategy",
            NotificationKind::Trade => "trade",
            NotificationKind::Royalty => "royalty",
            NotificationKind::Campaign => "campaign",
        }
    }
}

pub const SUBSCRIPTION_ACTIVE: &str = "active";
pub const SUBSCRIPTION_CANCELLED: &str = "cancelled";

/// `iron_condor_trades.status`
pub const TRADE_FILLED: &str = "filled";
pub const TRADE_FAILED: &str = "failed";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_permissions() {
        assert_eq!("Creator".parse::<Role>().unwrap(), Role::Creator);
        assert!("root".parse::<Role>().is_err());
        assert!(Role::Admin.can_create_strategies());
        assert!(!Role::User.can_create_strategies());
        assert!(Role::Admin.is_admin());
    }
}

//! Strategy lifecycle

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted strategy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Draft,
    PendingReview,
    #[serde(alias = "approved")]
    Published,
    Rejected,
    Archived,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("unknown strategy status: {0}")]
    UnknownStatus(String),
    #[error("cannot move strategy from {from} to {to}")]
    NotAllowed {
        from: StrategyStatus,
        to: StrategyStatus,
    },
}

impl StrategyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }

    /// Every spelling that parses to this status, for database filters
    pub fn stored_forms(&self) -> &'static [&'static str] {
        match self {
            Self::Draft => &["draft"],
            Self::PendingReview => &["pending_review"],
            Self::Published => &["published", "approved"],
            Self::Rejected => &["rejected"],
            Self::Archived => &["archived"],
        }
    }

    /// Owner may still change title, legs and fees
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Rejected)
    }

    /// Visible in the marketplace and copyable
    pub fn is_public(&self) -> bool {
        *self == Self::Published
    }

    pub fn can_transition_to(&self, next: StrategyStatus) -> bool {
        use StrategyStatus::*;
        matches!(
            (self, next),
            (Draft, PendingReview)
                | (Rejected, PendingReview)
                | (PendingReview, Published)
                | (PendingReview, Rejected)
                | (Draft, Archived)
                | (PendingReview, Archived)
                | (Published, Archived)
                | (Rejected, Archived)
        )
    }

    /// Validate a move and return the new status
    pub fn transition(self, next: StrategyStatus) -> Result<StrategyStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::NotAllowed {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for StrategyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "published" | "approved" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            "archived" => Ok(Self::Archived),
            other => Err(TransitionError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_approved_alias() {
        assert_eq!("approved".parse::<StrategyStatus>(), Ok(StrategyStatus::Published));
        assert_eq!("Pending_Review".parse::<StrategyStatus>(), Ok(StrategyStatus::PendingReview));
        assert!("live".parse::<StrategyStatus>().is_err());
    }

    #[test]
    fn test_stored_forms_parse_back() {
        assert_eq!(StrategyStatus::Published.stored_forms(), &["published", "approved"]);
        for status in [StrategyStatus::Draft, StrategyStatus::Published, StrategyStatus::Archived] {
            for form in status.stored_forms() {
                assert_eq!(form.parse::<StrategyStatus>(), Ok(status));
            }
        }
    }

    #[test]
    fn test_as_str_round_trip() {
        for status in [
            StrategyStatus::Draft,
            StrategyStatus::PendingReview,
            StrategyStatus::Published,
            StrategyStatus::Rejected,
            StrategyStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<StrategyStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_review_flow() {
        let submitted = StrategyStatus::Draft.transition(StrategyStatus::PendingReview).unwrap();
        assert_eq!(submitted.transition(StrategyStatus::Published), Ok(StrategyStatus::Published));
        assert_eq!(submitted.transition(StrategyStatus::Rejected), Ok(StrategyStatus::Rejected));
        assert!(StrategyStatus::Rejected.can_transition_to(StrategyStatus::PendingReview));
    }

    #[test]
    fn test_forbidden_moves() {
        assert_eq!(
            StrategyStatus::Draft.transition(StrategyStatus::Published),
            Err(TransitionError::NotAllowed {
                from: StrategyStatus::Draft,
                to: StrategyStatus::Published,
            })
        );
        assert!(!StrategyStatus::Archived.can_transition_to(StrategyStatus::Draft));
        assert!(!StrategyStatus::Published.can_transition_to(StrategyStatus::PendingReview));
    }

    #[test]
    fn test_editable() {
        assert!(StrategyStatus::Draft.is_editable());
        assert!(StrategyStatus::Rejected.is_editable());
        assert!(!StrategyStatus::Published.is_editable());
    }

    #[test]
    fn test_serde_alias() {
        let status: StrategyStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, StrategyStatus::Published);
        assert_eq!(serde_json::to_string(&StrategyStatus::PendingReview).unwrap(), "\"pending_review\"");
    }
}

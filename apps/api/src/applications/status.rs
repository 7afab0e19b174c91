//! Application lifecycle state machine.
//!
//! draft → submitted → {interview, rejected}
//! interview → {accepted, rejected}
//! accepted and rejected are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    Interview,
    Accepted,
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot move an application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("Unknown application status '{0}'")]
    UnknownStatus(String),
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Draft,
        ApplicationStatus::Submitted,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn allowed_transitions(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Draft => &[Submitted],
            Submitted => &[Interview, Rejected],
            Interview => &[Accepted, Rejected],
            Accepted | Rejected => &[],
        }
    }

    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Target status if the move is legal. Re-asserting the current status is allowed.
    pub fn transition(self, next: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
        if next == self || self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TransitionError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_transition_table_over_all_pairs() {
        let legal = [
            (Draft, Submitted),
            (Submitted, Interview),
            (Submitted, Rejected),
            (Interview, Accepted),
            (Interview, Rejected),
        ];

        for from in ApplicationStatus::ALL {
            for to in ApplicationStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "legal" } else { "illegal" }
                );
                if from != to {
                    assert_eq!(from.transition(to).is_ok(), expected);
                }
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(Accepted.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Draft.is_terminal());
        assert!(!Interview.is_terminal());
    }

    #[test]
    fn test_same_status_is_a_no_op_even_when_terminal() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.transition(status), Ok(status));
        }
    }

    #[test]
    fn test_cannot_skip_submission() {
        assert_eq!(
            Draft.transition(Interview),
            Err(TransitionError::InvalidTransition {
                from: Draft,
                to: Interview
            })
        );
        assert!(Draft
            .transition(Accepted)
            .unwrap_err()
            .to_string()
            .contains("from draft to accepted"));
    }

    #[test]
    fn test_parse_and_display_agree() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!(matches!(
            "withdrawn".parse::<ApplicationStatus>(),
            Err(TransitionError::UnknownStatus(_))
        ));
        assert_eq!(
            serde_json::to_string(&Interview).unwrap(),
            "\"interview\""
        );
    }
}

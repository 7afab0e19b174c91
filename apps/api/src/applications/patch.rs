//! Partial updates for an application.
//!
//! For the optional fields an absent key leaves the stored value alone and an
//! explicit `null` clears it, so each is an `Option<Option<T>>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::applications::status::{ApplicationStatus, TransitionError};
use crate::models::application::ApplicationRow;

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub interview_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub follow_up_date: Option<Option<DateTime<Utc>>>,
}

/// Only reached when the key exists, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Column values to write back, after the patch has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationUpdate {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.notes.is_none()
            && self.interview_date.is_none()
            && self.follow_up_date.is_none()
    }

    /// Merges the patch over `current`. Fails on an illegal status change.
    pub fn apply_to(self, current: &ApplicationRow) -> Result<ApplicationUpdate, TransitionError> {
        let current_status: ApplicationStatus = current.status.parse()?;
        let status = match self.status {
            Some(next) => current_status.transition(next)?,
            None => current_status,
        };

        Ok(ApplicationUpdate {
            status,
            notes: self.notes.unwrap_or_else(|| current.notes.clone()),
            interview_date: self.interview_date.unwrap_or(current.interview_date),
            follow_up_date: self.follow_up_date.unwrap_or(current.follow_up_date),
        })
    }
}

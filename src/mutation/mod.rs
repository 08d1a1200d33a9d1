//! Create/update/delete flow with mandatory refresh-after-write.
//!
//! Every mutation walks the same state machine:
//!
//! ```text
//! Idle -> Validating -> Invalid  -> Idle (error shown)
//!                    -> Submitting -> Failure -> Idle (error shown)
//!                                  -> Refreshing -> Idle (success shown)
//! ```
//!
//! Mutations are not serialized against each other. When two race, whichever
//! refresh completes last decides the cached snapshot.

pub mod forms;
pub mod notify;
pub mod pipeline;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{StoreError, ValidationError};

pub use forms::{AttendanceForm, EditState, StudentForm};
pub use notify::{Notification, NotificationLevel, NotificationReceiver, Notifier};
pub use pipeline::MutationPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutationState {
    Idle,
    Validating,
    Submitting,
    Refreshing,
}

/// Settled result of a mutation trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationStatus {
    /// Remote write succeeded and the cache was refreshed
    Settled,
    /// Rejected before any remote call
    Invalid(ValidationError),
    /// Remote write failed; nothing was refreshed or cleared
    Failed(StoreError),
    /// User declined the confirmation prompt
    Cancelled,
}

impl MutationStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, MutationStatus::Settled)
    }
}

/// Confirmation shown before a destructive mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
}

impl ConfirmPrompt {
    pub fn deletion(display_name: &str) -> Self {
        Self {
            title: "Confirm Deletion".to_string(),
            message: format!("Are you sure you want to delete {}?", display_name),
        }
    }
}

#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Answers every prompt the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        self.0
    }
}

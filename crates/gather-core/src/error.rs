// Error types for the registration ledger

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while registering for or leaving an event
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Event does not exist
    #[error("event not found: {0}")]
    EventNotFound(Uuid),

    /// Registration window is closed for the event
    #[error("registration is closed for event {0}")]
    RegistrationClosed(Uuid),

    /// An active or waitlisted registration already exists for the pair
    #[error("user {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: Uuid, user_id: Uuid },

    /// No active or waitlisted registration exists for the pair
    #[error("user {user_id} has no registration for event {event_id}")]
    NotRegistered { event_id: Uuid, user_id: Uuid },

    /// Write conflict with a concurrent mutation on the same event
    #[error("concurrent write conflict on event {0}")]
    CapacityConflict(Uuid),

    /// Transient failure in the underlying store
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LedgerError {
    /// Create a store unavailability error
    pub fn store(msg: impl Into<String>) -> Self {
        LedgerError::StoreUnavailable(msg.into())
    }

    /// Whether the caller may retry the operation with backoff.
    /// All other kinds are terminal for the given request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::CapacityConflict(_) | LedgerError::StoreUnavailable(_)
        )
    }
}

// Core traits for pluggable backends
//
// The RegistrationStore trait allows the ledger to be used with different
// backends:
// - In-memory implementation for tests
// - Postgres implementation for production
//
// Implementations own their atomicity discipline, but all of them must honor
// the same contract: capacity decisions are linearizable per event.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::registration::{
    Attendance, Registration, RegistrationCounts, RegistrationOutcome, RegistrationPayload,
};

/// Store for event registrations and the capacity/waitlist ledger
///
/// Concurrency contract: the "is there a free active slot" decision and the
/// row write that claims it must be atomic with respect to concurrent
/// register/unregister calls on the same event. Two racing registers must
/// never both land active on the last open slot, and two racing
/// cancellations must never promote the same waitlisted row twice.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Register `user_id` for an event.
    ///
    /// Fails with `EventNotFound`, `RegistrationClosed`, or
    /// `AlreadyRegistered`. Persists exactly one new row; lands `active`
    /// when capacity allows, else `waitlisted` at max position + 1.
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        payload: RegistrationPayload,
    ) -> Result<RegistrationOutcome>;

    /// Cancel the caller's registration.
    ///
    /// When the cancelled row was active and the event is capacity-limited,
    /// promotes the waitlisted row with the lowest position (its position is
    /// cleared). Cancelling a waitlisted row promotes nothing and renumbers
    /// nothing. At most two row writes. Fails with `NotRegistered` when no
    /// cancellable row exists.
    async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Latest registration for the pair, cancelled included
    async fn registration_for(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>>;

    /// All registrations for an event in creation order, cancelled included
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>>;

    /// 1-based rank among waitlisted rows, `None` when not waitlisted
    async fn waitlist_position(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<u32>>;

    /// Active/waitlisted tallies for an event. Pure read.
    async fn counts(&self, event_id: Uuid) -> Result<RegistrationCounts>;

    /// Record attendance on a non-cancelled registration (admin check-in)
    async fn set_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        attendance: Attendance,
    ) -> Result<Registration>;
}

// In-memory implementation of RegistrationStore for testing
//
// Stores all data in memory behind a single mutex and provides the same
// observable semantics as the PostgreSQL implementation: every operation's
// read-decide-write runs under the lock, so the per-event linearizability
// contract holds trivially.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use gather_core::{
    decide_placement, promotion_candidate, waitlist_rank, Attendance, Event, LedgerError,
    Placement, Registration, RegistrationCounts, RegistrationOutcome, RegistrationPayload,
    RegistrationStatus, RegistrationStore, Result,
};

#[derive(Default)]
struct MemoryInner {
    events: HashMap<Uuid, Event>,
    registrations: Vec<Registration>,
}

impl MemoryInner {
    fn for_event(&self, event_id: Uuid) -> Vec<&Registration> {
        self.registrations
            .iter()
            .filter(|r| r.event_id == event_id)
            .collect()
    }

    fn live_index(&self, event_id: Uuid, user_id: Uuid) -> Option<usize> {
        self.registrations
            .iter()
            .position(|r| r.event_id == event_id && r.user_id == user_id && !r.is_cancelled())
    }
}

/// In-memory registration store
///
/// Primarily for tests; seed events with `insert_event`.
#[derive(Default)]
pub struct MemoryRegistrationStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace an event
    pub fn insert_event(&self, event: Event) {
        self.inner.lock().events.insert(event.id, event);
    }

    /// Drop an event, retaining its registrations (mirrors the Postgres
    /// behavior of deleting an event row)
    pub fn remove_event(&self, event_id: Uuid) {
        self.inner.lock().events.remove(&event_id);
    }

    pub fn registration_count(&self) -> usize {
        self.inner.lock().registrations.len()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        payload: RegistrationPayload,
    ) -> Result<RegistrationOutcome> {
        let mut inner = self.inner.lock();

        let event = inner
            .events
            .get(&event_id)
            .ok_or(LedgerError::EventNotFound(event_id))?;

        if !event.is_registration_open() {
            return Err(LedgerError::RegistrationClosed(event_id));
        }
        let capacity = event.capacity;

        if inner.live_index(event_id, user_id).is_some() {
            return Err(LedgerError::AlreadyRegistered { event_id, user_id });
        }

        let rows = inner.for_event(event_id);
        let active_count = rows.iter().filter(|r| r.is_active()).count() as i64;
        let max_position = rows
            .iter()
            .filter(|r| r.is_waitlisted())
            .filter_map(|r| r.position)
            .max();

        let placement = decide_placement(capacity, active_count, max_position);
        let (status, position) = match placement {
            Placement::Active => (RegistrationStatus::Active, None),
            Placement::Waitlisted { position } => (RegistrationStatus::Waitlisted, Some(position)),
        };

        let now = Utc::now();
        let registration = Registration {
            id: Uuid::now_v7(),
            event_id,
            user_id,
            status,
            position,
            name: payload.name,
            email: payload.email,
            answers: payload.answers,
            attendance: Attendance::Pending,
            checked_in_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.registrations.push(registration.clone());

        let waitlist_position = position.and_then(|_| {
            let rows: Vec<Registration> =
                inner.for_event(event_id).into_iter().cloned().collect();
            waitlist_rank(&rows, user_id)
        });

        Ok(RegistrationOutcome {
            registration,
            waitlist_position,
        })
    }

    async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock();

        let idx = inner
            .live_index(event_id, user_id)
            .ok_or(LedgerError::NotRegistered { event_id, user_id })?;

        let was_active = inner.registrations[idx].is_active();
        inner.registrations[idx].status = RegistrationStatus::Cancelled;
        inner.registrations[idx].updated_at = Utc::now();

        let capacity_limited = inner
            .events
            .get(&event_id)
            .is_some_and(|e| e.capacity.is_some());

        if was_active && capacity_limited {
            let rows: Vec<Registration> =
                inner.for_event(event_id).into_iter().cloned().collect();
            if let Some(head) = promotion_candidate(&rows) {
                let head_id = head.id;
                if let Some(promoted) =
                    inner.registrations.iter_mut().find(|r| r.id == head_id)
                {
                    promoted.status = RegistrationStatus::Active;
                    promoted.position = None;
                    promoted.updated_at = Utc::now();
                }
            }
        }

        Ok(())
    }

    async fn registration_for(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>> {
        let inner = self.inner.lock();
        let mut rows: Vec<&Registration> = inner
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id && r.user_id == user_id)
            .collect();
        // Live row first, then latest cancelled attempt
        rows.sort_by_key(|r| (r.is_cancelled(), std::cmp::Reverse(r.created_at)));
        Ok(rows.first().map(|r| (*r).clone()))
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        let inner = self.inner.lock();
        let mut rows: Vec<Registration> =
            inner.for_event(event_id).into_iter().cloned().collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }

    async fn waitlist_position(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<u32>> {
        let inner = self.inner.lock();
        let rows: Vec<Registration> = inner.for_event(event_id).into_iter().cloned().collect();
        Ok(waitlist_rank(&rows, user_id))
    }

    async fn counts(&self, event_id: Uuid) -> Result<RegistrationCounts> {
        let inner = self.inner.lock();
        let rows = inner.for_event(event_id);
        Ok(RegistrationCounts {
            active: rows.iter().filter(|r| r.is_active()).count() as u32,
            waitlisted: rows.iter().filter(|r| r.is_waitlisted()).count() as u32,
        })
    }

    async fn set_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        attendance: Attendance,
    ) -> Result<Registration> {
        let mut inner = self.inner.lock();
        let idx = inner
            .live_index(event_id, user_id)
            .ok_or(LedgerError::NotRegistered { event_id, user_id })?;

        let row = &mut inner.registrations[idx];
        row.attendance = attendance;
        if attendance == Attendance::Attended && row.checked_in_at.is_none() {
            row.checked_in_at = Some(Utc::now());
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

// Registration service wiring the ledger to HTTP handlers
//
// The store enforces the ledger's invariants; this layer only composes
// reads for the status card and forwards mutations.

use std::sync::Arc;

use uuid::Uuid;

use gather_core::{
    Attendance, Registration, RegistrationCounts, RegistrationOutcome, RegistrationPayload,
    RegistrationStore, Result,
};

pub struct RegistrationService {
    store: Arc<dyn RegistrationStore>,
}

/// Everything the registration status card shows for one user
#[derive(Debug, Clone)]
pub struct RegistrationStanding {
    pub registration: Option<Registration>,
    pub waitlist_position: Option<u32>,
    pub counts: RegistrationCounts,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RegistrationStore>) -> Self {
        Self { store }
    }

    pub async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        payload: RegistrationPayload,
    ) -> Result<RegistrationOutcome> {
        self.store.register(event_id, user_id, payload).await
    }

    pub async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        self.store.unregister(event_id, user_id).await
    }

    pub async fn status(&self, event_id: Uuid, user_id: Uuid) -> Result<RegistrationStanding> {
        let registration = self.store.registration_for(event_id, user_id).await?;
        let waitlist_position = self.store.waitlist_position(event_id, user_id).await?;
        let counts = self.store.counts(event_id).await?;
        Ok(RegistrationStanding {
            registration,
            waitlist_position,
            counts,
        })
    }

    pub async fn list(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        self.store.list_for_event(event_id).await
    }

    pub async fn counts(&self, event_id: Uuid) -> Result<RegistrationCounts> {
        self.store.counts(event_id).await
    }

    pub async fn check_in(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        attendance: Attendance,
    ) -> Result<Registration> {
        self.store.set_attendance(event_id, user_id, attendance).await
    }
}

// Registration ledger semantics over the in-memory store
//
// The memory store shares the decision functions with the Postgres store,
// so these tests pin the ledger's observable behavior: capacity
// enforcement, FIFO waitlist, promotion on cancellation, and the
// concurrency contract.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use gather_core::{
    Attendance, Event, EventStatus, LedgerError, RegistrationPayload, RegistrationStatus,
    RegistrationStore,
};
use gather_storage::MemoryRegistrationStore;

fn test_event(capacity: Option<i32>) -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::now_v7(),
        title: "Hack night".to_string(),
        description: String::new(),
        starts_at: now + Duration::days(7),
        ends_at: None,
        location: None,
        registration_deadline: None,
        capacity,
        status: EventStatus::Published,
        tags: vec![],
        organizers: vec![],
        link: None,
        image_urls: vec![],
        questions: vec![],
        created_at: now,
        updated_at: now,
    }
}

fn payload(name: &str) -> RegistrationPayload {
    RegistrationPayload {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        answers: json!({}),
    }
}

fn store_with_event(capacity: Option<i32>) -> (MemoryRegistrationStore, Uuid) {
    let store = MemoryRegistrationStore::new();
    let event = test_event(capacity);
    let event_id = event.id;
    store.insert_event(event);
    (store, event_id)
}

// ============================================
// Placement and waitlist ordering
// ============================================

#[tokio::test]
async fn fills_capacity_then_waitlists_in_order() {
    let (store, event_id) = store_with_event(Some(2));
    let users: Vec<Uuid> = (0..5).map(|_| Uuid::now_v7()).collect();

    for (i, user) in users.iter().enumerate() {
        let outcome = store.register(event_id, *user, payload("U")).await.unwrap();
        if i < 2 {
            assert_eq!(outcome.registration.status, RegistrationStatus::Active);
            assert_eq!(outcome.waitlist_position, None);
        } else {
            assert_eq!(outcome.registration.status, RegistrationStatus::Waitlisted);
            assert_eq!(outcome.registration.position, Some(i as i64 - 1));
            assert_eq!(outcome.waitlist_position, Some(i as u32 - 1));
        }
    }

    let counts = store.counts(event_id).await.unwrap();
    assert_eq!(counts.active, 2);
    assert_eq!(counts.waitlisted, 3);
}

#[tokio::test]
async fn unbounded_event_never_waitlists() {
    let (store, event_id) = store_with_event(None);
    for _ in 0..20 {
        let outcome = store
            .register(event_id, Uuid::now_v7(), payload("U"))
            .await
            .unwrap();
        assert_eq!(outcome.registration.status, RegistrationStatus::Active);
    }
    assert_eq!(store.counts(event_id).await.unwrap().active, 20);
}

#[tokio::test]
async fn duplicate_register_is_rejected() {
    let (store, event_id) = store_with_event(Some(10));
    let user = Uuid::now_v7();

    store.register(event_id, user, payload("A")).await.unwrap();
    let err = store.register(event_id, user, payload("A")).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRegistered { .. }));
    assert!(!err.is_retryable());

    // Waitlisted users are just as registered
    let (store, event_id) = store_with_event(Some(0));
    let user = Uuid::now_v7();
    store.register(event_id, user, payload("B")).await.unwrap();
    let err = store.register(event_id, user, payload("B")).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyRegistered { .. }));
}

#[tokio::test]
async fn positions_are_not_reused_after_waitlist_cancellation() {
    let (store, event_id) = store_with_event(Some(1));
    let first = Uuid::now_v7();
    let gone = Uuid::now_v7();

    store.register(event_id, first, payload("A")).await.unwrap();
    let w1 = store.register(event_id, gone, payload("B")).await.unwrap();
    assert_eq!(w1.registration.position, Some(1));

    store.unregister(event_id, gone).await.unwrap();

    // Position 1 was consumed; the next arrival gets 2, ranked first
    let w2 = store
        .register(event_id, Uuid::now_v7(), payload("C"))
        .await
        .unwrap();
    assert_eq!(w2.registration.position, Some(2));
    assert_eq!(w2.waitlist_position, Some(1));
}

// ============================================
// Registration window and unknown events
// ============================================

#[tokio::test]
async fn closed_registration_writes_nothing() {
    let store = MemoryRegistrationStore::new();
    let mut event = test_event(Some(5));
    event.registration_deadline = Some(Utc::now() - Duration::hours(1));
    let event_id = event.id;
    store.insert_event(event);

    let user = Uuid::now_v7();
    let err = store.register(event_id, user, payload("E")).await.unwrap_err();
    assert!(matches!(err, LedgerError::RegistrationClosed(_)));
    assert_eq!(store.registration_count(), 0);
    assert!(store.registration_for(event_id, user).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_event_is_reported() {
    let store = MemoryRegistrationStore::new();
    let err = store
        .register(Uuid::now_v7(), Uuid::now_v7(), payload("X"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EventNotFound(_)));
}

#[tokio::test]
async fn unregister_without_registration_fails() {
    let (store, event_id) = store_with_event(Some(2));
    let err = store.unregister(event_id, Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotRegistered { .. }));

    // A cancelled registration is not cancellable again
    let user = Uuid::now_v7();
    store.register(event_id, user, payload("A")).await.unwrap();
    store.unregister(event_id, user).await.unwrap();
    let err = store.unregister(event_id, user).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotRegistered { .. }));
}

// ============================================
// Promotion
// ============================================

#[tokio::test]
async fn capacity_two_walkthrough() {
    // Register A, B -> active; C, D -> waitlisted 1, 2; cancel A -> C
    // promoted, D ranked 1; cancel D -> no promotion, counts hold
    let (store, event_id) = store_with_event(Some(2));
    let (a, b, c, d) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

    store.register(event_id, a, payload("A")).await.unwrap();
    store.register(event_id, b, payload("B")).await.unwrap();
    assert_eq!(store.counts(event_id).await.unwrap().active, 2);

    let c_out = store.register(event_id, c, payload("C")).await.unwrap();
    assert_eq!(c_out.waitlist_position, Some(1));
    let d_out = store.register(event_id, d, payload("D")).await.unwrap();
    assert_eq!(d_out.waitlist_position, Some(2));

    store.unregister(event_id, a).await.unwrap();

    let a_reg = store.registration_for(event_id, a).await.unwrap().unwrap();
    assert_eq!(a_reg.status, RegistrationStatus::Cancelled);

    let c_reg = store.registration_for(event_id, c).await.unwrap().unwrap();
    assert_eq!(c_reg.status, RegistrationStatus::Active);
    assert_eq!(c_reg.position, None);

    let d_reg = store.registration_for(event_id, d).await.unwrap().unwrap();
    assert_eq!(d_reg.status, RegistrationStatus::Waitlisted);
    assert_eq!(d_reg.position, Some(2));
    assert_eq!(store.waitlist_position(event_id, d).await.unwrap(), Some(1));

    store.unregister(event_id, d).await.unwrap();
    let counts = store.counts(event_id).await.unwrap();
    assert_eq!(counts.active, 2);
    assert_eq!(counts.waitlisted, 0);
    let b_reg = store.registration_for(event_id, b).await.unwrap().unwrap();
    assert_eq!(b_reg.status, RegistrationStatus::Active);
}

#[tokio::test]
async fn cancelling_waitlisted_touches_nothing_else() {
    let (store, event_id) = store_with_event(Some(1));
    let active = Uuid::now_v7();
    let w1 = Uuid::now_v7();
    let w2 = Uuid::now_v7();
    let w3 = Uuid::now_v7();

    store.register(event_id, active, payload("A")).await.unwrap();
    for u in [w1, w2, w3] {
        store.register(event_id, u, payload("W")).await.unwrap();
    }

    store.unregister(event_id, w2).await.unwrap();

    let r1 = store.registration_for(event_id, w1).await.unwrap().unwrap();
    let r3 = store.registration_for(event_id, w3).await.unwrap().unwrap();
    assert_eq!(r1.position, Some(1));
    assert_eq!(r3.position, Some(3));
    assert_eq!(store.waitlist_position(event_id, w1).await.unwrap(), Some(1));
    assert_eq!(store.waitlist_position(event_id, w3).await.unwrap(), Some(2));
    assert_eq!(store.waitlist_position(event_id, w2).await.unwrap(), None);
    assert_eq!(
        store.registration_for(event_id, active).await.unwrap().unwrap().status,
        RegistrationStatus::Active
    );
}

#[tokio::test]
async fn waitlist_rank_for_non_waitlisted_is_none() {
    let (store, event_id) = store_with_event(Some(1));
    let active = Uuid::now_v7();
    store.register(event_id, active, payload("A")).await.unwrap();

    assert_eq!(store.waitlist_position(event_id, active).await.unwrap(), None);
    assert_eq!(
        store.waitlist_position(event_id, Uuid::now_v7()).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn unbounded_event_cancellation_skips_promotion() {
    // No capacity means nobody is ever waitlisted, so cancellation has
    // nothing to promote
    let (store, event_id) = store_with_event(None);
    let user = Uuid::now_v7();
    store.register(event_id, user, payload("A")).await.unwrap();
    store.register(event_id, Uuid::now_v7(), payload("B")).await.unwrap();

    store.unregister(event_id, user).await.unwrap();
    let counts = store.counts(event_id).await.unwrap();
    assert_eq!(counts.active, 1);
    assert_eq!(counts.waitlisted, 0);
}

// ============================================
// History retention
// ============================================

#[tokio::test]
async fn reregistration_creates_a_fresh_row() {
    let (store, event_id) = store_with_event(Some(2));
    let user = Uuid::now_v7();

    let first = store.register(event_id, user, payload("A")).await.unwrap();
    store.unregister(event_id, user).await.unwrap();
    let second = store.register(event_id, user, payload("A")).await.unwrap();

    assert_ne!(first.registration.id, second.registration.id);
    assert_eq!(second.registration.status, RegistrationStatus::Active);

    // Both attempts are retained
    let all = store.list_for_event(event_id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|r| r.is_cancelled()).count(), 1);

    // The live row is preferred over the cancelled one
    let current = store.registration_for(event_id, user).await.unwrap().unwrap();
    assert_eq!(current.id, second.registration.id);
}

// ============================================
// Check-in
// ============================================

#[tokio::test]
async fn check_in_stamps_attendance() {
    let (store, event_id) = store_with_event(None);
    let user = Uuid::now_v7();
    store.register(event_id, user, payload("A")).await.unwrap();

    let reg = store
        .set_attendance(event_id, user, Attendance::Attended)
        .await
        .unwrap();
    assert_eq!(reg.attendance, Attendance::Attended);
    assert!(reg.checked_in_at.is_some());

    let reg = store
        .set_attendance(event_id, user, Attendance::NoShow)
        .await
        .unwrap();
    assert_eq!(reg.attendance, Attendance::NoShow);

    let err = store
        .set_attendance(event_id, Uuid::now_v7(), Attendance::Attended)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotRegistered { .. }));
}

// ============================================
// Concurrency
// ============================================

#[tokio::test]
async fn concurrent_registers_never_exceed_capacity() {
    let (store, event_id) = store_with_event(Some(5));
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .register(event_id, Uuid::now_v7(), payload(&format!("U{i}")))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let counts = store.counts(event_id).await.unwrap();
    assert_eq!(counts.active, 5);
    assert_eq!(counts.waitlisted, 15);

    // Waitlist positions are unique and dense from this all-at-once burst
    let mut positions: Vec<i64> = store
        .list_for_event(event_id)
        .await
        .unwrap()
        .iter()
        .filter(|r| r.is_waitlisted())
        .filter_map(|r| r.position)
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, (1..=15).collect::<Vec<i64>>());
}

#[tokio::test]
async fn concurrent_cancellations_promote_distinct_rows() {
    let (store, event_id) = store_with_event(Some(5));
    let store = Arc::new(store);

    let actives: Vec<Uuid> = (0..5).map(|_| Uuid::now_v7()).collect();
    for user in &actives {
        store.register(event_id, *user, payload("A")).await.unwrap();
    }
    for _ in 0..10 {
        store
            .register(event_id, Uuid::now_v7(), payload("W"))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for user in &actives {
        let store = store.clone();
        let user = *user;
        handles.push(tokio::spawn(
            async move { store.unregister(event_id, user).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Each vacancy promoted exactly one distinct row: still 5 active, and
    // the survivors are the 5 lowest positions
    let all = store.list_for_event(event_id).await.unwrap();
    let active_now: Vec<&gather_core::Registration> =
        all.iter().filter(|r| r.is_active()).collect();
    assert_eq!(active_now.len(), 5);
    assert!(active_now.iter().all(|r| r.position.is_none()));

    let mut remaining: Vec<i64> = all
        .iter()
        .filter(|r| r.is_waitlisted())
        .filter_map(|r| r.position)
        .collect();
    remaining.sort_unstable();
    assert_eq!(remaining, (6..=10).collect::<Vec<i64>>());
}

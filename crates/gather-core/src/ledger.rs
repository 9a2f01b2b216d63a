// Registration ledger decision logic
//
// Pure functions shared by every RegistrationStore backend. The capacity
// decision, the waitlist position assignment, and the promotion pick are
// defined once here; each backend runs them inside its own atomicity
// discipline (transaction + row lock for Postgres, a process-wide lock in
// memory) so the decision and the write are atomic per event.

use uuid::Uuid;

use crate::registration::Registration;

/// Where a new registration attempt lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Active,
    Waitlisted { position: i64 },
}

/// Decide placement for a new attempt given the event's current tallies.
///
/// `active_count` and `max_position` must be read under the same lock that
/// writes the resulting row, otherwise two attempts can both observe a free
/// slot and both land active.
pub fn decide_placement(
    capacity: Option<i32>,
    active_count: i64,
    max_position: Option<i64>,
) -> Placement {
    match capacity {
        Some(cap) if active_count >= i64::from(cap) => Placement::Waitlisted {
            position: max_position.unwrap_or(0) + 1,
        },
        _ => Placement::Active,
    }
}

/// Pick the registration to promote after an active cancellation: lowest
/// waitlist position wins, creation order breaks ties.
pub fn promotion_candidate(registrations: &[Registration]) -> Option<&Registration> {
    registrations
        .iter()
        .filter(|r| r.is_waitlisted())
        .min_by_key(|r| (r.position.unwrap_or(i64::MAX), r.created_at))
}

/// 1-based rank of `user_id` among waitlisted registrations, ordered by
/// position ascending. `None` when the user is not waitlisted.
pub fn waitlist_rank(registrations: &[Registration], user_id: Uuid) -> Option<u32> {
    let mut waitlisted: Vec<&Registration> =
        registrations.iter().filter(|r| r.is_waitlisted()).collect();
    waitlisted.sort_by_key(|r| (r.position.unwrap_or(i64::MAX), r.created_at));
    waitlisted
        .iter()
        .position(|r| r.user_id == user_id)
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Attendance, RegistrationStatus};
    use chrono::{Duration, Utc};

    fn reg(user_id: Uuid, status: RegistrationStatus, position: Option<i64>) -> Registration {
        let now = Utc::now() + Duration::milliseconds(position.unwrap_or(0));
        Registration {
            id: Uuid::now_v7(),
            event_id: Uuid::now_v7(),
            user_id,
            status,
            position,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            answers: serde_json::json!({}),
            attendance: Attendance::Pending,
            checked_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unbounded_events_always_place_active() {
        assert_eq!(decide_placement(None, 10_000, Some(3)), Placement::Active);
    }

    #[test]
    fn placement_flips_to_waitlist_at_capacity() {
        assert_eq!(decide_placement(Some(2), 1, None), Placement::Active);
        assert_eq!(
            decide_placement(Some(2), 2, None),
            Placement::Waitlisted { position: 1 }
        );
        assert_eq!(
            decide_placement(Some(2), 2, Some(7)),
            Placement::Waitlisted { position: 8 }
        );
    }

    #[test]
    fn over_capacity_still_waitlists() {
        // Capacity lowered after the fact: active count may exceed it
        assert_eq!(
            decide_placement(Some(1), 3, Some(1)),
            Placement::Waitlisted { position: 2 }
        );
    }

    #[test]
    fn promotion_picks_lowest_position() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let regs = vec![
            reg(a, RegistrationStatus::Waitlisted, Some(4)),
            reg(b, RegistrationStatus::Waitlisted, Some(2)),
            reg(Uuid::now_v7(), RegistrationStatus::Active, None),
            reg(Uuid::now_v7(), RegistrationStatus::Cancelled, Some(1)),
        ];
        assert_eq!(promotion_candidate(&regs).map(|r| r.user_id), Some(b));
    }

    #[test]
    fn promotion_returns_none_when_no_waitlist() {
        let regs = vec![
            reg(Uuid::now_v7(), RegistrationStatus::Active, None),
            reg(Uuid::now_v7(), RegistrationStatus::Cancelled, Some(3)),
        ];
        assert!(promotion_candidate(&regs).is_none());
    }

    #[test]
    fn rank_skips_non_waitlisted_rows_and_gaps() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        // Positions 2 and 9 with a cancelled 1 in between: ranks stay dense
        let regs = vec![
            reg(Uuid::now_v7(), RegistrationStatus::Cancelled, Some(1)),
            reg(a, RegistrationStatus::Waitlisted, Some(2)),
            reg(b, RegistrationStatus::Waitlisted, Some(9)),
            reg(Uuid::now_v7(), RegistrationStatus::Active, None),
        ];
        assert_eq!(waitlist_rank(&regs, a), Some(1));
        assert_eq!(waitlist_rank(&regs, b), Some(2));
    }

    #[test]
    fn rank_is_none_for_active_cancelled_or_unknown_users() {
        let active = Uuid::now_v7();
        let cancelled = Uuid::now_v7();
        let regs = vec![
            reg(active, RegistrationStatus::Active, None),
            reg(cancelled, RegistrationStatus::Cancelled, Some(1)),
        ];
        assert_eq!(waitlist_rank(&regs, active), None);
        assert_eq!(waitlist_rank(&regs, cancelled), None);
        assert_eq!(waitlist_rank(&regs, Uuid::now_v7()), None);
    }
}

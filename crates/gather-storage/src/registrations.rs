// PostgreSQL registration ledger
//
// Linearizability per event: every mutating operation opens a transaction
// and locks the event row (SELECT ... FOR UPDATE) before reading tallies or
// writing registration rows, so the capacity decision and the write that
// claims a slot are atomic with respect to concurrent register/unregister
// calls on the same event. The partial unique index on live (event_id,
// user_id) pairs backstops duplicate registration races; serialization
// failures map to the retryable CapacityConflict.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use gather_core::{
    decide_placement, Attendance, Event, LedgerError, Placement, Registration,
    RegistrationCounts, RegistrationOutcome, RegistrationPayload, RegistrationStatus,
    RegistrationStore, Result,
};

use crate::models::{EventRow, RegistrationRow};

const EVENT_COLUMNS: &str = "id, title, description, starts_at, ends_at, location, \
     registration_deadline, capacity, status, tags, organizers, link, image_urls, questions, \
     created_at, updated_at";

const REGISTRATION_COLUMNS: &str = "id, event_id, user_id, status, position, name, email, \
     answers, attendance, checked_in_at, created_at, updated_at";

pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lock the event row for the rest of the transaction
    async fn lock_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 FOR UPDATE"
        ))
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        Ok(row.map(Event::from))
    }

    async fn live_registration(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RegistrationRow>> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 AND user_id = $2 AND status <> 'cancelled'"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        Ok(row)
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    #[instrument(skip(self, payload))]
    async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        payload: RegistrationPayload,
    ) -> Result<RegistrationOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::store(e.to_string()))?;

        let event = self
            .lock_event(&mut tx, event_id)
            .await?
            .ok_or(LedgerError::EventNotFound(event_id))?;

        if !event.is_registration_open() {
            return Err(LedgerError::RegistrationClosed(event_id));
        }

        if self
            .live_registration(&mut tx, event_id, user_id)
            .await?
            .is_some()
        {
            return Err(LedgerError::AlreadyRegistered { event_id, user_id });
        }

        let (active_count, max_position): (i64, Option<i64>) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'active'),
                MAX(position) FILTER (WHERE status = 'waitlisted')
            FROM registrations
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        let placement = decide_placement(event.capacity, active_count, max_position);
        let (status, position) = match placement {
            Placement::Active => (RegistrationStatus::Active, None),
            Placement::Waitlisted { position } => (RegistrationStatus::Waitlisted, Some(position)),
        };

        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "INSERT INTO registrations (id, event_id, user_id, status, position, name, email, answers) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(event_id)
        .bind(user_id)
        .bind(status.to_string())
        .bind(position)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.answers)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_insert_error(event_id, user_id, e))?;

        // 1-based rank among waitlisted rows; positions are unique per event
        let waitlist_position = match position {
            Some(pos) => {
                let (rank,): (i64,) = sqlx::query_as(
                    r#"
                    SELECT COUNT(*)
                    FROM registrations
                    WHERE event_id = $1 AND status = 'waitlisted' AND position <= $2
                    "#,
                )
                .bind(event_id)
                .bind(pos)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_db_error(event_id, e))?;
                Some(rank as u32)
            }
            None => None,
        };

        tx.commit()
            .await
            .map_err(|e| map_db_error(event_id, e))?;

        debug!(%event_id, %user_id, status = %status, "registration created");
        Ok(RegistrationOutcome {
            registration: row.into(),
            waitlist_position,
        })
    }

    #[instrument(skip(self))]
    async fn unregister(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::store(e.to_string()))?;

        // Deleted events keep their registrations; cancellation still works,
        // with no capacity to free and therefore no promotion
        let event = self.lock_event(&mut tx, event_id).await?;

        let cancelled = self
            .live_registration(&mut tx, event_id, user_id)
            .await?
            .ok_or(LedgerError::NotRegistered { event_id, user_id })?;

        sqlx::query(
            r#"
            UPDATE registrations
            SET status = 'cancelled', updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(cancelled.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        let was_active = RegistrationStatus::from(cancelled.status.as_str())
            == RegistrationStatus::Active;
        let capacity_limited = event.as_ref().is_some_and(|e| e.capacity.is_some());

        if was_active && capacity_limited {
            let head = sqlx::query_as::<_, RegistrationRow>(&format!(
                "SELECT {REGISTRATION_COLUMNS} FROM registrations \
                 WHERE event_id = $1 AND status = 'waitlisted' \
                 ORDER BY position ASC, created_at ASC \
                 LIMIT 1"
            ))
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_db_error(event_id, e))?;

            if let Some(head) = head {
                sqlx::query(
                    r#"
                    UPDATE registrations
                    SET status = 'active', position = NULL, updated_at = now()
                    WHERE id = $1
                    "#,
                )
                .bind(head.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(event_id, e))?;

                debug!(%event_id, promoted_user = %head.user_id, "promoted from waitlist");
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(event_id, e))?;

        debug!(%event_id, %user_id, "registration cancelled");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn registration_for(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Registration>> {
        // Prefer the live row; fall back to the latest cancelled attempt
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 AND user_id = $2 \
             ORDER BY (status <> 'cancelled') DESC, created_at DESC \
             LIMIT 1"
        ))
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        Ok(row.map(Registration::from))
    }

    #[instrument(skip(self))]
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations \
             WHERE event_id = $1 \
             ORDER BY created_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }

    #[instrument(skip(self))]
    async fn waitlist_position(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<u32>> {
        let rank: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM registrations
            WHERE event_id = $1 AND status = 'waitlisted'
              AND position <= (
                  SELECT position FROM registrations
                  WHERE event_id = $1 AND user_id = $2 AND status = 'waitlisted'
              )
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        // COUNT over an empty subquery comparison yields 0 when the user is
        // not waitlisted
        Ok(rank.and_then(|(n,)| (n > 0).then_some(n as u32)))
    }

    #[instrument(skip(self))]
    async fn counts(&self, event_id: Uuid) -> Result<RegistrationCounts> {
        let (active, waitlisted): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'active'),
                COUNT(*) FILTER (WHERE status = 'waitlisted')
            FROM registrations
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(event_id, e))?;

        Ok(RegistrationCounts {
            active: active as u32,
            waitlisted: waitlisted as u32,
        })
    }

    #[instrument(skip(self))]
    async fn set_attendance(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        attendance: Attendance,
    ) -> Result<Registration> {
        let checked_in_at = (attendance == Attendance::Attended).then(Utc::now);

        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "UPDATE registrations \
             SET attendance = $3, checked_in_at = COALESCE($4, checked_in_at), updated_at = now() \
             WHERE event_id = $1 AND user_id = $2 AND status <> 'cancelled' \
             RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(event_id)
        .bind(user_id)
        .bind(attendance.to_string())
        .bind(checked_in_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(event_id, e))?
        .ok_or(LedgerError::NotRegistered { event_id, user_id })?;

        Ok(row.into())
    }
}

/// Map a database error to the ledger taxonomy. Serialization failures and
/// deadlocks are retryable conflicts; everything else is a transient store
/// failure.
fn map_db_error(event_id: Uuid, err: sqlx::Error) -> LedgerError {
    if let sqlx::Error::Database(db) = &err {
        if matches!(db.code().as_deref(), Some("40001") | Some("40P01")) {
            return LedgerError::CapacityConflict(event_id);
        }
    }
    LedgerError::StoreUnavailable(err.to_string())
}

/// Insert-specific mapping: a unique violation on the live-pair index means
/// a concurrent register won the race
fn map_insert_error(event_id: Uuid, user_id: Uuid, err: sqlx::Error) -> LedgerError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return LedgerError::AlreadyRegistered { event_id, user_id };
        }
    }
    map_db_error(event_id, err)
}

// Event service for business logic

use anyhow::Result;
use gather_core::Event;
use gather_storage::{
    models::{CreateEvent, UpdateEvent},
    Database,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct EventService {
    db: Arc<Database>,
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateEvent) -> Result<Event> {
        let row = self.db.create_event(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Event>> {
        let row = self.db.get_event(id).await?;
        Ok(row.map(Into::into))
    }

    /// `public_only` hides hidden and test events from the listing
    pub async fn list(&self, public_only: bool) -> Result<Vec<Event>> {
        let rows = self.db.list_events(public_only).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: Uuid, input: UpdateEvent) -> Result<Option<Event>> {
        let row = self.db.update_event(id, input).await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_event(id).await
    }
}

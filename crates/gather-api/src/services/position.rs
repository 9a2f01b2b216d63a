// Position and application service for business logic

use anyhow::Result;
use gather_core::{Application, ApplicationStatus, Position};
use gather_storage::{
    models::{CreateApplication, CreatePosition, UpdatePosition},
    Database,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct PositionService {
    db: Arc<Database>,
}

impl PositionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreatePosition) -> Result<Position> {
        let row = self.db.create_position(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Position>> {
        let row = self.db.get_position(id).await?;
        Ok(row.map(Into::into))
    }

    /// `active_only` restricts to positions open for applications
    pub async fn list(&self, active_only: bool) -> Result<Vec<Position>> {
        let rows = self.db.list_positions(active_only).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: Uuid, input: UpdatePosition) -> Result<Option<Position>> {
        let row = self.db.update_position(id, input).await?;
        Ok(row.map(Into::into))
    }

    /// Submit an application; None means the user already applied
    pub async fn apply(&self, input: CreateApplication) -> Result<Option<Application>> {
        let row = self.db.create_application(input).await?;
        Ok(row.map(Into::into))
    }

    pub async fn get_application(
        &self,
        position_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Application>> {
        let row = self.db.get_application(position_id, user_id).await?;
        Ok(row.map(Into::into))
    }

    pub async fn list_applications(&self, position_id: Uuid) -> Result<Vec<Application>> {
        let rows = self.db.list_applications(position_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        let row = self
            .db
            .set_application_status(id, &status.to_string())
            .await?;
        Ok(row.map(Into::into))
    }
}

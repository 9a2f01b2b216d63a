// Project service for business logic

use anyhow::Result;
use gather_core::Project;
use gather_storage::{
    models::{CreateProject, UpdateProject},
    Database,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct ProjectService {
    db: Arc<Database>,
}

impl ProjectService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateProject) -> Result<Project> {
        let row = self.db.create_project(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Project>> {
        let row = self.db.get_project(id).await?;
        Ok(row.map(Into::into))
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let rows = self.db.list_projects().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: Uuid, input: UpdateProject) -> Result<Option<Project>> {
        let row = self.db.update_project(id, input).await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_project(id).await
    }
}

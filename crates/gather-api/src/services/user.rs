// User service for business logic

use anyhow::Result;
use gather_core::{User, UserRole};
use gather_storage::{
    models::{CreateUser, UpdateUser},
    Database,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Profile rows are created lazily on first write
    pub async fn upsert(&self, input: CreateUser) -> Result<User> {
        let row = self.db.upsert_user(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = self.db.get_user(id).await?;
        Ok(row.map(Into::into))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = self.db.get_user_by_email(email).await?;
        Ok(row.map(Into::into))
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = self.db.list_users().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(&self, id: Uuid, input: UpdateUser) -> Result<Option<User>> {
        let row = self.db.update_user(id, input).await?;
        Ok(row.map(Into::into))
    }

    pub async fn set_role(&self, id: Uuid, role: UserRole) -> Result<Option<User>> {
        let row = self.db.set_user_role(id, &role.to_string()).await?;
        Ok(row.map(Into::into))
    }
}

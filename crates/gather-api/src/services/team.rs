// Team roster service for business logic

use anyhow::Result;
use gather_core::{sort_roster, TeamMember};
use gather_storage::{
    models::{CreateTeamMember, UpdateTeamMember},
    Database,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct TeamService {
    db: Arc<Database>,
}

impl TeamService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateTeamMember) -> Result<TeamMember> {
        let row = self.db.create_team_member(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TeamMember>> {
        let row = self.db.get_team_member(id).await?;
        Ok(row.map(Into::into))
    }

    /// Roster in display order: role rank, then custom order, then name
    pub async fn roster(&self) -> Result<Vec<TeamMember>> {
        let rows = self.db.list_team_members().await?;
        let mut members: Vec<TeamMember> = rows.into_iter().map(Into::into).collect();
        sort_roster(&mut members);
        Ok(members)
    }

    pub async fn update(&self, id: Uuid, input: UpdateTeamMember) -> Result<Option<TeamMember>> {
        let row = self.db.update_team_member(id, input).await?;
        Ok(row.map(Into::into))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        self.db.delete_team_member(id).await
    }
}

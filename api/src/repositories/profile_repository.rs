use anyhow::Result;
use sea_orm::prelude::*;
use sea_orm::{ActiveValue, QueryOrder, QuerySelect};
use shared::entity::profiles;
use std::sync::Arc;

pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<profiles::Model>> {
        let profile = profiles::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(profile)
    }

    pub async fn list_all(&self) -> Result<Vec<profiles::Model>> {
        let profiles = profiles::Entity::find()
            .order_by_asc(profiles::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(profiles)
    }

    pub async fn active_ids(&self) -> Result<Vec<i64>> {
        let ids = profiles::Entity::find()
            .select_only()
            .column(profiles::Column::Id)
            .filter(profiles::Column::IsActive.eq(true))
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    pub async fn set_role(&self, profile: profiles::Model, role: &str) -> Result<profiles::Model> {
        let mut active: profiles::ActiveModel = profile.into();
        active.role = ActiveValue::Set(role.to_string());
        active.updated_at = ActiveValue::Set(Some(chrono::Utc::now()));
        let profile = active.update(self.db.as_ref()).await?;
        Ok(profile)
    }
}

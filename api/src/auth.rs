//! Caller identity from the `x-user-id` header

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::entity::profiles;
use shared::Role;
use std::sync::Arc;

use crate::error::AppError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub profile: profiles::Model,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(profile: profiles::Model) -> Self {
        let role = profile.role.parse().unwrap_or(Role::User);
        Self { profile, role }
    }

    pub fn id(&self) -> i64 {
        self.profile.id
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("admin role required"))
        }
    }

    /// Owner of the resource, or an admin
    pub fn can_manage(&self, owner_id: i64) -> bool {
        self.id() == owner_id || self.is_admin()
    }
}

pub fn parse_user_id(parts: &Parts) -> Option<i64> {
    parts
        .headers
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let user_id = parse_user_id(parts).ok_or(AppError::Unauthorized)?;
        let profile = state
            .profiles
            .find_profile(user_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::Unauthorized)?;
        Ok(CurrentUser::new(profile))
    }
}

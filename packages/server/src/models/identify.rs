use chrono::{DateTime, Local};
use serde::Serialize;

use crate::entity::user;

/// Placeholder department; profiles do not record one.
pub const DEFAULT_DEPARTMENT: &str = "Не указан";

/// Profile of an identified person.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserProfileResponse {
    /// Identifier, zero-padded to 8 digits.
    #[schema(example = "10000000")]
    pub id: String,
    #[schema(example = "Гырдымов Антон Вячеславович")]
    pub name: String,
    #[schema(example = "CEO")]
    pub position: String,
    #[schema(example = "Не указан")]
    pub department: String,
    /// Time of this identification (`YYYY-MM-DD HH:MM`, server local time).
    #[schema(example = "2024-05-14 09:30")]
    pub last_seen: String,
}

impl UserProfileResponse {
    pub fn from_model(model: user::Model, seen_at: DateTime<Local>) -> Self {
        Self {
            id: format!("{:08}", model.id),
            name: model.full_name,
            position: model.role,
            department: DEFAULT_DEPARTMENT.to_string(),
            last_seen: seen_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Successful identification.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct IdentifyResponse {
    /// Always `"success"`.
    #[schema(example = "success")]
    pub status: &'static str,
    pub user: UserProfileResponse,
}

impl IdentifyResponse {
    pub fn success(user: UserProfileResponse) -> Self {
        Self {
            status: "success",
            user,
        }
    }
}

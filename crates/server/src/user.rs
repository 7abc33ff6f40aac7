//! The authenticated user entity and profile endpoint.
//!
//! The server keeps its own minimal view of the users table: the auth
//! middleware resolves credentials against it and the resulting model is
//! what handlers receive as an `Extension`.

use api_types::user::Profile;
use axum::{Extension, Json};
use sea_orm::entity::prelude::*;

use crate::ServerError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub household_id: Option<String>,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn profile(Extension(user): Extension<Model>) -> Result<Json<Profile>, ServerError> {
    Ok(Json(Profile {
        username: user.username,
        household_id: user.household_id,
        role: match user.role.as_str() {
            "admin" => api_types::Role::Admin,
            _ => api_types::Role::Member,
        },
    }))
}

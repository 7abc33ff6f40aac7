//! The `Household` groups users that share expenses. A user belongs to at
//! most one household at a time; exactly one member is the admin.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// A household with its ordered member list.
///
/// Invariant: `admin_id` names one of `members`, and member order is join
/// order (admin succession picks the first remaining member).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: String,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl Household {
    pub fn new(
        name: String,
        description: Option<String>,
        admin_id: &str,
        invite_code: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            admin_id: admin_id.to_string(),
            invite_code,
            created_at,
            members: Vec::new(),
        }
    }

    pub fn member(&self, username: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.username == username)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "households")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub admin_id: String,
    #[sea_orm(unique)]
    pub invite_code: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::memberships::Entity")]
    Members,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Household> for ActiveModel {
    fn from(value: &Household) -> Self {
        Self {
            id: ActiveValue::Set(value.id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            admin_id: ActiveValue::Set(value.admin_id.clone()),
            invite_code: ActiveValue::Set(value.invite_code.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

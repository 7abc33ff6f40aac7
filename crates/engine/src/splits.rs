//! Expense split entries.
//!
//! Each split assigns a share of an expense to one household member.
//! `position` preserves the order the splits were submitted in.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub username: String,
    pub amount_minor: i64,
    pub position: i32,
}

impl Split {
    pub fn new(expense_id: Uuid, username: String, amount_minor: i64, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_id,
            username,
            amount_minor,
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub username: String,
    pub amount_minor: i64,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Split> for ActiveModel {
    fn from(split: &Split) -> Self {
        Self {
            id: ActiveValue::Set(split.id.to_string()),
            expense_id: ActiveValue::Set(split.expense_id.to_string()),
            username: ActiveValue::Set(split.username.clone()),
            amount_minor: ActiveValue::Set(split.amount_minor),
            position: ActiveValue::Set(split.position),
        }
    }
}

impl TryFrom<Model> for Split {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("split not exists".to_string()))?,
            expense_id: Uuid::parse_str(&model.expense_id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            username: model.username,
            amount_minor: model.amount_minor,
            position: model.position,
        })
    }
}

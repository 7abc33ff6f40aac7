//! Expense primitives.
//!
//! An `Expense` is recorded once and never mutated: the payer, the amount
//! and the per-member split list are fixed at creation time.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine};

use super::splits::Split;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub household_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: Category,
    pub description: Option<String>,
    pub paid_by: String,
    pub occurred_at: DateTime<Utc>,
    /// Split entries in submission order. The amounts are stored as given;
    /// they are not required to sum to `amount_minor`.
    pub splits: Vec<Split>,
}

impl Expense {
    pub fn new(
        household_id: String,
        title: String,
        amount_minor: i64,
        category: Category,
        description: Option<String>,
        paid_by: String,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            household_id,
            title,
            amount_minor,
            category,
            description,
            paid_by,
            occurred_at,
            splits: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub household_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub description: Option<String>,
    pub paid_by: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
    #[sea_orm(
        belongs_to = "super::households::Entity",
        from = "Column::HouseholdId",
        to = "super::households::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Households,
}

impl Related<super::households::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Households.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            household_id: ActiveValue::Set(expense.household_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount_minor),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            paid_by: ActiveValue::Set(expense.paid_by.clone()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            household_id: model.household_id,
            title: model.title,
            amount_minor: model.amount_minor,
            category: Category::try_from(model.category.as_str()).unwrap_or_default(),
            description: model.description,
            paid_by: model.paid_by,
            occurred_at: model.occurred_at,
            splits: Vec::new(),
        })
    }
}

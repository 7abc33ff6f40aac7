use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user inside their household.
///
/// Exactly one member per household is `admin`; everyone else is `member`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Healthcare,
    Shopping,
    #[default]
    Other,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Profile {
        pub username: String,
        pub household_id: Option<String>,
        pub role: Role,
    }
}

pub mod household {
    use super::*;

    /// Request body for creating a household.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct HouseholdNew {
        pub name: String,
        pub description: Option<String>,
    }

    /// Request body for joining via invite code.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct HouseholdJoin {
        pub invite_code: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub username: String,
        pub role: Role,
        pub joined_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HouseholdView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub admin: String,
        /// The only share mechanism: shown to members so they can invite
        /// others.
        pub invite_code: String,
        pub created_at: DateTime<Utc>,
        pub members: Vec<MemberView>,
        pub member_count: usize,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitNew {
        pub username: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: Option<Category>,
        pub description: Option<String>,
        pub split_between: Vec<SplitNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitView {
        pub username: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        /// Expense id (UUID).
        ///
        /// This is serialized as a string in JSON.
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: Category,
        pub description: Option<String>,
        pub paid_by: String,
        pub occurred_at: DateTime<Utc>,
        pub split_between: Vec<SplitView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserBalance {
        pub owes_minor: i64,
        pub owed_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub total_minor: i64,
        pub by_category: HashMap<Category, i64>,
        pub user_balances: HashMap<String, UserBalance>,
    }
}

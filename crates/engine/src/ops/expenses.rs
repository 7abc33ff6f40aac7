use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, EngineError, Expense, ExpenseSummary, ResultEngine, Split, expenses, splits, summary,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Records a shared expense for the caller's household.
    ///
    /// The caller is the payer. Split amounts are persisted exactly as
    /// submitted; they are not required to sum to `amount_minor`.
    pub async fn record_expense(
        &self,
        user_id: &str,
        title: &str,
        amount_minor: i64,
        category: Category,
        description: Option<&str>,
        split_between: &[(String, i64)],
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Expense> {
        let title = normalize_required_name(title, "expense")?;
        let description = normalize_optional_text(description);

        let household_id = self.current_household_id(user_id).await?;
        let lock = self.household_lock(&household_id);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            // Membership is re-checked under the lock; a concurrent leave
            // may have removed the payer.
            self.require_member(&db_tx, &household_id, user_id).await?;

            let mut expense = Expense::new(
                household_id.clone(),
                title,
                amount_minor,
                category,
                description,
                user_id.to_string(),
                occurred_at,
            )?;

            for (position, (username, split_minor)) in split_between.iter().enumerate() {
                if self
                    .membership(&db_tx, &household_id, username)
                    .await?
                    .is_none()
                {
                    return Err(EngineError::Forbidden(format!(
                        "split user {username} is not a member of this household"
                    )));
                }
                expense.splits.push(Split::new(
                    expense.id,
                    username.clone(),
                    *split_minor,
                    position as i32,
                ));
            }

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            for split in &expense.splits {
                splits::ActiveModel::from(split).insert(&db_tx).await?;
            }

            Ok(expense)
        })
    }

    /// Lists the household's expenses with their splits, newest first.
    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        let household_id = self.current_household_id(user_id).await?;

        with_tx!(self, |db_tx| {
            self.load_expenses(&db_tx, &household_id).await
        })
    }

    /// Computes the household totals, per-category sums and per-user
    /// owes/owed balances over all recorded expenses.
    pub async fn summarize(&self, user_id: &str) -> ResultEngine<ExpenseSummary> {
        let household_id = self.current_household_id(user_id).await?;

        with_tx!(self, |db_tx| {
            let expenses = self.load_expenses(&db_tx, &household_id).await?;
            Ok(summary::summarize(&expenses))
        })
    }

    async fn load_expenses(
        &self,
        db: &sea_orm::DatabaseTransaction,
        household_id: &str,
    ) -> ResultEngine<Vec<Expense>> {
        let expense_models: Vec<expenses::Model> = expenses::Entity::find()
            .filter(expenses::Column::HouseholdId.eq(household_id.to_string()))
            .order_by_desc(expenses::Column::OccurredAt)
            .all(db)
            .await?;

        let ids: Vec<String> = expense_models.iter().map(|m| m.id.clone()).collect();
        let split_models: Vec<splits::Model> = splits::Entity::find()
            .filter(splits::Column::ExpenseId.is_in(ids))
            .order_by_asc(splits::Column::Position)
            .all(db)
            .await?;

        let mut splits_by_expense: HashMap<Uuid, Vec<Split>> = HashMap::new();
        for model in split_models {
            let split = Split::try_from(model)?;
            splits_by_expense
                .entry(split.expense_id)
                .or_default()
                .push(split);
        }

        let mut out = Vec::with_capacity(expense_models.len());
        for model in expense_models {
            let mut expense = Expense::try_from(model)?;
            if let Some(splits) = splits_by_expense.remove(&expense.id) {
                expense.splits = splits;
            }
            out.push(expense);
        }
        Ok(out)
    }
}

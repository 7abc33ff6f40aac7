//! Balance computation over a household's expenses.
//!
//! The accumulation is per expense, per split entry: the payer's own split
//! entry contributes `amount - split` to the payer's `owed`; every other
//! entry contributes `split` to that user's `owes`. There is no pairwise
//! netting. Summation is commutative, so the result does not depend on
//! expense order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Category, Expense};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub owes_minor: i64,
    pub owed_minor: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_minor: i64,
    pub by_category: HashMap<Category, i64>,
    pub user_balances: HashMap<String, UserBalance>,
}

pub(crate) fn summarize(expenses: &[Expense]) -> ExpenseSummary {
    let mut summary = ExpenseSummary::default();

    for expense in expenses {
        summary.total_minor += expense.amount_minor;
        *summary.by_category.entry(expense.category).or_default() += expense.amount_minor;

        for split in &expense.splits {
            let balance = summary
                .user_balances
                .entry(split.username.clone())
                .or_default();
            if split.username == expense.paid_by {
                balance.owed_minor += expense.amount_minor - split.amount_minor;
            } else {
                balance.owes_minor += split.amount_minor;
            }
        }
    }

    summary
}

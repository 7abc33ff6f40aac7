//! Expense ledger endpoints.

use api_types::expense::{
    ExpenseListResponse, ExpenseNew, ExpenseView, SplitView, SummaryResponse, UserBalance,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::{ServerError, server::ServerState, user};

fn category_engine(category: api_types::Category) -> engine::Category {
    match category {
        api_types::Category::Food => engine::Category::Food,
        api_types::Category::Transportation => engine::Category::Transportation,
        api_types::Category::Entertainment => engine::Category::Entertainment,
        api_types::Category::Utilities => engine::Category::Utilities,
        api_types::Category::Healthcare => engine::Category::Healthcare,
        api_types::Category::Shopping => engine::Category::Shopping,
        api_types::Category::Other => engine::Category::Other,
    }
}

fn category_view(category: engine::Category) -> api_types::Category {
    match category {
        engine::Category::Food => api_types::Category::Food,
        engine::Category::Transportation => api_types::Category::Transportation,
        engine::Category::Entertainment => api_types::Category::Entertainment,
        engine::Category::Utilities => api_types::Category::Utilities,
        engine::Category::Healthcare => api_types::Category::Healthcare,
        engine::Category::Shopping => api_types::Category::Shopping,
        engine::Category::Other => api_types::Category::Other,
    }
}

fn expense_view(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        title: expense.title,
        amount_minor: expense.amount_minor,
        category: category_view(expense.category),
        description: expense.description,
        paid_by: expense.paid_by,
        occurred_at: expense.occurred_at,
        split_between: expense
            .splits
            .into_iter()
            .map(|split| SplitView {
                username: split.username,
                amount_minor: split.amount_minor,
            })
            .collect(),
    }
}

/// Handle requests for recording a new expense.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let split_between: Vec<(String, i64)> = payload
        .split_between
        .into_iter()
        .map(|split| (split.username, split.amount_minor))
        .collect();

    let expense = state
        .engine
        .record_expense(
            &user.username,
            &payload.title,
            payload.amount_minor,
            category_engine(payload.category.unwrap_or_default()),
            payload.description.as_deref(),
            &split_between,
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(expense_view(expense))))
}

/// Handle requests for listing the household's expenses, newest first.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(&user.username)
        .await?
        .into_iter()
        .map(expense_view)
        .collect();

    Ok(Json(ExpenseListResponse { expenses }))
}

/// Handle requests for the household expense summary.
pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state.engine.summarize(&user.username).await?;

    Ok(Json(SummaryResponse {
        total_minor: summary.total_minor,
        by_category: summary
            .by_category
            .into_iter()
            .map(|(category, sum)| (category_view(category), sum))
            .collect(),
        user_balances: summary
            .user_balances
            .into_iter()
            .map(|(username, balance)| {
                (
                    username,
                    UserBalance {
                        owes_minor: balance.owes_minor,
                        owed_minor: balance.owed_minor,
                    },
                )
            })
            .collect(),
    }))
}

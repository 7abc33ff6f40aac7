//! Household lifecycle endpoints.

use api_types::household::{HouseholdJoin, HouseholdNew, HouseholdView, MemberView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

fn role_view(role: engine::Role) -> api_types::Role {
    match role {
        engine::Role::Admin => api_types::Role::Admin,
        engine::Role::Member => api_types::Role::Member,
    }
}

fn household_view(household: engine::Household) -> HouseholdView {
    let members: Vec<MemberView> = household
        .members
        .into_iter()
        .map(|member| MemberView {
            username: member.username,
            role: role_view(member.role),
            joined_at: member.joined_at,
        })
        .collect();

    HouseholdView {
        id: household.id,
        name: household.name,
        description: household.description,
        admin: household.admin_id,
        invite_code: household.invite_code,
        created_at: household.created_at,
        member_count: members.len(),
        members,
    }
}

/// Handle requests for creating a new household.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<HouseholdNew>,
) -> Result<(StatusCode, Json<HouseholdView>), ServerError> {
    let household = state
        .engine
        .create_household(&user.username, &payload.name, payload.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(household_view(household))))
}

/// Handle requests for joining a household by invite code.
pub async fn join(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<HouseholdJoin>,
) -> Result<Json<HouseholdView>, ServerError> {
    let household = state
        .engine
        .join_household(&user.username, &payload.invite_code)
        .await?;

    Ok(Json(household_view(household)))
}

/// Handle requests for leaving the current household.
pub async fn leave(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<StatusCode, ServerError> {
    state.engine.leave_household(&user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for the caller's household details.
pub async fn details(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<HouseholdView>, ServerError> {
    let household = state.engine.household_snapshot(&user.username).await?;
    Ok(Json(household_view(household)))
}

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Household, Member, ResultEngine, Role, households, memberships, users,
};

use super::Engine;

impl Engine {
    pub(super) async fn find_household_by_id(
        &self,
        db: &DatabaseTransaction,
        household_id: &str,
    ) -> ResultEngine<Option<households::Model>> {
        households::Entity::find_by_id(household_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn find_household_by_code(
        &self,
        db: &DatabaseTransaction,
        invite_code: &str,
    ) -> ResultEngine<Option<households::Model>> {
        households::Entity::find()
            .filter(households::Column::InviteCode.eq(invite_code.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn membership(
        &self,
        db: &DatabaseTransaction,
        household_id: &str,
        username: &str,
    ) -> ResultEngine<Option<memberships::Model>> {
        memberships::Entity::find_by_id((household_id.to_string(), username.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_member(
        &self,
        db: &DatabaseTransaction,
        household_id: &str,
        username: &str,
    ) -> ResultEngine<memberships::Model> {
        self.membership(db, household_id, username).await?.ok_or_else(|| {
            EngineError::Forbidden(format!("{username} is not a member of this household"))
        })
    }

    /// Membership rows in join order (`joined_at`, then username as a
    /// tiebreak). Admin succession relies on this order.
    pub(super) async fn member_rows(
        &self,
        db: &DatabaseTransaction,
        household_id: &str,
    ) -> ResultEngine<Vec<memberships::Model>> {
        memberships::Entity::find()
            .filter(memberships::Column::HouseholdId.eq(household_id.to_string()))
            .order_by_asc(memberships::Column::JoinedAt)
            .order_by_asc(memberships::Column::Username)
            .all(db)
            .await
            .map_err(Into::into)
    }

    /// Write-back hook for the identity layer: keeps `users.household_id`
    /// and `users.role` in step with the membership rows. Always called
    /// inside the transaction that changes the membership.
    pub(super) async fn set_user_household(
        &self,
        db: &DatabaseTransaction,
        username: &str,
        household_id: Option<&str>,
        role: Role,
    ) -> ResultEngine<()> {
        let user = users::ActiveModel {
            username: ActiveValue::Set(username.to_string()),
            household_id: ActiveValue::Set(household_id.map(ToString::to_string)),
            role: ActiveValue::Set(role.as_str().to_string()),
            ..Default::default()
        };
        user.update(db).await?;
        Ok(())
    }

    /// Assembles a `Household` snapshot with its ordered member list.
    pub(super) async fn load_household(
        &self,
        db: &DatabaseTransaction,
        model: households::Model,
    ) -> ResultEngine<Household> {
        let rows = self.member_rows(db, &model.id).await?;
        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            members.push(Member {
                username: row.username,
                role: Role::try_from(row.role.as_str())?,
                joined_at: row.joined_at,
            });
        }

        Ok(Household {
            id: model.id,
            name: model.name,
            description: model.description,
            admin_id: model.admin_id,
            invite_code: model.invite_code,
            created_at: model.created_at,
            members,
        })
    }
}

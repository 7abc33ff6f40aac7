use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, Statement, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Household, Member, ResultEngine, Role, households, invite_codes, memberships,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Creates a household with the caller as sole member and admin.
    ///
    /// The returned snapshot includes the freshly allocated invite code;
    /// showing it to the creator is the only share mechanism.
    pub async fn create_household(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<Household> {
        let name = normalize_required_name(name, "household")?;
        let description = normalize_optional_text(description);

        // Creation serializes globally so two concurrent creations cannot
        // both reserve the same invite code.
        let _creation_guard = self.creation_lock.lock().await;

        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            if user.household_id.is_some() {
                return Err(EngineError::AlreadyMember(
                    "user already belongs to a household".to_string(),
                ));
            }

            let invite_code = self.allocate_invite_code(&db_tx).await?;
            let mut household =
                Household::new(name, description, user_id, invite_code, Utc::now());

            households::ActiveModel::from(&household).insert(&db_tx).await?;

            let admin_row = memberships::ActiveModel {
                household_id: ActiveValue::Set(household.id.clone()),
                username: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(Role::Admin.as_str().to_string()),
                joined_at: ActiveValue::Set(household.created_at),
            };
            admin_row.insert(&db_tx).await?;

            self.set_user_household(&db_tx, user_id, Some(&household.id), Role::Admin)
                .await?;

            household.members.push(Member {
                username: user_id.to_string(),
                role: Role::Admin,
                joined_at: household.created_at,
            });
            Ok(household)
        })
    }

    /// Adds the caller to the household identified by `invite_code`.
    pub async fn join_household(
        &self,
        user_id: &str,
        invite_code: &str,
    ) -> ResultEngine<Household> {
        let code = invite_code.trim().to_uppercase();
        if code.is_empty() {
            return Err(EngineError::Validation(
                "invite code is required".to_string(),
            ));
        }

        // Resolve the code outside the lock, then re-check everything under
        // the per-household lock inside the transaction.
        let target = households::Entity::find()
            .filter(households::Column::InviteCode.eq(code.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("invalid invite code".to_string()))?;

        let lock = self.household_lock(&target.id);
        let _guard = lock.lock().await;

        with_tx!(self, |db_tx| {
            let household_model = self
                .find_household_by_code(&db_tx, &code)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("invalid invite code".to_string()))?;

            let user = self.require_user(&db_tx, user_id).await?;
            if user.household_id.is_some() {
                return Err(EngineError::AlreadyMember(
                    "user already belongs to a household".to_string(),
                ));
            }
            if self
                .membership(&db_tx, &household_model.id, user_id)
                .await?
                .is_some()
            {
                return Err(EngineError::DuplicateMembership(
                    "user is already a member of this household".to_string(),
                ));
            }

            let member_row = memberships::ActiveModel {
                household_id: ActiveValue::Set(household_model.id.clone()),
                username: ActiveValue::Set(user_id.to_string()),
                role: ActiveValue::Set(Role::Member.as_str().to_string()),
                joined_at: ActiveValue::Set(Utc::now()),
            };
            member_row.insert(&db_tx).await?;

            self.set_user_household(&db_tx, user_id, Some(&household_model.id), Role::Member)
                .await?;

            self.load_household(&db_tx, household_model).await
        })
    }

    /// Removes the caller from their household.
    ///
    /// Admin succession: when the admin leaves and other members remain,
    /// the first remaining member in join order becomes admin. When the
    /// admin is the sole member, the household is deleted outright.
    pub async fn leave_household(&self, user_id: &str) -> ResultEngine<()> {
        let household_id = self.current_household_id(user_id).await?;

        let lock = self.household_lock(&household_id);
        let guard = lock.lock().await;

        let deleted = with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            // Re-checked under the lock: a concurrent leave may have won.
            let Some(household_id) = user.household_id else {
                return Err(EngineError::NotInHousehold(
                    "user does not belong to any household".to_string(),
                ));
            };
            let household = self
                .find_household_by_id(&db_tx, &household_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("household not exists".to_string()))?;

            let members = self.member_rows(&db_tx, &household_id).await?;

            let mut deleted = false;
            if members.len() <= 1 {
                // Sole member: the household ends here. Deletion is terminal.
                self.delete_household(&db_tx, &household_id).await?;
                deleted = true;
            } else {
                if household.admin_id == user_id {
                    let successor = members
                        .iter()
                        .find(|m| m.username != user_id)
                        .ok_or_else(|| {
                            EngineError::KeyNotFound("household member not exists".to_string())
                        })?;

                    let household_update = households::ActiveModel {
                        id: ActiveValue::Set(household_id.clone()),
                        admin_id: ActiveValue::Set(successor.username.clone()),
                        ..Default::default()
                    };
                    household_update.update(&db_tx).await?;

                    let role_update = memberships::ActiveModel {
                        household_id: ActiveValue::Set(household_id.clone()),
                        username: ActiveValue::Set(successor.username.clone()),
                        role: ActiveValue::Set(Role::Admin.as_str().to_string()),
                        ..Default::default()
                    };
                    role_update.update(&db_tx).await?;

                    self.set_user_household(
                        &db_tx,
                        &successor.username,
                        Some(&household_id),
                        Role::Admin,
                    )
                    .await?;
                }

                memberships::Entity::delete_by_id((household_id.clone(), user_id.to_string()))
                    .exec(&db_tx)
                    .await?;
            }

            self.set_user_household(&db_tx, user_id, None, Role::Member)
                .await?;
            Ok::<bool, EngineError>(deleted)
        })?;

        drop(guard);
        if deleted {
            self.evict_household_lock(&household_id);
        }
        Ok(())
    }

    /// Returns the caller's household with its ordered member list.
    pub async fn household_snapshot(&self, user_id: &str) -> ResultEngine<Household> {
        with_tx!(self, |db_tx| {
            let user = self.require_user(&db_tx, user_id).await?;
            let Some(household_id) = user.household_id else {
                return Err(EngineError::NotInHousehold(
                    "user does not belong to any household".to_string(),
                ));
            };
            let model = self
                .find_household_by_id(&db_tx, &household_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("household not exists".to_string()))?;
            self.load_household(&db_tx, model).await
        })
    }

    pub(super) async fn current_household_id(&self, user_id: &str) -> ResultEngine<String> {
        let user = crate::users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;
        user.household_id.ok_or_else(|| {
            EngineError::NotInHousehold("user does not belong to any household".to_string())
        })
    }

    /// Generates codes until one is free, bounded so a degenerate code
    /// space cannot loop forever.
    async fn allocate_invite_code(&self, db: &DatabaseTransaction) -> ResultEngine<String> {
        for _ in 0..invite_codes::MAX_ATTEMPTS {
            let code = invite_codes::generate();
            let taken = self.find_household_by_code(db, &code).await?.is_some();
            if !taken {
                return Ok(code);
            }
        }
        Err(EngineError::ResourceExhausted(
            "invite code generation exceeded the retry budget".to_string(),
        ))
    }

    /// Cascade delete within one DB transaction. The schema declares
    /// ON DELETE CASCADE, but SQLite only honors it when the foreign-key
    /// pragma is on, so the rows are removed explicitly, children first.
    async fn delete_household(
        &self,
        db_tx: &DatabaseTransaction,
        household_id: &str,
    ) -> ResultEngine<()> {
        let backend = self.database.get_database_backend();

        db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM expense_splits WHERE expense_id IN (SELECT id FROM expenses WHERE household_id = ?);",
                vec![household_id.into()],
            ))
            .await?;
        db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM expenses WHERE household_id = ?;",
                vec![household_id.into()],
            ))
            .await?;
        db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM household_members WHERE household_id = ?;",
                vec![household_id.into()],
            ))
            .await?;
        db_tx
            .execute(Statement::from_sql_and_values(
                backend,
                "DELETE FROM households WHERE id = ?;",
                vec![household_id.into()],
            ))
            .await?;

        Ok(())
    }
}

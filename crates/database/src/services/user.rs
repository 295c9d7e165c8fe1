use super::error::ServiceError;
use crate::{clock::Clock, entities::user, store::Store};
use log::info;
use models::role::Role;
use sea_orm::prelude::Uuid;
use std::str::FromStr;

/// Profile fields of an account about to be created
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub status: Option<String>,
    pub role: Role,
}

pub struct UserService;

impl UserService {
    /// Resolves the role requested at registration.
    ///
    /// Accounts start as students unless they ask to be teachers; admin roles
    /// can never be picked by the account itself.
    pub fn registration_role(requested: Option<&str>) -> Result<Role, ServiceError> {
        let Some(requested) = requested else {
            return Ok(Role::default());
        };

        match Role::from_str(requested) {
            Ok(Role::SuperAdmin) => Err(ServiceError::validation("Role not permitted")),
            Ok(Role::Admin) => Err(ServiceError::validation("Admin privileges required")),
            Ok(role) if role.is_self_assignable() => Ok(role),
            _ => Err(ServiceError::validation("Invalid role.")),
        }
    }

    pub async fn ensure_username_available(
        store: &dyn Store,
        username: &str,
    ) -> Result<(), ServiceError> {
        if store.find_user_by_username(username).await?.is_some() {
            return Err(ServiceError::conflict("Username already taken"));
        }

        Ok(())
    }

    pub async fn create_user(
        store: &dyn Store,
        clock: &dyn Clock,
        new_user: NewUser,
    ) -> Result<user::Model, ServiceError> {
        // Checked again here since hashing happens between the two calls
        Self::ensure_username_available(store, &new_user.username).await?;

        let now = clock.now();
        let user = store
            .insert_user(user::Model {
                id: Uuid::new_v4(),
                username: new_user.username,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                email: new_user.email,
                password: new_user.password_hash,
                status: new_user.status,
                role: new_user.role,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!("Registered user {} as {}", user.username, user.role);
        Ok(user)
    }

    pub async fn find_by_id(
        store: &dyn Store,
        id: Uuid,
    ) -> Result<Option<user::Model>, ServiceError> {
        Ok(store.find_user_by_id(id).await?)
    }

    pub async fn find_by_username(
        store: &dyn Store,
        username: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        Ok(store.find_user_by_username(username).await?)
    }
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::password::hash_password;
use crate::utils::validation::not_blank;

const DUPLICATE_EMAIL: &str = "Email is already taken!";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,
    #[validate(
        email(message = "A valid email is required"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub role: UserRole,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
}

/// Profile edit. Absent fields are left untouched; an empty password is
/// treated as absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    #[validate(
        custom(function = "not_blank", message = "Name is required"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn create<C>(db: &C, input: NewUser) -> AppResult<user::Model>
where
    C: ConnectionTrait,
{
    let input = NewUser {
        email: input.email.trim().to_string(),
        ..input
    };
    input.validate()?;
    let email = input.email.clone();

    if find_by_email(db, &email).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let new_user = user::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(email),
        phone: Set(input.phone),
        password: Set(hash_password(&input.password)?),
        role: Set(input.role),
        address: Set(input.address),
        is_active: Set(true),
        ..Default::default()
    };

    let user = new_user
        .insert(db)
        .await
        .map_err(|e| AppError::from_insert(e, DUPLICATE_EMAIL))?;

    tracing::info!(user_id = user.id, role = ?user.role, "User created");
    Ok(user)
}

pub async fn find_by_id<C>(db: &C, id: i32) -> AppResult<user::Model>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn find_by_email<C>(db: &C, email: &str) -> AppResult<Option<user::Model>>
where
    C: ConnectionTrait,
{
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await?)
}

pub async fn list_all<C>(db: &C) -> AppResult<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    Ok(user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_by_role<C>(db: &C, role: UserRole) -> AppResult<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    Ok(user::Entity::find()
        .filter(user::Column::Role.eq(role))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_active<C>(db: &C) -> AppResult<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    Ok(user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?)
}

pub async fn update<C>(db: &C, id: i32, changes: UserChanges) -> AppResult<user::Model>
where
    C: ConnectionTrait,
{
    changes.validate()?;
    let user = find_by_id(db, id).await?;
    let mut active: user::ActiveModel = user.into();

    if let Some(name) = changes.name {
        active.name = Set(name.trim().to_string());
    }

    if let Some(phone) = changes.phone {
        active.phone = Set(Some(phone));
    }

    if let Some(address) = changes.address {
        active.address = Set(Some(address));
    }

    if let Some(password) = changes.password.filter(|p| !p.is_empty()) {
        active.password = Set(hash_password(&password)?);
    }

    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }

    Ok(active.update(db).await?)
}

pub async fn delete<C>(db: &C, id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let result = user::Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "User deleted");
    Ok(())
}

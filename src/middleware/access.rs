use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::entities::user::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

/// What a route group needs the caller to be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageBikes,
    DeleteBikes,
    UseBookings,
    OverseeBookings,
    ManageBookings,
    Profile,
    ManageUsers,
    CustomerDashboard,
    AdminDashboard,
    OwnerDashboard,
    BusinessDashboard,
    PartnerDashboard,
}

const STAFF: &[UserRole] = &[
    UserRole::Admin,
    UserRole::IndividualOwner,
    UserRole::RentalBusiness,
    UserRole::DeliveryPartner,
];

impl Permission {
    pub fn allowed_roles(self) -> &'static [UserRole] {
        match self {
            Permission::ManageBikes => &[
                UserRole::Admin,
                UserRole::IndividualOwner,
                UserRole::RentalBusiness,
            ],
            Permission::DeleteBikes | Permission::ManageUsers | Permission::AdminDashboard => {
                &[UserRole::Admin]
            }
            Permission::UseBookings | Permission::Profile => &UserRole::ALL,
            Permission::OverseeBookings | Permission::ManageBookings => STAFF,
            Permission::CustomerDashboard => &[UserRole::Customer],
            Permission::OwnerDashboard => &[UserRole::IndividualOwner],
            Permission::BusinessDashboard => &[UserRole::RentalBusiness],
            Permission::PartnerDashboard => &[UserRole::DeliveryPartner],
        }
    }

    pub fn allows(self, role: UserRole) -> bool {
        self.allowed_roles().contains(&role)
    }
}

/// Reject callers whose role is not in the permission's set. Must sit inside
/// `auth_middleware`.
pub async fn require_permission(
    State(permission): State<Permission>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if !permission.allows(claims.role) {
        tracing::debug!(user_id = claims.sub, role = ?claims.role, ?permission, "Access denied");
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    Ok(next.run(request).await)
}

/// Non-admin callers may only act on their own records.
pub fn ensure_self_or_admin(claims: &Claims, user_id: i32) -> AppResult<()> {
    if claims.is_admin() || claims.sub == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only access your own account".to_string(),
        ))
    }
}

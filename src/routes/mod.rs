use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, bikes, bookings, dashboard, users};
use crate::middleware::access::{require_permission, Permission};
use crate::middleware::auth::auth_middleware;
use crate::AppState;

/// Wrap a route group in authentication plus a permission check.
fn guarded(state: &AppState, permission: Permission, routes: Router<AppState>) -> Router<AppState> {
    routes
        .layer(middleware::from_fn_with_state(permission, require_permission))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
}

fn bike_routes(state: &AppState) -> Router<AppState> {
    // Browsing is public
    let public = Router::new()
        .route("/", get(bikes::list_bikes))
        .route("/available", get(bikes::list_available))
        .route("/popular", get(bikes::list_popular))
        .route("/filter", get(bikes::filter_bikes))
        .route("/status/{status}", get(bikes::list_by_status))
        .route("/type/{bike_type}", get(bikes::list_by_type))
        .route("/city/{city}", get(bikes::list_by_city))
        .route("/brand/{brand}", get(bikes::list_by_brand))
        .route("/owner/{owner_id}", get(bikes::list_by_owner))
        .route("/{id}", get(bikes::get_bike))
        .route("/{id}/availability", get(bikes::check_availability));

    let manage = guarded(
        state,
        Permission::ManageBikes,
        Router::new()
            .route("/", post(bikes::create_bike))
            .route("/{id}", put(bikes::update_bike)),
    );

    let remove = guarded(
        state,
        Permission::DeleteBikes,
        Router::new().route("/{id}", delete(bikes::delete_bike)),
    );

    public.merge(manage).merge(remove)
}

fn booking_routes(state: &AppState) -> Router<AppState> {
    let own = guarded(
        state,
        Permission::UseBookings,
        Router::new()
            .route("/", get(bookings::list_bookings).post(bookings::create_booking))
            .route("/{id}", get(bookings::get_booking).put(bookings::update_booking))
            .route("/{id}/cancel", put(bookings::cancel_booking))
            .route("/user/{user_id}", get(bookings::list_by_user)),
    );

    let oversee = guarded(
        state,
        Permission::OverseeBookings,
        Router::new()
            .route("/bike/{bike_id}", get(bookings::list_by_bike))
            .route("/bike/{bike_id}/conflicts", get(bookings::list_conflicts))
            .route("/status/{status}", get(bookings::list_by_status))
            .route("/range", get(bookings::list_by_range)),
    );

    let lifecycle = guarded(
        state,
        Permission::ManageBookings,
        Router::new()
            .route("/{id}/confirm", put(bookings::confirm_booking))
            .route("/{id}/start", put(bookings::start_booking))
            .route("/{id}/complete", put(bookings::complete_booking)),
    );

    own.merge(oversee).merge(lifecycle)
}

fn dashboard_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(guarded(
            state,
            Permission::CustomerDashboard,
            Router::new().route("/customer", get(dashboard::customer)),
        ))
        .merge(guarded(
            state,
            Permission::AdminDashboard,
            Router::new().route("/admin", get(dashboard::admin)),
        ))
        .merge(guarded(
            state,
            Permission::OwnerDashboard,
            Router::new().route("/owner", get(dashboard::owner)),
        ))
        .merge(guarded(
            state,
            Permission::BusinessDashboard,
            Router::new().route("/business", get(dashboard::business)),
        ))
        .merge(guarded(
            state,
            Permission::PartnerDashboard,
            Router::new().route("/partner", get(dashboard::partner)),
        ))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let profile = guarded(
        state,
        Permission::Profile,
        Router::new()
            .route("/", post(users::create_user))
            .route("/{id}", get(users::get_user).put(users::update_user)),
    );

    let admin = guarded(
        state,
        Permission::ManageUsers,
        Router::new()
            .route("/", get(users::list_users))
            .route("/{id}", delete(users::delete_user))
            .route("/role/{role}", get(users::list_by_role))
            .route("/active", get(users::list_active)),
    );

    profile.merge(admin)
}

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/health", get(auth::health));

    Router::new()
        .route("/api/health", get(auth::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/bikes", bike_routes(&state))
        .nest("/api/bookings", booking_routes(&state))
        .nest("/api/dashboard", dashboard_routes(&state))
        .nest("/api/users", user_routes(&state))
        .with_state(state)
}

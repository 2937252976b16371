// src/routes.rs

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{activities, admin, announcements, articles, auth, content, schedules, upload},
    settings::maintenance_middleware,
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public reads sit behind the maintenance gate; auth, admin, and
///   uploaded files stay reachable while the site is closed.
/// * Admin routes are protected by auth first, then the admin role check.
/// * Login is rate-limited per peer IP.
pub fn create_router(state: AppState) -> Router {
    let mut origins: Vec<HeaderValue> = vec![
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];
    if let Ok(origin) = state
        .config
        .public_origin
        .origin()
        .ascii_serialization()
        .parse()
    {
        origins.push(origin);
    }

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(5)
            .finish()
            .unwrap(),
    );

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .layer(GovernorLayer::new(governor_conf));

    let public_routes = Router::new()
        .route("/home", get(content::home))
        .route("/articles", get(articles::list_articles))
        .route("/articles/{slug}", get(articles::get_article))
        .route("/activities", get(activities::list_activities))
        .route("/announcements", get(announcements::list_announcements))
        .route("/schedules", get(schedules::list_schedules))
        .route("/content", get(content::list_content))
        .route("/settings", get(content::public_settings))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            maintenance_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/articles",
            get(admin::list_articles).post(admin::create_article),
        )
        .route(
            "/articles/{id}",
            put(admin::update_article).delete(admin::delete_article),
        )
        .route(
            "/activities",
            get(admin::list_activities).post(admin::create_activity),
        )
        .route(
            "/activities/{id}",
            put(admin::update_activity).delete(admin::delete_activity),
        )
        .route(
            "/announcements",
            get(admin::list_announcements).post(admin::create_announcement),
        )
        .route(
            "/announcements/{id}",
            put(admin::update_announcement).delete(admin::delete_announcement),
        )
        .route(
            "/schedules",
            get(admin::list_schedules).post(admin::create_schedule),
        )
        .route(
            "/schedules/{id}",
            put(admin::update_schedule).delete(admin::delete_schedule),
        )
        .route("/content/{key}", put(admin::update_content))
        .route(
            "/settings",
            get(admin::list_settings).put(admin::update_settings),
        )
        .route("/upload", post(upload::upload_image))
        .route("/preview", post(admin::preview_content))
        .layer(DefaultBodyLimit::max(upload::MAX_IMAGE_BYTES + 64 * 1024))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

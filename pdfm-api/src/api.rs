use crate::config::Settings;
use crate::cors::{reject_unknown_origin, AllowedOrigins};
use crate::handlers::{
    billing, health_check, history, home, merge, not_found, notifications, profile, session, users,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the application router with all routes configured
pub fn router(state: AppState, settings: &Settings) -> Router {
    let origins = AllowedOrigins::new(&settings.allowed_origins);

    Router::new()
        .route("/", get(home))
        .route("/pdfm/health", get(health_check))
        // Sessions
        .route("/pdfm/register", post(session::register))
        .route("/pdfm/login", post(session::login))
        .route("/pdfm/logout", post(session::logout))
        // Accounts
        .route("/pdfm/getone/users", get(users::get_current))
        .route("/pdfm/get/users", get(users::list))
        .route("/pdfm/getoneadmin/users", get(users::get_one))
        .route("/pdfm/create/users", post(users::create))
        .route("/pdfm/update/users", put(users::update))
        .route("/pdfm/delete/users", delete(users::delete))
        .route(
            "/pdfm/profile/photo",
            post(profile::upload_photo).get(profile::get_photo),
        )
        // Billing and feedback
        .route("/pdfm/payment", post(billing::confirm_payment))
        .route("/pdfm/invoices", get(billing::invoices))
        .route(
            "/pdfm/feedback",
            post(billing::submit_feedback).get(billing::list_feedback),
        )
        // Notifications
        .route(
            "/pdfm/notifications",
            get(notifications::list)
                .post(notifications::create)
                .delete(notifications::clear),
        )
        .route("/pdfm/notifications/read", put(notifications::mark_all_read))
        // History
        .route(
            "/pdfm/log/merge",
            post(history::log_merge).get(history::list_merges),
        )
        .route(
            "/pdfm/log/compress",
            post(history::log_compress).get(history::list_compressions),
        )
        .route(
            "/pdfm/log/convert",
            post(history::log_convert).get(history::list_conversions),
        )
        .route(
            "/pdfm/log/summary",
            post(history::log_summary).get(history::list_summaries),
        )
        .route("/pdfm/history/all", get(history::all))
        .route("/pdfm/history/delete", delete(history::delete))
        // PDF operations
        .route("/pdfm/merge", post(merge::merge_pdfs_handler))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(settings.body_limit()))
        .layer(origins.layer())
        .layer(middleware::from_fn_with_state(
            origins.clone(),
            reject_unknown_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router over a fresh in-memory store with default settings
pub fn app() -> Router {
    router(AppState::in_memory(), &Settings::default())
}

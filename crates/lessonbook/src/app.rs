use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::livez,
        notes::{create_note, delete_note, get_note, list_notes, update_note},
        settings::{
            create_instrument, delete_instrument, get_settings, list_instruments,
            rename_instrument_handler, update_settings,
        },
        songs::{
            create_song, delete_song, get_song, list_songs, list_teachings, record_teaching,
            update_song,
        },
        stats::get_stats,
        students::{create_student, delete_student, get_student, list_students, update_student},
        transfer::{export_data, import_data},
    },
    state::AppState,
};

const NO_STORE: &str = "no-store, no-cache, must-revalidate";

/// Instrument routes, mounted under both `/settings/instruments` and
/// `/instruments`.
fn instrument_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_instruments).post(create_instrument))
        .route(
            "/{name}",
            put(rename_instrument_handler).delete(delete_instrument),
        )
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Student routes
        .route("/students", get(list_students).post(create_student))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
        // Note routes
        .route("/students/{id}/notes", get(list_notes).post(create_note))
        .route(
            "/students/{id}/notes/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        // Song routes
        .route("/songs", get(list_songs).post(create_song))
        .route("/songs/teaching", get(list_teachings).post(record_teaching))
        .route(
            "/songs/{id}",
            get(get_song).put(update_song).delete(delete_song),
        )
        // Settings routes
        .route("/settings", get(get_settings).put(update_settings))
        .nest("/settings/instruments", instrument_routes())
        .nest("/instruments", instrument_routes())
        // Dashboard and bulk data
        .route("/stats", get(get_stats))
        .route("/export", get(export_data))
        .route("/import", axum::routing::post(import_data))
        .route("/bulk", get(export_data).post(import_data))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(NO_STORE),
        ))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout,
        ))
        .with_state(state)
}

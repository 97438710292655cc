use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use crate::state::AppState;
use crate::api::handlers::{auth, chatbot, chemical, equipment, health, user, verification};
use crate::api::trace::api_trace_layer;
use tower_cookies::CookieManagerLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/login/", post(auth::login))
        .route("/api/logout/", post(auth::logout))
        .route("/api/jwt/refresh/", post(auth::refresh))
        .route("/api/jwt/verify/", post(auth::verify))

        // Users
        .route("/api/users/", post(user::register))
        .route("/api/users/me/", get(user::me))

        // Chemicals
        .route("/api/chemicals/", get(chemical::list_chemicals).post(chemical::create_chemical))
        .route(
            "/api/chemicals/{id}/",
            get(chemical::get_chemical)
                .put(chemical::replace_chemical)
                .patch(chemical::patch_chemical)
                .delete(chemical::delete_chemical),
        )

        // Equipment
        .route("/api/equipment/", get(equipment::list_equipment).post(equipment::create_equipment))
        .route(
            "/api/equipment/{id}/",
            get(equipment::get_equipment)
                .put(equipment::replace_equipment)
                .patch(equipment::patch_equipment)
                .delete(equipment::delete_equipment),
        )

        // Chatbot
        .route("/api/chatbot/", post(chatbot::ask))

        // Verification
        .route("/api/send-verification-code/", post(verification::send_code))
        .route("/api/verify-code/", post(verification::verify_code))
        .route("/api/verify-recaptcha/", post(verification::verify_recaptcha))

        .layer(api_trace_layer())
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

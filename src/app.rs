use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/contacts", get(handlers::contacts_page).post(handlers::contacts_add))
        .route("/contacts/:id/edit", post(handlers::contacts_edit))
        .route("/contacts/:id/delete", post(handlers::contacts_delete))
        .route("/theme", post(handlers::toggle_theme))
        .route("/api/login", post(handlers::api_login))
        .route(
            "/api/contacts",
            get(handlers::api_list_contacts).post(handlers::api_create_contact),
        )
        .route(
            "/api/contacts/:id",
            get(handlers::api_get_contact)
                .put(handlers::api_update_contact)
                .delete(handlers::api_delete_contact),
        )
        .with_state(state)
}

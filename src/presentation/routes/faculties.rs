use crate::infrastructure::state::AppState;
use crate::presentation::handlers::faculties;
use crate::presentation::middleware::rate_limit::faculty_rate_limit_layer;
use axum::{Router, routing::get};

pub fn routes() -> anyhow::Result<Router<AppState>> {
    Ok(Router::new()
        .route("/", get(faculties::list_faculties))
        .route(
            "/{faculty_id}",
            get(faculties::get_faculty).delete(faculties::delete_faculty),
        )
        .layer(faculty_rate_limit_layer()?))
}

//! Landing Page Handler

use axum::Json;
use axum::extract::Extension;
use serde::Serialize;

use gate::middleware::CurrentUser;

/// Landing page view model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub title: String,
    pub authenticated: bool,
}

/// GET /
pub async fn index(Extension(current): Extension<CurrentUser>) -> Json<HomeView> {
    Json(HomeView {
        title: "Home".to_string(),
        authenticated: current.0.is_some(),
    })
}

use std::sync::Arc;

use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::container::Container;
use super::controller::{DiagramController, GenerateDiagramRequest, HealthController};
use super::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    container: Arc<Container>,
}

/// Build the HTTP surface: `GET /` and `POST /diagram/generate`.
pub fn build_router(container: Arc<Container>) -> Router {
    let state = AppState { container };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(greeting))
        .nest("/diagram", diagram_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn diagram_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_diagram))
}

async fn greeting(State(state): State<AppState>) -> Json<Value> {
    Json(HealthController::new(&state.container).greeting())
}

async fn generate_diagram(
    State(state): State<AppState>,
    GeneratePayload(request): GeneratePayload,
) -> Result<Json<Value>, ApiError> {
    let document = DiagramController::new(&state.container)
        .generate(request)
        .await?;
    Ok(Json(document))
}

/// Generation request read from a JSON or an urlencoded form body.
struct GeneratePayload(GenerateDiagramRequest);

impl<S> FromRequest<S> for GeneratePayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(request) = Form::<GenerateDiagramRequest>::from_request(req, state).await?;
            Ok(Self(request))
        } else {
            let Json(request) = Json::<GenerateDiagramRequest>::from_request(req, state).await?;
            Ok(Self(request))
        }
    }
}

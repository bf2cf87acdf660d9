//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, sauces};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Piquante API",
        version = "1.0.0",
        description = "Hot Sauce Review REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        // Sauces
        sauces::list_sauces,
        sauces::get_sauce,
        sauces::create_sauce,
        sauces::update_sauce,
        sauces::delete_sauce,
        sauces::like_sauce,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::SignupRequest,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::User,
            // Sauces
            crate::models::sauce::Sauce,
            crate::models::sauce::CreateSauce,
            crate::models::sauce::UpdateSauce,
            crate::models::sauce::LikeRequest,
            // Health
            health::HealthResponse,
            // Common
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup and login"),
        (name = "sauces", description = "Sauce management and reactions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

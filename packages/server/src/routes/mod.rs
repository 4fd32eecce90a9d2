use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::identify::identify))
        .layer(handlers::identify::identify_body_limit(
            config.storage.max_upload_size,
        ))
        .routes(routes!(handlers::pages::index))
        .routes(routes!(handlers::pages::reference_photo))
}

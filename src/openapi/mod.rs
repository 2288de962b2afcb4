//! OpenAPI document bootstrap and Swagger UI serving.
//!
//! Builds a `utoipa` document carrying the configured metadata and returns a
//! router that serves the JSON spec and an interactive Swagger UI for it.

mod config;

pub use config::{OpenApiConfig, OpenApiConfigBuilder, ServerEntry};

use axum::{Json, Router, routing::get};
use utoipa::openapi::{
    OpenApi, OpenApiBuilder,
    info::{ContactBuilder, InfoBuilder, LicenseBuilder},
    server::ServerBuilder,
};
use utoipa_swagger_ui::SwaggerUi;

/// Build a base document from the configured metadata.
///
/// Use this as the starting point and merge route documentation generated by
/// `#[derive(OpenApi)]` / `#[utoipa::path]` into it.
pub fn api_document(config: &OpenApiConfig) -> OpenApi {
    let info = InfoBuilder::new()
        .title(config.title.clone())
        .description(Some(config.description.clone()))
        .version(config.version.clone())
        .contact(Some(
            ContactBuilder::new()
                .name(Some(config.contact_name.clone()))
                .email(Some(config.contact_email.clone()))
                .build(),
        ))
        .license(Some(
            LicenseBuilder::new().name(config.license_name.clone()).build(),
        ))
        .build();

    let servers: Vec<_> = config
        .servers
        .iter()
        .map(|server| {
            ServerBuilder::new()
                .url(server.url.clone())
                .description(server.description.clone())
                .build()
        })
        .collect();

    OpenApiBuilder::new()
        .info(info)
        .servers(Some(servers))
        .build()
}

/// Create a router serving the JSON spec and Swagger UI for `openapi`
pub fn openapi_router(openapi: OpenApi, config: &OpenApiConfig) -> Router {
    let spec = openapi.clone();
    let spec_path = config.spec_path.clone();

    let router = Router::new()
        .route(&spec_path, get(move || async move { Json(spec.clone()) }))
        .merge(SwaggerUi::new(config.swagger_ui_path.clone()).url(config.spec_path.clone(), openapi));

    if config.announce {
        for server in &config.servers {
            tracing::info!(spec = %format!("{}{}", server.url, config.spec_path), "OpenAPI spec endpoint enabled");
            tracing::info!(ui = %format!("{}{}", server.url, config.swagger_ui_path), "Swagger UI enabled");
        }
    }

    router
}

/// Bootstrap a documentation router straight from config, for applications
/// without derive-generated path documentation.
pub fn bootstrap(config: &OpenApiConfig) -> Router {
    openapi_router(api_document(config), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_document_carries_metadata() {
        let config = OpenApiConfig::builder()
            .title("License API")
            .description("Issues and verifies licenses")
            .version("3.0.0")
            .contact("Platform", "platform@example.com")
            .build();

        let document = api_document(&config);

        assert_eq!(document.info.title, "License API");
        assert_eq!(document.info.version, "3.0.0");
        assert_eq!(
            document.info.description.as_deref(),
            Some("Issues and verifies licenses")
        );

        let contact = document.info.contact.as_ref().unwrap();
        assert_eq!(contact.name.as_deref(), Some("Platform"));
        assert_eq!(contact.email.as_deref(), Some("platform@example.com"));
    }

    #[test]
    fn test_api_document_defaults() {
        let document = api_document(&OpenApiConfig::default());

        assert_eq!(document.info.title, "API Documentation");
        assert_eq!(document.info.version, "1.0.0");
        assert_eq!(
            document.info.license.as_ref().map(|l| l.name.as_str()),
            Some("MIT")
        );

        let servers = document.servers.as_ref().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].url, "http://localhost:3000");
    }

    #[test]
    fn test_bootstrap_builds_router() {
        // Construction alone exercises path registration and the UI merge
        let _router = bootstrap(&OpenApiConfig::default());
    }
}

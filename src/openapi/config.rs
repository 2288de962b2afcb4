use crate::utils::get_env_with_prefix;

/// A server entry advertised in the generated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    pub url: String,
    pub description: Option<String>,
}

impl ServerEntry {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: Some(description.into()),
        }
    }
}

/// OpenAPI document metadata and serving configuration
#[derive(Debug, Clone)]
pub struct OpenApiConfig {
    /// Document title
    pub title: String,

    /// Document description
    pub description: String,

    /// Contact block
    pub contact_name: String,
    pub contact_email: String,

    /// License name
    pub license_name: String,

    /// API version
    pub version: String,

    /// Servers advertised in the document
    pub servers: Vec<ServerEntry>,

    /// Path serving the JSON document
    pub spec_path: String,

    /// Path serving Swagger UI
    pub swagger_ui_path: String,

    /// Log the spec and UI URLs on startup
    pub announce: bool,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            description: "Automatically generated OpenAPI documentation".to_string(),
            contact_name: "Support Team".to_string(),
            contact_email: "support@example.com".to_string(),
            license_name: "MIT".to_string(),
            version: "1.0.0".to_string(),
            servers: vec![ServerEntry::new("http://localhost:3000", "Local Server")],
            spec_path: "/doc".to_string(),
            swagger_ui_path: "/ui".to_string(),
            announce: false,
        }
    }
}

impl OpenApiConfig {
    pub fn builder() -> OpenApiConfigBuilder {
        OpenApiConfigBuilder::new()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(title) = get_env_with_prefix("OPENAPI_TITLE") {
            config.title = title;
        }

        if let Some(description) = get_env_with_prefix("OPENAPI_DESCRIPTION") {
            config.description = description;
        }

        if let Some(version) = get_env_with_prefix("OPENAPI_VERSION") {
            config.version = version;
        }

        if let Some(spec_path) = get_env_with_prefix("OPENAPI_SPEC_PATH") {
            config.spec_path = spec_path;
        }

        if let Some(ui_path) = get_env_with_prefix("OPENAPI_UI_PATH") {
            config.swagger_ui_path = ui_path;
        }

        if let Some(announce) = get_env_with_prefix("OPENAPI_ANNOUNCE") {
            config.announce = announce.parse().unwrap_or(false);
        }

        config
    }
}

/// Builder for OpenApiConfig
#[must_use = "builder does nothing until you call build()"]
pub struct OpenApiConfigBuilder {
    config: OpenApiConfig,
}

impl OpenApiConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: OpenApiConfig::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = description.into();
        self
    }

    pub fn contact(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.config.contact_name = name.into();
        self.config.contact_email = email.into();
        self
    }

    pub fn license_name(mut self, name: impl Into<String>) -> Self {
        self.config.license_name = name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Replace the default server list with `entry`. Call repeatedly to
    /// advertise several servers.
    pub fn server(mut self, entry: ServerEntry) -> Self {
        if self.config.servers == OpenApiConfig::default().servers {
            self.config.servers.clear();
        }
        self.config.servers.push(entry);
        self
    }

    pub fn spec_path(mut self, path: impl Into<String>) -> Self {
        self.config.spec_path = path.into();
        self
    }

    pub fn swagger_ui_path(mut self, path: impl Into<String>) -> Self {
        self.config.swagger_ui_path = path.into();
        self
    }

    pub fn announce(mut self, announce: bool) -> Self {
        self.config.announce = announce;
        self
    }

    pub fn build(self) -> OpenApiConfig {
        self.config
    }
}

impl Default for OpenApiConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenApiConfig::default();
        assert_eq!(config.title, "API Documentation");
        assert_eq!(config.contact_name, "Support Team");
        assert_eq!(config.contact_email, "support@example.com");
        assert_eq!(config.license_name, "MIT");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.spec_path, "/doc");
        assert_eq!(config.swagger_ui_path, "/ui");
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers[0].url, "http://localhost:3000");
        assert!(!config.announce);
    }

    #[test]
    fn test_builder_replaces_default_servers() {
        let config = OpenApiConfig::builder()
            .title("License API")
            .server(ServerEntry::new("https://api.example.com", "Production"))
            .server(ServerEntry::new("https://staging.example.com", "Staging"))
            .build();

        assert_eq!(config.title, "License API");
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[0].url, "https://api.example.com");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("WEIR_OPENAPI_TITLE", "Env API");
        std::env::set_var("WEIR_OPENAPI_VERSION", "2.1.0");

        let config = OpenApiConfig::from_env();
        assert_eq!(config.title, "Env API");
        assert_eq!(config.version, "2.1.0");

        std::env::remove_var("WEIR_OPENAPI_TITLE");
        std::env::remove_var("WEIR_OPENAPI_VERSION");
    }
}

use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Solr connection
    #[serde(default)]
    #[validate(nested)]
    pub solr: SolrConfig,

    /// Query defaults
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        let config: Config = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: REGISTRY_SEARCH_)
            .add_source(
                config::Environment::with_prefix("REGISTRY_SEARCH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("search.business_fields")
                    .with_list_parse_key("search.party_fields")
                    .with_list_parse_key("search.business_facets")
                    .with_list_parse_key("search.party_facets")
                    .with_list_parse_key("search.party_roles")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    #[validate(range(min = 1))]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SolrConfig {
    /// Solr base URL, up to and including `/solr`
    #[serde(default = "default_solr_url")]
    #[validate(url)]
    pub base_url: String,

    /// Core (collection) holding business and party documents
    #[serde(default = "default_core")]
    #[validate(length(min = 1))]
    pub core: String,

    /// Request handler for select queries
    #[serde(default = "default_query_handler")]
    pub query_handler: String,

    /// Request handler for the suggester
    #[serde(default = "default_suggest_handler")]
    pub suggest_handler: String,

    /// Suggester dictionary name
    #[serde(default = "default_suggest_dictionary")]
    pub suggest_dictionary: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_solr_timeout")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: default_solr_url(),
            core: default_core(),
            query_handler: default_query_handler(),
            suggest_handler: default_suggest_handler(),
            suggest_dictionary: default_suggest_dictionary(),
            timeout_secs: default_solr_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_solr_url() -> String {
    "http://localhost:8983/solr".to_string()
}

fn default_core() -> String {
    "search".to_string()
}

fn default_query_handler() -> String {
    "select".to_string()
}

fn default_suggest_handler() -> String {
    "suggest".to_string()
}

fn default_suggest_dictionary() -> String {
    "name".to_string()
}

fn default_solr_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "registry-search-api".to_string()
}

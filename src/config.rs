use std::collections::HashMap;
use std::time::Duration;

use envconfig::Envconfig;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid environment: {0}")]
    Env(#[from] envconfig::Error),
    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Settings read from the environment. The endpoint can still be changed
/// at runtime; the AI token never comes from here.
#[derive(Clone, Debug)]
pub struct Config {
    inner: Inner,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::checked(Inner::init_from_env()?)
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Config, ConfigError> {
        Config::checked(Inner::init_from_hashmap(vars)?)
    }

    fn checked(inner: Inner) -> Result<Config, ConfigError> {
        parse_url(&inner.endpoint_url)?;
        parse_url(&inner.openai_base_url)?;
        Ok(Config { inner: inner })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.inner.endpoint_url
    }

    /// Replaces the endpoint, e.g. from a command line flag.
    pub fn set_endpoint_url(&mut self, url: &str) -> Result<(), ConfigError> {
        parse_url(url)?;
        self.inner.endpoint_url = url.to_string();
        Ok(())
    }

    pub fn schema_debounce(&self) -> Duration {
        Duration::from_millis(self.inner.schema_debounce_ms)
    }

    pub fn preview_debounce(&self) -> Duration {
        Duration::from_millis(self.inner.preview_debounce_ms)
    }

    /// Applies to introspection and operation requests.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.inner.http_timeout_secs)
    }

    pub fn openai_base_url(&self) -> &str {
        &self.inner.openai_base_url
    }

    pub fn openai_model(&self) -> &str {
        &self.inner.openai_model
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::Url {
        url: url.to_string(),
        source: source,
    })
}

#[derive(Clone, Debug, Envconfig)]
struct Inner {
    #[envconfig(from = "FABRIX_GRAPHQL_ENDPOINT_URL", default = "http://localhost:4000/graphql")]
    endpoint_url: String,
    #[envconfig(from = "FABRIX_SCHEMA_DEBOUNCE_MS", default = "500")]
    schema_debounce_ms: u64,
    #[envconfig(from = "FABRIX_PREVIEW_DEBOUNCE_MS", default = "500")]
    preview_debounce_ms: u64,
    #[envconfig(from = "FABRIX_HTTP_TIMEOUT_SECS", default = "30")]
    http_timeout_secs: u64,
    #[envconfig(from = "FABRIX_OPENAI_BASE_URL", default = "https://api.openai.com/v1")]
    openai_base_url: String,
    #[envconfig(from = "FABRIX_OPENAI_MODEL", default = "gpt-4o-mini")]
    openai_model: String,
}


use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};

use figment::{
    providers::{Env, Format, Toml},
    Figment, Metadata, Provider,
};

lazy_static::lazy_static! {
    /// Provide a lazyily instantiated static reference to
    /// a config object parsed from canonical locations
    /// so that applications have immutable access to it from
    /// anywhere without ever having to parse the config more
    /// than once.
    pub static ref CONFIG: Config = load_config();
}

fn load_config() -> Config {
    Config::figment().extract().unwrap_or_else(|e| {
        // a broken config file must not hide settings made in the environment
        tracing::warn!(error = %e, "Ignoring unreadable configuration file");
        Config::without_file().extract().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid configuration, using defaults");
            Config::default()
        })
    })
}

/// The name of the container engine binary used when none is configured.
pub const DEFAULT_ENGINE: &str = "docker";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Registry root that packages are published under, e.g.
    /// `us-docker.pkg.dev/project-foo/registry-bar`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registry: Option<String>,
    /// Container engine executable, looked up in `PATH`.
    #[serde(default = "default_engine")]
    engine: String,
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_owned()
}

impl Config {
    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref().filter(|r| !r.trim().is_empty())
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry: None,
            engine: default_engine(),
        }
    }
}

impl Config {
    /// Layers, lowest precedence first: built-in defaults, the user's
    /// `bufar.toml` and finally `BUFAR_*` environment variables.
    pub fn figment() -> Figment {
        let mut fig = Figment::from(Config::default());

        if let Ok(c) = etcetera::choose_base_strategy() {
            let config = c.config_dir().join("bufar.toml");
            fig = fig.admerge(Toml::file(config));
        }

        fig.admerge(Config::env())
    }

    /// The defaults and the environment, skipping the user's config file.
    fn without_file() -> Figment {
        Figment::from(Config::default()).admerge(Config::env())
    }

    fn env() -> Env {
        Env::prefixed("BUFAR_")
    }
}

impl Provider for Config {
    fn metadata(&self) -> figment::Metadata {
        Metadata::named("Bufar CLI Config")
    }
    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        figment::providers::Serialized::defaults(self).data()
    }
}

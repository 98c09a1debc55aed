//! Loader for the client configuration with YAML + environment overlays.
//!
//! Configuration is optional end to end: with no file and no environment
//! variables the defaults below apply, which point the client at the local
//! detector API.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Default location of the detector API.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, Deserialize, Default)]
pub struct HearsayConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogSettings,
}

/// Where and how to reach the detector API.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall per-request timeout in seconds. Absent means none: a request
    /// stays pending until the connection dies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct LogSettings {
    /// Explicit log directory; falls back to `HEARSAY_LOG_DIR`, then the
    /// per-user data dir.
    #[serde(default)]
    pub dir: Option<String>,
    /// Emit JSON log lines instead of text.
    #[serde(default)]
    pub json: bool,
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML file + env overrides).
pub struct HearsayConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for HearsayConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HearsayConfigLoader {
    /// Start with the default sources: `HEARSAY__`-prefixed env overrides on
    /// top of whatever files get attached.
    ///
    /// ```
    /// use hearsay_config::HearsayConfigLoader;
    ///
    /// let config = HearsayConfigLoader::new()
    ///     .with_yaml_str("api:\n  base_url: http://10.0.0.2:5000/api")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.api.base_url, "http://10.0.0.2:5000/api");
    /// assert!(config.api.timeout_secs.is_none());
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("HEARSAY").separator("__"));
        Self { builder }
    }

    /// Attach a config file; the `config` crate infers the format by suffix.
    /// The file is optional so a bare install runs on defaults alone.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded (recursively, with a depth cap)
    /// before the strongly typed config materialises.
    ///
    /// ```
    /// use hearsay_config::HearsayConfigLoader;
    ///
    /// unsafe { std::env::set_var("DETECTOR_HOST", "10.1.1.1"); }
    ///
    /// let config = HearsayConfigLoader::new()
    ///     .with_yaml_str("api:\n  base_url: \"http://${DETECTOR_HOST}:5000/api\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.api.base_url, "http://10.1.1.1:5000/api");
    ///
    /// unsafe { std::env::remove_var("DETECTOR_HOST"); }
    /// ```
    pub fn load(self) -> Result<HearsayConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Go through serde_json::Value so env placeholders can be expanded
        // anywhere in the tree before typing it.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: HearsayConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

use std::fs::File;
use std::io::Read;

use json_comments::StripComments;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

pub const BENCHMARK_CONFIG_JSON: &str = "./intset_benchmark.json";
pub const BENCHMARK_CONFIG_TOML: &str = "./intset_benchmark.toml";

/// Parameters of the intset stress runs. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// elements in the lookup set
    #[serde(default = "set_size")]
    pub set_size: usize,
    /// values are masked to this many bits
    #[serde(default = "bits")]
    pub bits: u32,
    #[serde(default = "lookups")]
    pub lookups: usize,
    #[serde(default = "add_delete_rounds")]
    pub add_delete_rounds: usize,
    /// add/delete values are drawn from `-range..range`
    #[serde(default = "add_delete_range")]
    pub add_delete_range: i64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            set_size: set_size(),
            bits: bits(),
            lookups: lookups(),
            add_delete_rounds: add_delete_rounds(),
            add_delete_range: add_delete_range(),
            seed: None,
        }
    }
}

impl BenchmarkConfig {
    /// Loads `path`, or the default json/toml files in the working directory.
    /// Any failure falls back to the default config.
    pub fn new(path: Option<&str>) -> Self {
        let config_path_show;
        let mut file = if let Some(path) = path {
            config_path_show = path;
            if let Ok(file) = File::open(path) {
                file
            } else {
                warn!("Config File: {} Read Fail, Use Default Config.", config_path_show);
                return BenchmarkConfig::default();
            }
        } else if let Ok(file) = File::open(BENCHMARK_CONFIG_JSON) {
            config_path_show = BENCHMARK_CONFIG_JSON;
            file
        } else if let Ok(file) = File::open(BENCHMARK_CONFIG_TOML) {
            config_path_show = BENCHMARK_CONFIG_TOML;
            file
        } else {
            info!("No Config File Found, Use Default Config.");
            return BenchmarkConfig::default();
        };

        let mut config_string = String::new();
        if let Err(e) = file.read_to_string(&mut config_string) {
            warn!("Config File: {} Read Fail({e}), Use Default Config.", config_path_show);
            return BenchmarkConfig::default();
        }
        info!("Config File: {}", config_path_show);
        Self::parse(&config_string).unwrap_or_else(|e| {
            warn!("Config File: {} Parse Fail({e}), Use Default Config.", config_path_show);
            BenchmarkConfig::default()
        })
    }

    /// Parses TOML, then JSON with comments.
    pub fn parse(config_string: &str) -> crate::Result<Self> {
        if let Ok(config) = toml::from_str(config_string) {
            return Ok(config);
        }
        let stripped = StripComments::new(config_string.as_bytes());
        Ok(serde_json::from_reader(stripped)?)
    }

    /// Looks up a dotted key, rendered as JSON.
    pub fn get_value(&self, k: &str) -> Option<String> {
        let mut value = serde_json::to_value(self).ok()?;
        let mut sub_value = &mut value;
        for k in k.split('.') {
            sub_value = sub_value.get_mut(k)?;
        }
        if let Value::Null = sub_value {
            return None;
        }
        Some(sub_value.to_string())
    }
}

fn set_size() -> usize { 10000 }

fn bits() -> u32 { 20 }

fn lookups() -> usize { 100000 }

fn add_delete_rounds() -> usize { 0xffff }

fn add_delete_range() -> i64 { 0xfff }

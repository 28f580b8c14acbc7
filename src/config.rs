use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the catalog and generated downloads are stored
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Blog backend configuration
    pub blog: BlogConfig,
    /// Maximum number of suggestions returned by the languoid autocomplete
    pub languoid_limit: usize,
}

/// Configuration for the blog the feed proxy and datapoint comments point at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Host name of the blog (no scheme), e.g. "blog.wals.info"
    pub host: String,
    /// Connect timeout for feed requests in milliseconds.
    pub connect_timeout_ms: u64,
    /// Total timeout for feed requests in milliseconds.
    pub timeout_ms: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            host: "blog.wals.info".to_string(),
            connect_timeout_ms: 3050,
            timeout_ms: 4050,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:9000".to_string(),
            blog: BlogConfig::default(),
            languoid_limit: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("WALS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("WALS_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(host) = std::env::var("WALS_BLOG_HOST") {
            config.blog.host = host;
        }
        if let Ok(val) = std::env::var("WALS_FEED_CONNECT_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.blog.connect_timeout_ms = v;
            }
        }
        if let Ok(val) = std::env::var("WALS_FEED_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.blog.timeout_ms = v;
            }
        }
        if let Ok(val) = std::env::var("WALS_LANGUOID_LIMIT") {
            if let Ok(v) = val.parse() {
                config.languoid_limit = v;
            }
        }

        config
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("catalog.json")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.data_dir.join("downloads")
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.downloads_dir().join("matrix.csv")
    }
}

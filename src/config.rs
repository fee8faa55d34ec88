use std::path::PathBuf;

use serde::Deserialize;

use crate::services::ranker::{DEFAULT_ALPHA, DEFAULT_TOP_N};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the transaction table and the cluster catalogs
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// File name of the card transaction table inside `data_dir`
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,

    /// Encoding tried for source files that are not UTF-8 (CP949 exports)
    #[serde(default = "default_source_encoding")]
    pub source_encoding: String,

    /// Cluster ids to load, one catalog file each
    #[serde(default = "default_cluster_ids")]
    pub cluster_ids: Vec<u32>,

    /// Number of destinations kept after ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Compression factor pulling demographic weights toward 1
    #[serde(default = "default_demographic_alpha")]
    pub demographic_alpha: f64,

    /// Allowed CORS origins; empty disables CORS, `*` allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("mnt/data")
}

fn default_transactions_file() -> String {
    "card_transactions.csv".to_string()
}

fn default_source_encoding() -> String {
    "euc-kr".to_string()
}

fn default_cluster_ids() -> Vec<u32> {
    vec![0, 1, 2, 3]
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_demographic_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            transactions_file: default_transactions_file(),
            source_encoding: default_source_encoding(),
            cluster_ids: default_cluster_ids(),
            top_n: default_top_n(),
            demographic_alpha: default_demographic_alpha(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the ranker cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.top_n == 0 {
            anyhow::bail!("TOP_N must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.demographic_alpha) {
            anyhow::bail!(
                "DEMOGRAPHIC_ALPHA must be within [0, 1], got {}",
                self.demographic_alpha
            );
        }
        if self.cluster_ids.is_empty() {
            anyhow::bail!("CLUSTER_IDS must name at least one cluster");
        }
        if self.fallback_encoding().is_none() {
            anyhow::bail!("SOURCE_ENCODING {:?} is not a known encoding", self.source_encoding);
        }
        Ok(())
    }

    /// Fallback encoding for source files, resolved from its WHATWG label
    pub fn fallback_encoding(&self) -> Option<&'static encoding_rs::Encoding> {
        encoding_rs::Encoding::for_label(self.source_encoding.trim().as_bytes())
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the transaction table
    pub fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(&self.transactions_file)
    }

    /// Full path of the catalog file for one cluster
    pub fn cluster_path(&self, cluster_id: u32) -> PathBuf {
        self.data_dir
            .join(format!("encoding_cluster_{}.csv", cluster_id))
    }
}

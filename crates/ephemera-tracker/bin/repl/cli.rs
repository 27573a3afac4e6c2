use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use url::Url;

pub const DATA_DIR_ENV: &str = "EPHEMERA_DATA_DIR";
pub const STORAGE_BACKEND_ENV: &str = "EPHEMERA_STORAGE_BACKEND";
pub const QUOTA_BYTES_ENV: &str = "EPHEMERA_QUOTA_BYTES";
pub const GATEWAY_ENV: &str = "EPHEMERA_GATEWAY";
pub const TINYURL_ENDPOINT_ENV: &str = "EPHEMERA_TINYURL_ENDPOINT";
pub const OFFLINE_BASE_URL_ENV: &str = "EPHEMERA_OFFLINE_BASE_URL";
pub const SWEEP_INTERVAL_ENV: &str = "EPHEMERA_SWEEP_INTERVAL_SECS";
pub const GATEWAY_TIMEOUT_ENV: &str = "EPHEMERA_GATEWAY_TIMEOUT_SECS";

pub const DEFAULT_DATA_DIR: &str = ".ephemera";
pub const DEFAULT_OFFLINE_BASE_URL: &str = "https://eph.local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "file")]
    File,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::File => write!(f, "file"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GatewayArg {
    #[value(name = "tinyurl")]
    TinyUrl,
    #[value(name = "offline")]
    Offline,
}

impl Display for GatewayArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayArg::TinyUrl => write!(f, "tinyurl"),
            GatewayArg::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "ephemera", about = "Shorten links and keep them around for thirty minutes")]
pub struct CLI {
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    /// Largest persisted value the file store accepts, in bytes.
    #[arg(long, env = QUOTA_BYTES_ENV)]
    pub quota_bytes: Option<usize>,

    #[arg(long, env = GATEWAY_ENV, value_enum, default_value_t = GatewayArg::TinyUrl)]
    pub gateway: GatewayArg,

    #[arg(
        long,
        env = TINYURL_ENDPOINT_ENV,
        default_value = ephemera_gateway::DEFAULT_ENDPOINT
    )]
    pub tinyurl_endpoint: Url,

    #[arg(long, env = OFFLINE_BASE_URL_ENV, default_value = DEFAULT_OFFLINE_BASE_URL)]
    pub offline_base_url: String,

    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value_t = 5)]
    pub sweep_interval_secs: u64,

    #[arg(long, env = GATEWAY_TIMEOUT_ENV, default_value_t = 10)]
    pub gateway_timeout_secs: u64,
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "PneumoCheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed identifier of the X-ray classifier weights. The cached file is
/// named after it, so a new model version never reuses stale weights.
pub const MODEL_ID: &str = "pneumonia-resnet18-v1";

/// Held-out accuracy of the shipped classifier, printed on reports.
pub const MODEL_ACCURACY: &str = "85.58%";

/// Architecture label printed on reports.
pub const MODEL_ARCHITECTURE: &str = "ResNet-18 Deep Learning";

const DEFAULT_BIND: &str = "127.0.0.1:8501";
const DEFAULT_MAX_UPLOAD_MB: usize = 20;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Default `RUST_LOG` filter when the environment does not set one.
pub fn default_log_filter() -> &'static str {
    "pneumocheck=info,tower_http=warn"
}

/// Get the application data directory.
/// Platform data dir (e.g. ~/.local/share/PneumoCheck); falls back to the
/// working directory when the platform has none.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the models directory under a data directory.
pub fn models_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("models")
}

/// Well-known cache path of the classifier weights.
pub fn default_model_path(data_dir: &std::path::Path) -> PathBuf {
    models_dir(data_dir).join(format!("{MODEL_ID}.onnx"))
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Local weights file. Downloaded here when absent.
    pub model_path: PathBuf,
    /// Remote location of the weights. `None` disables downloading.
    pub model_url: Option<String>,
    /// Expected lowercase hex SHA-256 of the weights file.
    pub model_sha256: Option<String>,
    pub max_upload_bytes: usize,
    pub download_timeout: Duration,
    /// Load the classifier in the background as soon as the server starts.
    pub warm_classifier: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = app_data_dir();
        Self {
            bind_addr: DEFAULT_BIND
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8501))),
            model_path: default_model_path(&data_dir),
            data_dir,
            model_url: None,
            model_sha256: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            warm_classifier: true,
        }
    }
}

impl AppConfig {
    /// Build the configuration from `PNEUMOCHECK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are logged and replaced by their default so a typo
    /// in one variable never prevents the service from starting.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = match get("PNEUMOCHECK_BIND") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PNEUMOCHECK_BIND, using default");
                defaults.bind_addr
            }),
            None => defaults.bind_addr,
        };

        let data_dir = get("PNEUMOCHECK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let model_path = get("PNEUMOCHECK_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_model_path(&data_dir));

        let max_upload_mb = parse_or(
            get("PNEUMOCHECK_MAX_UPLOAD_MB"),
            "PNEUMOCHECK_MAX_UPLOAD_MB",
            DEFAULT_MAX_UPLOAD_MB,
        );
        let max_upload_bytes = max_upload_mb.checked_mul(1024 * 1024).unwrap_or_else(|| {
            tracing::warn!(
                value = max_upload_mb,
                "PNEUMOCHECK_MAX_UPLOAD_MB out of range, using default"
            );
            defaults.max_upload_bytes
        });

        let download_timeout = Duration::from_secs(parse_or(
            get("PNEUMOCHECK_DOWNLOAD_TIMEOUT_SECS"),
            "PNEUMOCHECK_DOWNLOAD_TIMEOUT_SECS",
            DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        ));

        let warm_classifier = match get("PNEUMOCHECK_WARM_CLASSIFIER") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Invalid PNEUMOCHECK_WARM_CLASSIFIER, using default");
                defaults.warm_classifier
            }),
            None => defaults.warm_classifier,
        };

        Self {
            bind_addr,
            data_dir,
            model_path,
            model_url: get("PNEUMOCHECK_MODEL_URL"),
            model_sha256: get("PNEUMOCHECK_MODEL_SHA256").map(|s| s.to_ascii_lowercase()),
            max_upload_bytes,
            download_timeout,
            warm_classifier,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    raw: Option<String>,
    key: &str,
    default: T,
) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}

/// Parse the usual spellings of a boolean switch.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

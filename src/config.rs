use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Doctor Admin";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name offered for the Reports PDF download.
pub const DEFAULT_REPORT_FILENAME: &str = "Doctor_Report.pdf";

/// Listen address when `DOCTOR_ADMIN_BIND` is unset or invalid.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Overrides the data directory (tests, containers).
pub const DATA_DIR_ENV: &str = "DOCTOR_ADMIN_DATA_DIR";
pub const BIND_ENV: &str = "DOCTOR_ADMIN_BIND";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "doctor_admin_lib=info,tower_http=warn"
}

/// Get the application data directory.
/// `$DOCTOR_ADMIN_DATA_DIR` when set, else ~/DoctorAdmin/ (current dir if
/// there is no home directory).
pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("DoctorAdmin")
}

/// Path of the local document store.
pub fn database_path() -> PathBuf {
    app_data_dir().join("database").join("doctor-admin.db")
}

/// Directory receiving exported reports.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Read `DOCTOR_ADMIN_BIND`, falling back to [`DEFAULT_BIND`].
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(BIND_ENV).ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        let default: SocketAddr = DEFAULT_BIND
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)));

        let bind = match value {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = raw, "Invalid {BIND_ENV}, using {DEFAULT_BIND}");
                default
            }),
        };
        Self { bind }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_value(None)
    }
}

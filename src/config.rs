use serde::Deserialize;

use crate::scanner::walk::build_globset;
use crate::types::ScanOptions;

const DEFAULTS: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScanConfig {
    pub excludes: Vec<String>,
}

impl ScanConfig {
    pub fn options(&self) -> ScanOptions {
        ScanOptions { excludes: self.excludes.clone() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub directory: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_seconds: u64,
    /// Separate, tighter budget for the endpoints that walk the filesystem.
    pub analyze_max_requests: usize,
    pub analyze_window_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
        {
            Ok(app_cfg) => app_cfg,
            Err(e) => panic!("Failed to load embedded default config: {}", e),
        }
    }
}

/// Loads the configuration: embedded defaults -> `dateiinventar.toml` -> `$DATEIINVENTAR_CONFIG` -> env.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: dateiinventar.toml (in CWD)
        .add_source(::config::File::with_name("dateiinventar").required(false));

    if let Ok(custom_path) = std::env::var("DATEIINVENTAR_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(
        ::config::Environment::with_prefix("DATEIINVENTAR")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("scan.excludes")
            .try_parsing(true),
    );

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    let rl = &cfg.rate_limit;
    if rl.max_requests == 0 || rl.analyze_max_requests == 0 {
        return Err(anyhow::anyhow!("rate_limit request budgets must be > 0"));
    }
    if rl.window_seconds == 0 || rl.analyze_window_seconds == 0 {
        return Err(anyhow::anyhow!("rate_limit windows must be > 0"));
    }

    if cfg.logging.directory.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.directory must not be empty"));
    }

    build_globset(&cfg.scan.excludes).map_err(|e| anyhow::anyhow!("scan.excludes: {}", e))?;

    Ok(())
}

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Telemetry poll interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self { poll_interval_ms: 20_000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory the rotated log files are written to.
    pub directory: String,
    pub file_prefix: String,
    /// Fallback filter when RUST_LOG is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        // Mirror defaults from config/default.toml
        Self {
            directory: "logs".to_string(),
            file_prefix: "leitstand.log".to_string(),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: leitstand.toml (in CWD)
        .add_source(::config::File::with_name("leitstand").required(false));

    if let Ok(custom_path) = std::env::var("LEITSTAND_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("LEITSTAND").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Monitor
    if cfg.monitor.poll_interval_ms == 0 {
        return Err(anyhow::anyhow!("monitor.poll_interval_ms must be > 0"));
    }
    if cfg.monitor.poll_interval_ms < 1_000 {
        tracing::warn!(
            "monitor.poll_interval_ms {} is below one second and will hammer the agent",
            cfg.monitor.poll_interval_ms
        );
    }

    // Logging
    if cfg.logging.directory.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.directory must not be empty"));
    }
    if cfg.logging.file_prefix.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.file_prefix must not be empty"));
    }

    Ok(())
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            service_name: dotenvy::var("SERVICE_NAME")
                .unwrap_or_else(|_| "portfolio-analytics".to_string()),
            environment: dotenvy::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            log_level: dotenvy::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string()),
            format: match dotenvy::var("LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.log_level.trim().is_empty() {
            return Err("RUST_LOG is set but empty".to_string());
        }
        if self.service_name.trim().is_empty() {
            return Err("SERVICE_NAME is set but empty".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "portfolio-analytics".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Install the global tracing subscriber.
///
/// The analytics services only emit events; hosting applications call this once
/// at startup (or install their own subscriber instead).
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level)?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Plain => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?,
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "📊 Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LoggingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_level_is_rejected() {
        let config = LoggingConfig {
            log_level: "  ".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Subscriber setup: env filter, pretty or JSON output, and the alert layer.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::observability::AlertLayer;

const DEFAULT_SERVICE_NAME: &str = "tally-api";
const DEFAULT_FILTER: &str = "info,api_server=debug,tally_infra=debug,tally_core=debug";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// One JSON object per line instead of the pretty formatter.
    pub json_logs: bool,
    pub service_name: String,
    /// Forward ERROR events to the alert sink.
    pub alerts_enabled: bool,
    /// Webhook URL for alerts; alerts go to stderr when unset.
    pub alert_webhook_url: Option<String>,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self {
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            service_name: std::env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string()),
            alerts_enabled: std::env::var("ALERTS_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            alert_webhook_url: std::env::var("ALERT_WEBHOOK_URL").ok(),
        }
    }

    fn alert_layer(&self) -> Option<AlertLayer> {
        if !self.alerts_enabled {
            return None;
        }

        Some(match &self.alert_webhook_url {
            Some(url) => AlertLayer::webhook(url.clone()),
            None => AlertLayer::console(),
        })
    }
}

/// Install the global subscriber. Must run inside the tokio runtime.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = config.json_logs.then(|| fmt::layer().json());
    let pretty = (!config.json_logs).then(|| fmt::layer().pretty());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(pretty)
        .with(config.alert_layer())
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        alerts_enabled = config.alerts_enabled,
        webhook = config.alert_webhook_url.is_some(),
        "Telemetry initialized"
    );
    Ok(())
}

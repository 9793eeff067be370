// Logger configuration
use serde::{Deserialize, Serialize};

/// Crates whose log level follows the service debug flag
const SERVICE_TARGETS: &[&str] = &["diagnosis_server", "symptom_predictor", "logger_redacted"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// `debug` or `info`
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Colour human-readable output
    pub ansi: bool,
    /// Hash PHI fields before they are logged
    pub redaction_enabled: bool,
}

impl LoggerConfig {
    /// Configuration for the service binary
    ///
    /// JSON output is chosen unless `APP_ENV` is unset or `development`.
    /// `NO_COLOR` disables ANSI colours and `LOG_REDACTION=false` logs PHI
    /// fields in clear, for local debugging only.
    pub fn for_service(debug_mode: bool) -> Self {
        let is_development = std::env::var("APP_ENV")
            .map(|env| env == "development")
            .unwrap_or(true);

        Self {
            log_level: if debug_mode { "debug" } else { "info" }.to_string(),
            json: !is_development,
            ansi: std::env::var("NO_COLOR").is_err(),
            redaction_enabled: std::env::var("LOG_REDACTION")
                .map(|value| !value.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        }
    }

    /// `EnvFilter` directives used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> String {
        let mut directives: Vec<String> = SERVICE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.log_level))
            .collect();
        directives.push("tower_http=info".to_string());
        directives.push("hyper=info".to_string());
        directives.join(",")
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            ansi: true,
            redaction_enabled: true,
        }
    }
}

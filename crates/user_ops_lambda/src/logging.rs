//! Structured logging setup for the Lambda runtime.
//!
//! - `LOG_FORMAT=json` emits one JSON object per event, which CloudWatch Logs
//!   Insights can query field by field.
//! - Anything else emits human-readable text for local runs.
//! - `RUST_LOG` filters as usual and defaults to `info`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

pub fn init_logging() {
    let format = LogFormat::from_setting(std::env::var("LOG_FORMAT").ok().as_deref());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => init_json_logging(env_filter),
        LogFormat::Text => init_text_logging(env_filter),
    }
}

fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_target(true)
                .flatten_event(true),
        )
        .init();
}

fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                // CloudWatch does not render ANSI escapes.
                .with_ansi(false),
        )
        .init();
}

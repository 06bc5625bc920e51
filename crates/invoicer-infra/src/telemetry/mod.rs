//! Tracing initialization
//!
//! `RUST_LOG` overrides the default filter. `LOG_FORMAT=json` switches to
//! JSON lines. Output goes to stderr so command output on stdout stays clean.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(value) => Self::parse(&value),
            Err(_) => LogFormat::Pretty,
        }
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Pretty);
    }
}

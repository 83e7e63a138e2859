use crate::parser::{number_after, strip_epoch_prefix};
use chrono::{DateTime, Local};
use clogc_model::Outcome;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("OS not supported: {0}")]
    UnsupportedPlatform(String),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("missing {0} pipe from probe subprocess")]
    MissingPipe(&'static str),
}

/// How one platform's `ping` is invoked and how its output reads.
pub trait ProbeDialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn program(&self) -> &'static str {
        "ping"
    }

    /// Arguments for a continuous, unlimited-count probe of `host`.
    fn args(&self, host: &str) -> Vec<String>;

    /// Banner lines that are not probe attempts.
    fn is_preamble(&self, line: &str) -> bool;

    /// Split off a subprocess-reported timestamp, if this platform emits one.
    fn split_timestamp<'a>(&self, line: &'a str) -> (Option<DateTime<Local>>, &'a str) {
        (None, line)
    }

    /// Classify a line with any timestamp prefix already removed.
    fn classify_body(&self, body: &str) -> Outcome;
}

/// iputils `ping -D -O`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxPing;

impl ProbeDialect for LinuxPing {
    fn name(&self) -> &'static str {
        "linux"
    }

    fn args(&self, host: &str) -> Vec<String> {
        vec!["-D".to_string(), "-O".to_string(), host.to_string()]
    }

    fn is_preamble(&self, line: &str) -> bool {
        line.starts_with("PING ")
    }

    fn split_timestamp<'a>(&self, line: &'a str) -> (Option<DateTime<Local>>, &'a str) {
        strip_epoch_prefix(line)
    }

    fn classify_body(&self, body: &str) -> Outcome {
        if is_reply(body) {
            return latency_or_unknown(body, "time=");
        }
        if body.starts_with("no answer") {
            return Outcome::Loss;
        }
        if body.contains("Destination Host Unreachable") {
            return Outcome::Unreachable;
        }
        Outcome::Unknown
    }
}

/// Windows `ping -t`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPing;

impl ProbeDialect for WindowsPing {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn args(&self, host: &str) -> Vec<String> {
        vec!["-t".to_string(), host.to_string()]
    }

    fn is_preamble(&self, line: &str) -> bool {
        line.starts_with("Pinging ")
    }

    fn classify_body(&self, body: &str) -> Outcome {
        // Routers answer with "Reply from <gw>: Destination host unreachable."
        if body.contains("Destination host unreachable") {
            return Outcome::Unreachable;
        }
        if body.starts_with("Reply from") {
            if body.contains("time<") {
                return latency_or_unknown(body, "time<");
            }
            return latency_or_unknown(body, "time=");
        }
        if body.starts_with("Request timed out") {
            return Outcome::Loss;
        }
        Outcome::Unknown
    }
}

/// Resolve the dialect for an OS name as reported by `std::env::consts::OS`.
pub fn dialect_for(os: &str) -> Result<Box<dyn ProbeDialect>, ProbeError> {
    match os {
        "linux" => Ok(Box::new(LinuxPing)),
        "windows" => Ok(Box::new(WindowsPing)),
        other => Err(ProbeError::UnsupportedPlatform(other.to_string())),
    }
}

pub fn detect_dialect() -> Result<Box<dyn ProbeDialect>, ProbeError> {
    dialect_for(std::env::consts::OS)
}

fn is_reply(body: &str) -> bool {
    match body.split_once(" bytes from ") {
        Some((size, _)) => !size.is_empty() && size.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn latency_or_unknown(body: &str, field: &str) -> Outcome {
    match number_after(body, field) {
        Some(ms) => Outcome::Latency(ms),
        None => {
            debug!(line = body, "reply without a readable {field} field");
            Outcome::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_os_fails_before_spawning() {
        let err = dialect_for("macos").err().unwrap();
        assert!(matches!(err, ProbeError::UnsupportedPlatform(ref os) if os == "macos"));
        assert_eq!(err.to_string(), "OS not supported: macos");
    }

    #[test]
    fn dialect_lookup_is_by_os_name() {
        assert_eq!(dialect_for("linux").unwrap().name(), "linux");
        assert_eq!(dialect_for("windows").unwrap().name(), "windows");
    }

    #[test]
    fn args_request_unbounded_probing() {
        assert_eq!(LinuxPing.args("1.1.1.1"), vec!["-D", "-O", "1.1.1.1"]);
        assert_eq!(WindowsPing.args("1.1.1.1"), vec!["-t", "1.1.1.1"]);
    }

    #[test]
    fn reply_detection_needs_a_byte_count() {
        assert!(is_reply("64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=9.8 ms"));
        assert!(is_reply("1480 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=9.8 ms"));
        assert!(!is_reply("many bytes from 8.8.8.8: time=9.8 ms"));
        assert!(!is_reply("From 10.0.0.1 icmp_seq=1 Destination Host Unreachable"));
    }

    #[test]
    fn windows_unreachable_reply_is_not_latency() {
        assert_eq!(
            WindowsPing.classify_body("Reply from 192.168.1.1: Destination host unreachable."),
            Outcome::Unreachable
        );
        assert_eq!(
            WindowsPing.classify_body("Reply from 8.8.8.8: bytes=32 time<1ms TTL=117"),
            Outcome::Latency(1.0)
        );
    }
}

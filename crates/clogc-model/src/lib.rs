//! Shared data structures for clogc.

pub mod legend;
pub mod lookback;

pub use legend::{
    ConfigError, LatencyBracket, LatencyColoring, Legend, NormalizeRange, StyleName,
    TimestampSource,
};
pub use lookback::{Lookback, LookbackExt};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Classified result of a single probe attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Round trip time in milliseconds.
    Latency(f64),
    /// No reply within the probe timeout.
    Loss,
    /// The destination was reported unreachable.
    Unreachable,
    /// Anything the classifier could not place, e.g. setup or permission noise.
    Unknown,
}

impl Outcome {
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Outcome::Latency(ms) => Some(*ms),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Latency(_) => "latency",
            Outcome::Loss => "loss",
            Outcome::Unreachable => "unreachable",
            Outcome::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeEvent {
    pub timestamp: DateTime<Local>,
    pub outcome: Outcome,
}

impl ProbeEvent {
    pub fn new(timestamp: DateTime<Local>, outcome: Outcome) -> Self {
        Self { timestamp, outcome }
    }
}

/// xterm 256-color attributes for a glyph. `None` leaves the terminal default.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<u8>,
}

impl Paint {
    pub const PLAIN: Paint = Paint { fg: None, bg: None };

    pub fn fg(color: u8) -> Self {
        Self {
            fg: Some(color),
            bg: None,
        }
    }

    pub fn bg(color: u8) -> Self {
        Self {
            fg: None,
            bg: Some(color),
        }
    }

    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none()
    }
}

/// A single display character and its color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: char,
    #[serde(default)]
    pub paint: Paint,
}

impl Glyph {
    pub fn new(symbol: char, paint: Paint) -> Self {
        Self { symbol, paint }
    }

    pub fn plain(symbol: char) -> Self {
        Self::new(symbol, Paint::PLAIN)
    }
}

/// Structural and visual tokens written to the terminal, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutToken {
    /// `HH:MM` row label.
    Label(String),
    /// Run of spaces.
    Gap(usize),
    Separator(Glyph),
    LineBreak,
    Glyph(Glyph),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_exposes_latency_only_for_replies() {
        assert_eq!(Outcome::Latency(12.5).latency_ms(), Some(12.5));
        assert_eq!(Outcome::Loss.latency_ms(), None);
        assert_eq!(Outcome::Unreachable.latency_ms(), None);
        assert_eq!(Outcome::Unknown.latency_ms(), None);
    }

    #[test]
    fn glyph_json_omits_plain_paint_channels() {
        let glyph = Glyph::new('·', Paint::bg(202));
        let json = serde_json::to_string(&glyph).unwrap();
        assert_eq!(json, r#"{"symbol":"·","paint":{"bg":202}}"#);

        let decoded: Glyph = serde_json::from_str(r#"{"symbol":"/"}"#).unwrap();
        assert_eq!(decoded, Glyph::plain('/'));
        assert!(decoded.paint.is_plain());
    }
}

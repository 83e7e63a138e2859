//! Symbol and color tables, plus the small enums that pick between renderers.

use crate::{Glyph, Paint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("latency bracket table is empty")]
    EmptyBrackets,
    #[error("latency bracket {index} bound {bound} ms is not above the previous bound {previous} ms")]
    UnorderedBrackets {
        index: usize,
        bound: f64,
        previous: f64,
    },
    #[error("latency bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { index: usize },
    #[error("last latency bracket must be unbounded (upper_ms: null)")]
    BoundedLastBracket,
    #[error("latency bracket {index} has no color but coloring is per_bracket")]
    MissingBracketColor { index: usize },
    #[error("latency gradient has no colors")]
    EmptyGradient,
    #[error("latency gradient max_ms must be positive, got {0}")]
    InvalidGradientMax(f64),
    #[error("normalized ramp has no steps")]
    EmptyRamp,
    #[error("normalized range needs max - min > 1, got min={min} max={max}")]
    InvalidRange { min: f64, max: f64 },
    #[error("unknown render style {0:?} (expected bracket or normalized)")]
    UnknownStyle(String),
    #[error("unknown timestamp source {0:?} (expected probe or arrival)")]
    UnknownTimestampSource(String),
}

/// One row of the bracket table. `upper_ms == None` is the unbounded tail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatencyBracket {
    pub upper_ms: Option<f64>,
    pub symbol: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u8>,
}

impl LatencyBracket {
    pub fn new(upper_ms: Option<f64>, symbol: char) -> Self {
        Self {
            upper_ms,
            symbol,
            color: None,
        }
    }

    /// Strict comparison: a value sitting on the bound belongs to the next bracket.
    pub fn admits(&self, ms: f64) -> bool {
        match self.upper_ms {
            Some(bound) => ms < bound,
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LatencyColoring {
    /// Map latency onto `colors` linearly over `0..=max_ms`.
    Gradient { colors: Vec<u8>, max_ms: f64 },
    /// Use each bracket's own `color`.
    PerBracket,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Legend {
    pub brackets: Vec<LatencyBracket>,
    pub coloring: LatencyColoring,
    pub loss: Glyph,
    pub unreachable: Glyph,
    pub unknown: Glyph,
    pub separator: Glyph,
    /// Symbols used by the normalized renderer, lowest latency first.
    pub ramp: Vec<Glyph>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            brackets: vec![
                LatencyBracket::new(Some(20.0), '●'),
                LatencyBracket::new(Some(200.0), '◉'),
                LatencyBracket::new(None, '○'),
            ],
            coloring: LatencyColoring::Gradient {
                colors: vec![231, 231, 231, 230, 230, 229, 228, 220],
                max_ms: 500.0,
            },
            loss: Glyph::new('·', Paint::bg(202)),
            unreachable: Glyph::new('·', Paint::bg(160)),
            unknown: Glyph::new('/', Paint::fg(55)),
            separator: Glyph::plain('—'),
            ramp: ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█']
                .into_iter()
                .zip([46, 82, 118, 154, 190, 226, 214, 196])
                .map(|(symbol, color)| Glyph::new(symbol, Paint::fg(color)))
                .collect(),
        }
    }
}

impl Legend {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let last = self.brackets.len().checked_sub(1).ok_or(ConfigError::EmptyBrackets)?;

        let mut previous: Option<f64> = None;
        for (index, bracket) in self.brackets.iter().enumerate() {
            match bracket.upper_ms {
                Some(bound) => {
                    if index == last {
                        return Err(ConfigError::BoundedLastBracket);
                    }
                    if let Some(prev) = previous {
                        // also rejects NaN bounds
                        if !(bound > prev) {
                            return Err(ConfigError::UnorderedBrackets {
                                index,
                                bound,
                                previous: prev,
                            });
                        }
                    }
                    previous = Some(bound);
                }
                None if index != last => return Err(ConfigError::UnboundedBeforeLast { index }),
                None => {}
            }
        }

        match &self.coloring {
            LatencyColoring::Gradient { colors, max_ms } => {
                if colors.is_empty() {
                    return Err(ConfigError::EmptyGradient);
                }
                if !(*max_ms > 0.0) {
                    return Err(ConfigError::InvalidGradientMax(*max_ms));
                }
            }
            LatencyColoring::PerBracket => {
                if let Some(index) = self.brackets.iter().position(|b| b.color.is_none()) {
                    return Err(ConfigError::MissingBracketColor { index });
                }
            }
        }

        Ok(())
    }
}

/// Input range for the normalized renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalizeRange {
    pub min: f64,
    pub max: f64,
}

impl Default for NormalizeRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 500.0,
        }
    }
}

impl NormalizeRange {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // log(max - min) is the divisor, so it must be strictly positive.
        if !(self.max - self.min > 1.0) {
            return Err(ConfigError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StyleName {
    #[default]
    Bracket,
    Normalized,
}

impl FromStr for StyleName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bracket" => Ok(StyleName::Bracket),
            "normalized" => Ok(StyleName::Normalized),
            other => Err(ConfigError::UnknownStyle(other.to_string())),
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleName::Bracket => f.write_str("bracket"),
            StyleName::Normalized => f.write_str("normalized"),
        }
    }
}

/// Which clock stamps a probe event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// The subprocess's own per-line timestamp, when the platform reports one.
    #[default]
    Probe,
    /// Wall clock at the moment the line was read.
    Arrival,
}

impl FromStr for TimestampSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "probe" => Ok(TimestampSource::Probe),
            "arrival" => Ok(TimestampSource::Arrival),
            other => Err(ConfigError::UnknownTimestampSource(other.to_string())),
        }
    }
}

impl fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampSource::Probe => f.write_str("probe"),
            TimestampSource::Arrival => f.write_str("arrival"),
        }
    }
}

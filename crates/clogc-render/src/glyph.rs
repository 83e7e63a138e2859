use clogc_model::{ConfigError, Glyph, LatencyColoring, Legend, NormalizeRange, Outcome, Paint, StyleName};

/// Maps an outcome to the glyph drawn for it.
///
/// Implementations only differ in how latency is drawn; failures always use
/// the legend's fixed glyph for their kind.
pub trait GlyphStyle: Send + Sync {
    fn legend(&self) -> &Legend;

    fn latency_glyph(&self, ms: f64) -> Glyph;

    fn render(&self, outcome: &Outcome) -> Glyph {
        match outcome {
            Outcome::Latency(ms) => self.latency_glyph(*ms),
            Outcome::Loss => self.legend().loss,
            Outcome::Unreachable => self.legend().unreachable,
            Outcome::Unknown => self.legend().unknown,
        }
    }
}

/// Symbol from the bracket table, color from the gradient or the bracket.
#[derive(Debug, Clone)]
pub struct BracketStyle {
    legend: Legend,
}

impl BracketStyle {
    pub fn new(legend: Legend) -> Result<Self, ConfigError> {
        legend.validate()?;
        Ok(Self { legend })
    }
}

impl GlyphStyle for BracketStyle {
    fn legend(&self) -> &Legend {
        &self.legend
    }

    fn latency_glyph(&self, ms: f64) -> Glyph {
        let brackets = &self.legend.brackets;
        let Some(bracket) = brackets
            .iter()
            .find(|bracket| bracket.admits(ms))
            .or(brackets.last())
        else {
            return self.legend.unknown;
        };

        let paint = match &self.legend.coloring {
            LatencyColoring::Gradient { colors, max_ms } => {
                let index = ramp_index(ms / max_ms, colors.len());
                colors.get(index).copied().map(Paint::fg).unwrap_or_default()
            }
            LatencyColoring::PerBracket => bracket.color.map(Paint::fg).unwrap_or_default(),
        };
        Glyph::new(bracket.symbol, paint)
    }
}

/// Log-scaled position of `ms` within `range` picks a step of the ramp.
#[derive(Debug, Clone)]
pub struct NormalizedStyle {
    legend: Legend,
    range: NormalizeRange,
}

impl NormalizedStyle {
    pub fn new(legend: Legend, range: NormalizeRange) -> Result<Self, ConfigError> {
        range.validate()?;
        if legend.ramp.is_empty() {
            return Err(ConfigError::EmptyRamp);
        }
        Ok(Self { legend, range })
    }

    pub fn range(&self) -> NormalizeRange {
        self.range
    }
}

impl GlyphStyle for NormalizedStyle {
    fn legend(&self) -> &Legend {
        &self.legend
    }

    fn latency_glyph(&self, ms: f64) -> Glyph {
        let position = normalized_position(ms, &self.range);
        let index = ramp_index(position, self.legend.ramp.len());
        self.legend
            .ramp
            .get(index)
            .copied()
            .unwrap_or(self.legend.unknown)
    }
}

/// `clamp(ln(ms - min) / ln(max - min), 0, 1)`, with values at or below `min` at 0.
pub fn normalized_position(ms: f64, range: &NormalizeRange) -> f64 {
    let span = ms - range.min;
    if !(span > 0.0) {
        return 0.0;
    }
    (span.ln() / (range.max - range.min).ln()).clamp(0.0, 1.0)
}

/// `round(fraction * (len - 1))`, clamped to a valid index.
pub fn ramp_index(fraction: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let scaled = (fraction * (len - 1) as f64).round();
    if !(scaled > 0.0) {
        0
    } else {
        (scaled as usize).min(len - 1)
    }
}

/// Build the renderer named by `name`. Chosen once at startup.
pub fn style_for(
    name: StyleName,
    legend: Legend,
    range: NormalizeRange,
) -> Result<Box<dyn GlyphStyle>, ConfigError> {
    Ok(match name {
        StyleName::Bracket => Box::new(BracketStyle::new(legend)?),
        StyleName::Normalized => Box::new(NormalizedStyle::new(legend, range)?),
    })
}

use chrono::{DateTime, Local, Timelike};
use clogc_model::{Glyph, LayoutToken, LookbackExt};
use std::num::NonZeroU32;

/// Gap written after every row label.
const LABEL_GAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// One column per minute, `n` columns per row, glyphs aligned to seconds.
    Columns(NonZeroU32),
    /// One row per hour.
    Hourly,
}

impl LayoutMode {
    /// `0` selects hourly rows; anything else is a column count.
    pub fn from_columns(columns: u32) -> Self {
        match NonZeroU32::new(columns) {
            Some(columns) => LayoutMode::Columns(columns),
            None => LayoutMode::Hourly,
        }
    }
}

/// Decides what goes in front of each glyph so rows line up with the clock.
///
/// The only state is the column counter, which moves once per minute
/// boundary in column mode and never in hourly mode.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    mode: LayoutMode,
    separator: Glyph,
    column: u32,
}

impl LayoutEngine {
    pub fn new(mode: LayoutMode, separator: Glyph) -> Self {
        Self {
            mode,
            separator,
            column: 0,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Tokens to emit before the glyph stamped `current`.
    pub fn prefix(
        &mut self,
        previous: Option<&DateTime<Local>>,
        current: &DateTime<Local>,
    ) -> Vec<LayoutToken> {
        let mut tokens = Vec::new();
        match self.mode {
            LayoutMode::Columns(columns) => match previous {
                None => {
                    tokens.push(LayoutToken::Label(time_label(current)));
                    tokens.push(LayoutToken::Gap(LABEL_GAP));
                    let second = current.second() as usize;
                    if second > 0 {
                        tokens.push(LayoutToken::Gap(second));
                    }
                }
                Some(previous) if !same_minute(previous, current) => {
                    self.column = (self.column + 1) % columns.get();
                    if self.column == 0 {
                        tokens.push(LayoutToken::LineBreak);
                        tokens.push(LayoutToken::Label(time_label(current)));
                        tokens.push(LayoutToken::Gap(LABEL_GAP));
                    } else {
                        tokens.push(LayoutToken::Separator(self.separator));
                    }
                }
                Some(_) => {}
            },
            LayoutMode::Hourly => match previous {
                None => {
                    tokens.push(LayoutToken::Label(time_label(current)));
                    tokens.push(LayoutToken::Gap(LABEL_GAP));
                    tokens.push(LayoutToken::LineBreak);
                }
                Some(previous) if !same_hour(previous, current) => {
                    tokens.push(LayoutToken::LineBreak);
                    tokens.push(LayoutToken::Label(time_label(current)));
                    tokens.push(LayoutToken::Gap(LABEL_GAP));
                    tokens.push(LayoutToken::LineBreak);
                }
                Some(_) => {}
            },
        }
        tokens
    }

    /// Prefix followed by the glyph itself.
    pub fn place(
        &mut self,
        previous: Option<&DateTime<Local>>,
        current: &DateTime<Local>,
        glyph: Glyph,
    ) -> Vec<LayoutToken> {
        let mut tokens = self.prefix(previous, current);
        tokens.push(LayoutToken::Glyph(glyph));
        tokens
    }
}

/// Lay out a stream of stamped glyphs into terminal tokens.
pub fn lay_out<I>(mut engine: LayoutEngine, glyphs: I) -> impl Iterator<Item = LayoutToken>
where
    I: IntoIterator<Item = (DateTime<Local>, Glyph)>,
{
    glyphs
        .into_iter()
        .lookback()
        .flat_map(move |(previous, (at, glyph))| {
            engine.place(previous.as_ref().map(|(prev_at, _)| prev_at), &at, glyph)
        })
}

/// Zero-padded 24-hour `HH:MM`.
pub fn time_label(at: &DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

fn same_hour(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    a.date_naive() == b.date_naive() && a.hour() == b.hour()
}

fn same_minute(a: &DateTime<Local>, b: &DateTime<Local>) -> bool {
    same_hour(a, b) && a.minute() == b.minute()
}

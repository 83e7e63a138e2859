//! Glyph rendering and time-grouped layout.

pub mod glyph;
pub mod layout;

pub use glyph::{
    normalized_position, ramp_index, style_for, BracketStyle, GlyphStyle, NormalizedStyle,
};
pub use layout::{lay_out, time_label, LayoutEngine, LayoutMode};

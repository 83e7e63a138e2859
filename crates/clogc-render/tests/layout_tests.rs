use chrono::{DateTime, Local, TimeZone};
use clogc_model::{Glyph, LayoutToken, Legend, Outcome};
use clogc_render::{lay_out, BracketStyle, GlyphStyle, LayoutEngine, LayoutMode};

fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 1, 15, h, m, s).unwrap()
}

fn dot() -> Glyph {
    Glyph::plain('●')
}

fn sep() -> Glyph {
    Legend::default().separator
}

fn count(tokens: &[LayoutToken], wanted: fn(&LayoutToken) -> bool) -> usize {
    tokens.iter().filter(|token| wanted(token)).count()
}

#[test]
fn three_columns_wrap_on_the_fourth_minute() {
    let engine = LayoutEngine::new(LayoutMode::from_columns(3), sep());
    let stamps = [at(9, 41, 0), at(9, 42, 0), at(9, 43, 0), at(9, 44, 0)];
    let tokens: Vec<_> = lay_out(engine, stamps.iter().map(|t| (*t, dot()))).collect();

    let first_row = tokens
        .iter()
        .position(|token| *token == LayoutToken::LineBreak)
        .unwrap();
    let (row, rest) = tokens.split_at(first_row);

    assert_eq!(count(row, |t| matches!(t, LayoutToken::Separator(_))), 2);
    assert_eq!(count(row, |t| matches!(t, LayoutToken::Glyph(_))), 3);
    assert_eq!(
        rest,
        &[
            LayoutToken::LineBreak,
            LayoutToken::Label("09:44".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::Glyph(dot()),
        ]
    );
}

#[test]
fn seconds_within_a_minute_sit_side_by_side() {
    let engine = LayoutEngine::new(LayoutMode::from_columns(3), sep());
    let stamps = [at(9, 41, 57), at(9, 41, 58), at(9, 41, 59), at(9, 42, 0)];
    let tokens: Vec<_> = lay_out(engine, stamps.iter().map(|t| (*t, dot()))).collect();

    assert_eq!(
        tokens,
        vec![
            LayoutToken::Label("09:41".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::Gap(57),
            LayoutToken::Glyph(dot()),
            LayoutToken::Glyph(dot()),
            LayoutToken::Glyph(dot()),
            LayoutToken::Separator(sep()),
            LayoutToken::Glyph(dot()),
        ]
    );
}

#[test]
fn hourly_rows_break_once_per_hour() {
    let engine = LayoutEngine::new(LayoutMode::from_columns(0), sep());
    let stamps = [at(9, 10, 0), at(9, 50, 0), at(10, 5, 0)];
    let tokens: Vec<_> = lay_out(engine, stamps.iter().map(|t| (*t, dot()))).collect();

    assert_eq!(
        tokens,
        vec![
            LayoutToken::Label("09:10".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::LineBreak,
            LayoutToken::Glyph(dot()),
            LayoutToken::Glyph(dot()),
            LayoutToken::LineBreak,
            LayoutToken::Label("10:05".to_string()),
            LayoutToken::Gap(2),
            LayoutToken::LineBreak,
            LayoutToken::Glyph(dot()),
        ]
    );
}

#[test]
fn rendered_outcomes_flow_through_layout() {
    let style = BracketStyle::new(Legend::default()).unwrap();
    let legend = Legend::default();
    let events = [
        (at(9, 41, 0), Outcome::Latency(23.4)),
        (at(9, 41, 1), Outcome::Loss),
        (at(9, 41, 2), Outcome::Latency(5.0)),
    ];
    let engine = LayoutEngine::new(LayoutMode::from_columns(1), sep());
    let glyphs: Vec<char> = lay_out(
        engine,
        events.iter().map(|(t, outcome)| (*t, style.render(outcome))),
    )
    .filter_map(|token| match token {
        LayoutToken::Glyph(glyph) => Some(glyph.symbol),
        _ => None,
    })
    .collect();

    assert_eq!(glyphs, vec!['◉', legend.loss.symbol, '●']);
}

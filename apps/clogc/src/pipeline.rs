use clogc_model::{LayoutToken, TimestampSource};
use clogc_probe::{classify_stream, suppress_noise, ProbeDialect, ProbeLine};
use clogc_render::{lay_out, GlyphStyle, LayoutEngine};

/// Raw probe lines in, terminal tokens out. One pass, in arrival order.
pub fn pipeline<'a, I>(
    dialect: &'a dyn ProbeDialect,
    style: &'a dyn GlyphStyle,
    engine: LayoutEngine,
    timestamps: TimestampSource,
    lines: I,
) -> impl Iterator<Item = LayoutToken> + 'a
where
    I: IntoIterator<Item = ProbeLine>,
    I::IntoIter: 'a,
{
    let events = suppress_noise(classify_stream(dialect, timestamps, lines));
    let glyphs = events.map(move |event| (event.timestamp, style.render(&event.outcome)));
    lay_out(engine, glyphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use clogc_model::{Glyph, Legend, Outcome};
    use clogc_probe::{classify_line, LinuxPing};
    use clogc_render::{BracketStyle, LayoutMode};

    const REPLY: &str = "64 bytes from 8.8.8.8: icmp_seq=1 ttl=64 time=23.4 ms";

    fn lines(texts: &[&str]) -> Vec<ProbeLine> {
        let received_at = Local.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        texts
            .iter()
            .map(|text| ProbeLine::new(*text, received_at))
            .collect()
    }

    fn glyphs(tokens: &[LayoutToken]) -> Vec<Glyph> {
        tokens
            .iter()
            .filter_map(|token| match token {
                LayoutToken::Glyph(glyph) => Some(*glyph),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn reply_line_becomes_medium_latency_glyph() {
        let received_at = Local.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let event = classify_line(&LinuxPing, REPLY, received_at, TimestampSource::Probe);
        assert_eq!(event.outcome, Outcome::Latency(23.4));

        let legend = Legend::default();
        let style = BracketStyle::new(legend.clone()).unwrap();
        let engine = LayoutEngine::new(LayoutMode::from_columns(1), legend.separator);
        let tokens: Vec<_> = pipeline(
            &LinuxPing,
            &style,
            engine,
            TimestampSource::Probe,
            lines(&[REPLY]),
        )
        .collect();

        assert_eq!(tokens[0], LayoutToken::Label("12:00".to_string()));
        assert_eq!(glyphs(&tokens)[0].symbol, legend.brackets[1].symbol);
        assert_eq!(glyphs(&tokens)[0].symbol, '◉');
    }

    #[test]
    fn setup_noise_shows_once() {
        let legend = Legend::default();
        let style = BracketStyle::new(legend.clone()).unwrap();
        let engine = LayoutEngine::new(LayoutMode::Hourly, legend.separator);
        let tokens: Vec<_> = pipeline(
            &LinuxPing,
            &style,
            engine,
            TimestampSource::Arrival,
            lines(&[
                "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.",
                "[1700000000.1] ping: sendmsg: Operation not permitted",
                "[1700000000.2] no answer yet for icmp_seq=1",
                "[1700000001.1] no answer yet for icmp_seq=2",
                REPLY,
            ]),
        )
        .collect();

        assert_eq!(
            glyphs(&tokens),
            vec![legend.unknown, legend.loss, style.render(&Outcome::Latency(23.4))]
        );
    }
}

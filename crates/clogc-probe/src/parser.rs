use crate::platform::ProbeDialect;
use crate::stream::ProbeLine;
use chrono::{DateTime, Local, Utc};
use clogc_model::{ProbeEvent, TimestampSource};

/// Turn one raw output line into an event.
///
/// With [`TimestampSource::Probe`] a subprocess-reported timestamp wins over
/// `received_at`; the prefix is stripped either way before classifying.
pub fn classify_line(
    dialect: &dyn ProbeDialect,
    line: &str,
    received_at: DateTime<Local>,
    source: TimestampSource,
) -> ProbeEvent {
    let (reported, body) = dialect.split_timestamp(line.trim_end());
    let timestamp = match (source, reported) {
        (TimestampSource::Probe, Some(reported)) => reported,
        _ => received_at,
    };
    ProbeEvent::new(timestamp, dialect.classify_body(body))
}

/// Classify a line stream, skipping blank and banner lines.
pub fn classify_stream<'a, I>(
    dialect: &'a dyn ProbeDialect,
    source: TimestampSource,
    lines: I,
) -> impl Iterator<Item = ProbeEvent> + 'a
where
    I: IntoIterator<Item = ProbeLine>,
    I::IntoIter: 'a,
{
    lines.into_iter().filter_map(move |line| {
        let text = line.text.trim_end();
        if text.trim().is_empty() || dialect.is_preamble(text) {
            return None;
        }
        Some(classify_line(dialect, text, line.received_at, source))
    })
}

/// Strip a leading `[<epoch-seconds>]` and parse it.
///
/// A bracketed prefix that does not parse is still removed, with no timestamp.
pub(crate) fn strip_epoch_prefix(line: &str) -> (Option<DateTime<Local>>, &str) {
    let Some(rest) = line.strip_prefix('[') else {
        return (None, line);
    };
    let Some(end) = rest.find(']') else {
        return (None, line);
    };
    let stamp = rest[..end]
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(epoch_to_local);
    (stamp, rest[end + 1..].trim_start())
}

fn epoch_to_local(secs: f64) -> Option<DateTime<Local>> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::<Utc>::from_timestamp(whole as i64, nanos).map(|utc| utc.with_timezone(&Local))
}

/// Parse the number directly following `field`, e.g. `time=` in `time=23.4 ms`.
pub(crate) fn number_after(text: &str, field: &str) -> Option<f64> {
    let start = text.find(field)? + field.len();
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let value: f64 = rest[..end].parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

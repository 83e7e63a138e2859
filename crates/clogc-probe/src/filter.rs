use clogc_model::{LookbackExt, Outcome, ProbeEvent};
use tracing::debug;

/// True when `current` is the synthetic failure that trails an `Unknown`.
///
/// A transient setup or permission failure makes the probe print an
/// unclassifiable line followed by a timeout or unreachable line for the same
/// attempt. Only the leading `Unknown` is kept.
pub fn is_redundant_failure(previous: Option<&ProbeEvent>, current: &ProbeEvent) -> bool {
    matches!(current.outcome, Outcome::Loss | Outcome::Unreachable)
        && matches!(previous, Some(prev) if prev.outcome == Outcome::Unknown)
}

/// Drop redundant failures, looking exactly one raw event back.
///
/// The lookback runs over the unfiltered stream, so a suppressed event still
/// counts as the predecessor of the one after it.
pub fn suppress_noise<I>(events: I) -> impl Iterator<Item = ProbeEvent>
where
    I: IntoIterator<Item = ProbeEvent>,
{
    events
        .into_iter()
        .lookback()
        .filter_map(|(previous, current)| {
            if is_redundant_failure(previous.as_ref(), &current) {
                debug!(
                    outcome = current.outcome.kind(),
                    at = %current.timestamp,
                    "suppressed failure following unknown"
                );
                None
            } else {
                Some(current)
            }
        })
}

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Freshness order between two accounts, given the timestamp of each one's newest post.
///
/// Accounts with posts come first, later newest post first. Accounts without
/// posts fall back to reverse lexical order of handle.
pub fn freshness_cmp(
    a: &str,
    a_newest: Option<DateTime<Utc>>,
    b: &str,
    b_newest: Option<DateTime<Utc>>,
) -> Ordering {
    match (a_newest, b_newest) {
        (Some(a_time), Some(b_time)) => b_time.cmp(&a_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Stable sort of `handles` by [`freshness_cmp`].
pub fn sort_by_freshness<F>(handles: &mut [String], newest: F)
where
    F: Fn(&str) -> Option<DateTime<Utc>>,
{
    handles.sort_by(|a, b| freshness_cmp(a, newest(a), b, newest(b)));
}

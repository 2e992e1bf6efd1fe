//! Commit selection at a fixed cadence over irregular history.
//!
//! Pure functions: given the branch's commit list and "now", produce the
//! ordered `(boundary, commit)` pairs the checkout driver will walk.
//! Periods whose boundary predates the whole history are omitted — no
//! placeholder rows (explicit gap policy, tested).

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use clap::ValueEnum;

use crate::ports::git::CommitInfo;

/// Snapshot cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Cadence {
    /// Seven-day boundaries aligned to week starts (Monday 00:00 UTC).
    Weekly,
    /// Calendar-month boundaries (first of the month, 00:00 UTC).
    Monthly,
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        })
    }
}

/// One retained period: its boundary and the commit that represents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSelection {
    /// Period boundary the commit was selected against.
    pub boundary: DateTime<Utc>,
    /// Most recent commit at or before the boundary.
    pub commit: CommitInfo,
}

/// Selects one commit per period boundary, oldest boundary first.
///
/// For each of the `periods` most recent boundaries (the latest being the
/// start of the current week or month), the most recent commit dated at
/// or before the boundary is chosen. Boundaries with no eligible commit
/// are omitted. Adjacent boundaries resolving to the same commit each
/// keep their row unless `collapse_duplicates` is set, in which case only
/// the earliest is retained.
#[must_use]
pub fn select_commits(
    commits: &[CommitInfo],
    cadence: Cadence,
    periods: u32,
    now: DateTime<Utc>,
    collapse_duplicates: bool,
) -> Vec<PeriodSelection> {
    let mut ordered: Vec<&CommitInfo> = commits.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date));

    let mut selections: Vec<PeriodSelection> = Vec::new();
    for boundary in boundaries(cadence, periods, now) {
        let Some(commit) = ordered.iter().rev().find(|c| c.date <= boundary) else {
            continue;
        };
        if collapse_duplicates
            && selections.last().is_some_and(|prev| prev.commit.hash == commit.hash)
        {
            continue;
        }
        selections.push(PeriodSelection { boundary, commit: (*commit).clone() });
    }
    selections
}

/// The `periods` most recent boundaries for the cadence, ascending.
fn boundaries(cadence: Cadence, periods: u32, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let latest = match cadence {
        Cadence::Weekly => week_start(now),
        Cadence::Monthly => month_start(now),
    };
    (0..periods)
        .rev()
        .filter_map(|back| match cadence {
            Cadence::Weekly => Some(latest - Duration::days(7 * i64::from(back))),
            Cadence::Monthly => latest.checked_sub_months(Months::new(back)),
        })
        .collect()
}

/// Monday 00:00 UTC of the week containing `now`.
fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let date = now.date_naive();
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// First of the month, 00:00 UTC, for the month containing `now`.
fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .unwrap_or(now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc()
}

//! Consolidator: turns the raw transition list into an actionable one.
//!
//! Two passes. First, events strictly before `now` are dropped; a past
//! transition is not something the caller can act on. Second, a halt
//! followed by a boot less than `min_gap` apart is deleted as a pair: such
//! a dip is noise, the machine should simply stay running through it.
//!
//! Boundary contract: a pair merges iff the gap is *strictly less than*
//! `min_gap`; a gap of exactly `min_gap` survives. The scan never removes a
//! boot event, advances past a kept halt/boot pair, and re-examines the
//! same index after a deletion.

use chrono::{Duration, NaiveDateTime};
use tracing::trace;

use crate::types::TransitionEvent;

pub fn consolidate(
    mut events: Vec<TransitionEvent>,
    now: NaiveDateTime,
    min_gap: Duration,
) -> Vec<TransitionEvent> {
    // pass 1: drop events already in the past
    events.retain(|e| e.timestamp() >= now);

    // pass 2: merge short halt/boot dips
    let mut i = 0;
    while i + 1 < events.len() {
        if events[i].is_boot() || !events[i + 1].is_boot() {
            i += 1;
            continue;
        }
        let gap = events[i + 1].timestamp() - events[i].timestamp();
        if gap < min_gap {
            trace!(halt = %events[i].timestamp(), boot = %events[i + 1].timestamp(),
                   "merging short dip");
            events.drain(i..=i + 1);
        } else {
            i += 2;
        }
    }
    events
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn ev(date: (i32, u32, u32), time: &str, demand: u32) -> TransitionEvent {
        TransitionEvent {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            demand,
        }
    }

    fn at(time: &str) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 31)
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    const DAY: (i32, u32, u32) = (2026, 8, 31);

    #[test]
    fn drops_past_events() {
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "12:00:00", 0),
            ev(DAY, "14:00:00", 1),
        ];
        let out = consolidate(events, at("13:00:00"), Duration::minutes(10));
        assert_eq!(out, [ev(DAY, "14:00:00", 1)]);
    }

    #[test]
    fn merges_gap_below_threshold() {
        // halt 10:00, boot 10:09 with min_gap 10min: 9 < 10 -> merged away
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "10:00:00", 0),
            ev(DAY, "10:09:00", 1),
            ev(DAY, "12:00:00", 0),
        ];
        let out = consolidate(events, at("00:00:00"), Duration::minutes(10));
        assert_eq!(out, [ev(DAY, "08:00:00", 1), ev(DAY, "12:00:00", 0)]);
    }

    #[test]
    fn keeps_gap_at_exact_threshold() {
        // a gap of exactly min_gap is a real power cycle, not noise
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "10:00:00", 0),
            ev(DAY, "10:10:00", 1),
            ev(DAY, "12:00:00", 0),
        ];
        let out = consolidate(events.clone(), at("00:00:00"), Duration::minutes(10));
        assert_eq!(out, events);
    }

    #[test]
    fn merges_midnight_split_dip_across_dates() {
        let events = vec![
            ev(DAY, "22:00:00", 1),
            ev(DAY, "23:59:59", 0),
            ev((2026, 9, 1), "00:00:00", 1),
            ev((2026, 9, 1), "02:00:00", 0),
        ];
        let out = consolidate(events, at("12:00:00"), Duration::minutes(10));
        assert_eq!(
            out,
            [ev(DAY, "22:00:00", 1), ev((2026, 9, 1), "02:00:00", 0)]
        );
    }

    #[test]
    fn cascading_dips_collapse() {
        // after the inner pair merges, the outer halt/boot pair also sits
        // closer than min_gap and must merge on re-examination
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "10:00:00", 0),
            ev(DAY, "10:05:00", 1),
            ev(DAY, "10:08:00", 0),
            ev(DAY, "10:12:00", 1),
            ev(DAY, "14:00:00", 0),
        ];
        let out = consolidate(events, at("00:00:00"), Duration::minutes(10));
        assert_eq!(out, [ev(DAY, "08:00:00", 1), ev(DAY, "14:00:00", 0)]);
    }

    #[test]
    fn never_removes_a_boot_event() {
        // consecutive boots (cold-start synthetic) survive untouched
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "10:00:00", 1),
            ev(DAY, "14:00:00", 0),
        ];
        let out = consolidate(events.clone(), at("00:00:00"), Duration::minutes(10));
        assert_eq!(out, events);
    }

    #[test]
    fn repeated_halts_do_not_merge_with_each_other() {
        // clamped falls can emit consecutive halt events; only the
        // halt/boot dip right before the boot is noise
        let events = vec![
            ev(DAY, "10:00:00", 0),
            ev(DAY, "10:05:00", 0),
            ev(DAY, "10:07:00", 1),
        ];
        let out = consolidate(events, at("00:00:00"), Duration::minutes(10));
        assert_eq!(out, [ev(DAY, "10:00:00", 0)]);
    }

    #[test]
    fn idempotent_on_own_output() {
        let events = vec![
            ev(DAY, "08:00:00", 1),
            ev(DAY, "10:00:00", 0),
            ev(DAY, "10:09:00", 1),
            ev(DAY, "12:00:00", 0),
            ev(DAY, "13:00:00", 1),
            ev(DAY, "18:00:00", 0),
        ];
        let now = at("00:00:00");
        let gap = Duration::minutes(10);
        let once = consolidate(events, now, gap);
        let twice = consolidate(once.clone(), now, gap);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_and_single_lists_pass_through() {
        let now = at("00:00:00");
        let gap = Duration::minutes(10);
        assert!(consolidate(vec![], now, gap).is_empty());
        let single = vec![ev(DAY, "08:00:00", 1)];
        assert_eq!(consolidate(single.clone(), now, gap), single);
    }
}

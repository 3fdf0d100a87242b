//! Interval Decomposer: turns one uptime request into boundary records.
//!
//! A request `owner label TYPE value HH:MM-HH:MM` becomes one rise/fall pair,
//! or two pairs when the interval crosses midnight: the first pair ends at
//! 23:59:59 on the requested day, the second runs from 00:00:00 to the end
//! time under the successor recurrence value. No stored interval crosses
//! midnight.

use chrono::NaiveTime;
use sha2::{Digest, Sha256};

use crate::error::{Result, UptimeError};
use crate::types::{BoundaryRecord, EdgeKind, Recurrence};

const DAY_END: &str = "23:59:59";
const DAY_START: &str = "00:00:00";

/// Parse `HH:MM` or `HH:MM:SS` wall-clock time, normalizing to seconds
/// precision (`HH:MM` gets `:00` appended).
pub fn parse_time(text: &str) -> Result<NaiveTime> {
    let fmt = match text.len() {
        5 => "%H:%M",
        8 => "%H:%M:%S",
        _ => return Err(UptimeError::InvalidTime(text.to_string())),
    };
    NaiveTime::parse_from_str(text, fmt).map_err(|_| UptimeError::InvalidTime(text.to_string()))
}

/// Stable 64-bit digest of the canonicalized request tuple. Re-registering
/// the same owner/label/type/value/interval yields the same id, which is how
/// a prior definition gets replaced instead of duplicated.
pub fn group_id(owner: &str, label: &str, rtype: &str, value: &str, interval: &str) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(owner.as_bytes());
    hasher.update(label.as_bytes());
    hasher.update(rtype.to_ascii_uppercase().as_bytes());
    hasher.update(value.as_bytes());
    hasher.update(interval.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

/// Decompose one request into its boundary records (two or four).
///
/// `interval` is `"start-end"`; an end time lexically before the start means
/// the window spans midnight and is split.
pub fn decompose(
    owner: &str,
    label: &str,
    rtype: &str,
    value: &str,
    interval: &str,
) -> Result<Vec<BoundaryRecord>> {
    if owner.is_empty() {
        return Err(UptimeError::EmptyOwner);
    }
    let recurrence = Recurrence::parse(rtype, value)?;
    let (start_text, end_text) = interval
        .split_once('-')
        .ok_or_else(|| UptimeError::InvalidInterval(interval.to_string()))?;
    let start = parse_time(start_text)?;
    let end = parse_time(end_text)?;
    let id = group_id(owner, label, rtype, value, interval);

    let pair = |recurrence: Recurrence, rise: NaiveTime, fall: NaiveTime| {
        [
            BoundaryRecord {
                owner: owner.to_string(),
                label: label.to_string(),
                recurrence,
                kind: EdgeKind::Rise,
                time: rise,
                group_id: id,
            },
            BoundaryRecord {
                owner: owner.to_string(),
                label: label.to_string(),
                recurrence,
                kind: EdgeKind::Fall,
                time: fall,
                group_id: id,
            },
        ]
    };

    let mut records = Vec::with_capacity(4);
    if end < start {
        // spans midnight: close out the first day, reopen on the next
        let day_end = parse_time(DAY_END)?;
        let day_start = parse_time(DAY_START)?;
        records.extend(pair(recurrence, start, day_end));
        records.extend(pair(recurrence.successor(), day_start, end));
    } else {
        records.extend(pair(recurrence, start, end));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn t(text: &str) -> NaiveTime {
        parse_time(text).unwrap()
    }

    #[test]
    fn parse_time_appends_seconds() {
        assert_eq!(t("08:30"), t("08:30:00"));
    }

    #[test]
    fn parse_time_rejects_garbage() {
        assert!(parse_time("8:30").is_err());
        assert!(parse_time("ab:cd").is_err());
        assert!(parse_time("08:30:").is_err());
    }

    #[test]
    fn simple_interval_yields_one_pair() {
        let recs = decompose("cron", "backup", "DOW", "1", "08:00-18:00").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].kind, EdgeKind::Rise);
        assert_eq!(recs[0].time, t("08:00"));
        assert_eq!(recs[1].kind, EdgeKind::Fall);
        assert_eq!(recs[1].time, t("18:00"));
        assert_eq!(recs[0].recurrence, Recurrence::DayOfWeek(1));
        assert_eq!(recs[0].group_id, recs[1].group_id);
    }

    #[test]
    fn midnight_interval_splits_into_two_pairs() {
        let recs = decompose("alice", "x", "DOW", "1", "22:00-02:00").unwrap();
        assert_eq!(recs.len(), 4);

        assert_eq!(recs[0].recurrence, Recurrence::DayOfWeek(1));
        assert_eq!(recs[0].time, t("22:00"));
        assert_eq!(recs[1].recurrence, Recurrence::DayOfWeek(1));
        assert_eq!(recs[1].time, t("23:59:59"));

        assert_eq!(recs[2].recurrence, Recurrence::DayOfWeek(2));
        assert_eq!(recs[2].time, t("00:00:00"));
        assert_eq!(recs[3].recurrence, Recurrence::DayOfWeek(2));
        assert_eq!(recs[3].time, t("02:00"));

        // all four share one group id
        assert!(recs.iter().all(|r| r.group_id == recs[0].group_id));
    }

    #[test]
    fn pairing_invariant_holds() {
        for interval in ["08:00-18:00", "22:00-02:00", "00:00-23:59"] {
            let recs = decompose("o", "l", "DOM", "15", interval).unwrap();
            assert_eq!(recs.len() % 2, 0);
            let rises = recs.iter().filter(|r| r.kind == EdgeKind::Rise).count();
            let falls = recs.iter().filter(|r| r.kind == EdgeKind::Fall).count();
            assert_eq!(rises, falls);
        }
    }

    #[test]
    fn missing_dash_is_rejected() {
        assert!(matches!(
            decompose("o", "l", "DOW", "1", "08:00 18:00"),
            Err(UptimeError::InvalidInterval(_))
        ));
    }

    #[test]
    fn empty_owner_is_rejected() {
        assert!(matches!(
            decompose("", "l", "DOW", "1", "08:00-18:00"),
            Err(UptimeError::EmptyOwner)
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(decompose("o", "l", "HOURLY", "1", "08:00-18:00").is_err());
    }

    #[test]
    fn group_id_is_stable_and_distinguishes_requests() {
        let a = group_id("cron", "backup", "DOW", "1", "08:00-18:00");
        let b = group_id("cron", "backup", "DOW", "1", "08:00-18:00");
        let c = group_id("cron", "backup", "DOW", "2", "08:00-18:00");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn group_id_type_is_case_insensitive() {
        assert_eq!(
            group_id("o", "l", "dow", "1", "08:00-18:00"),
            group_id("o", "l", "DOW", "1", "08:00-18:00")
        );
    }

    #[test]
    fn date_request_decomposes_with_next_calendar_day() {
        let recs = decompose("o", "l", "DATE", "31.12.2026", "23:00-01:00").unwrap();
        assert_eq!(recs.len(), 4);
        assert_eq!(
            recs[2].recurrence,
            Recurrence::Date(chrono::NaiveDate::from_ymd_opt(2027, 1, 1).unwrap())
        );
    }
}

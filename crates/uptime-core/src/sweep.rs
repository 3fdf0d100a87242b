//! Demand Sweep and Horizon Walker.
//!
//! The sweep walks one day's boundary records in store order (time of day,
//! falls before rises) and maintains the aggregate demand count: how many
//! owners currently require the machine to be up. Transitions are emitted
//! whenever the count crosses zero. The walker drives the sweep over a
//! multi-day horizon starting today, carrying the count across midnight, so
//! a window opening tomorrow or spanning a day boundary is still found.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::trace;

use crate::error::Result;
use crate::store::ScheduleStore;
use crate::types::{BoundaryRecord, EdgeKind, TransitionEvent};

/// Sweep one day's records, appending emitted transitions to `out`.
///
/// `demand` carries across calls for consecutive days. `first_boot_pending`
/// is the cold-start heuristic: while set, the first still-future rise emits
/// a boot event even when other owners are already active, because "demand
/// is nominally up" does not mean the machine was actually booted. At most
/// one such synthetic boot is emitted per query.
pub fn sweep_day(
    records: &[BoundaryRecord],
    date: NaiveDate,
    now: NaiveTime,
    demand: &mut u32,
    first_boot_pending: &mut bool,
    out: &mut Vec<TransitionEvent>,
) {
    for rec in records {
        match rec.kind {
            EdgeKind::Rise => *demand += 1,
            // a stray fall below zero is clamped, never an error
            EdgeKind::Fall => *demand = demand.saturating_sub(1),
        }
        trace!(%date, time = %rec.time, demand, "sweep step");

        if *demand == 0 {
            out.push(TransitionEvent {
                date,
                time: rec.time,
                demand: 0,
            });
        } else if *demand == 1 && rec.kind == EdgeKind::Rise {
            out.push(TransitionEvent {
                date,
                time: rec.time,
                demand: 1,
            });
        } else if rec.kind == EdgeKind::Rise && *first_boot_pending && rec.time > now {
            // *demand > 1 here: other owners were already active, but the
            // earliest future rise is still the actual next boot
            out.push(TransitionEvent {
                date,
                time: rec.time,
                demand: 1,
            });
            *first_boot_pending = false;
        }
    }
}

/// Walk the horizon: one sweep per day for `horizon_days` days starting at
/// `now.date()`, producing the raw (unconsolidated) transition list.
pub fn raw_transitions(
    store: &ScheduleStore,
    now: NaiveDateTime,
    horizon_days: u32,
) -> Result<Vec<TransitionEvent>> {
    let mut out = Vec::new();
    let mut demand = 0u32;
    for offset in 0..horizon_days {
        let date = now
            .date()
            .checked_add_days(Days::new(u64::from(offset)))
            .unwrap_or(now.date());
        let records = store.for_date(date)?;
        trace!(%date, n = records.len(), "examining day");
        let mut first_boot_pending = offset == 0;
        sweep_day(
            &records,
            date,
            now.time(),
            &mut demand,
            &mut first_boot_pending,
            &mut out,
        );
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

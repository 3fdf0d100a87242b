//! The engine: registration plus the query layer.
//!
//! One query is one full sweep over the horizon, computed fresh from the
//! store and discarded; nothing is cached across calls because both the
//! schedule and the wall clock may have changed in between.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::consolidate::consolidate;
use crate::error::Result;
use crate::interval::decompose;
use crate::settings::Settings;
use crate::store::ScheduleStore;
use crate::sweep::raw_transitions;
use crate::types::{BoundaryRecord, TransitionEvent};

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// What to remove on `unregister`: one request by group id, everything an
/// owner registered, or one owner/label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Group(i64),
    Owner(String),
    OwnerLabel(String, String),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine {
    store: ScheduleStore,
    settings: Settings,
}

impl Engine {
    pub fn new(store: ScheduleStore, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Drop and recreate the schedule table, discarding all requests.
    pub fn recreate(&self) -> Result<()> {
        self.store.recreate()
    }

    /// Register one uptime request, replacing any prior definition with the
    /// same derived group id. Returns the group id.
    pub fn register(
        &mut self,
        owner: &str,
        label: &str,
        rtype: &str,
        value: &str,
        interval: &str,
    ) -> Result<i64> {
        let records = decompose(owner, label, rtype, value, interval)?;
        let id = records[0].group_id;
        debug!(owner, label, group_id = id, "registering request");
        self.store.replace_group(&records)?;
        Ok(id)
    }

    /// Remove records by selector. Returns the number of rows removed.
    pub fn unregister(&self, selector: &Selector) -> Result<usize> {
        match selector {
            Selector::Group(id) => self.store.delete_group(*id),
            Selector::Owner(owner) => self.store.delete_owner(owner),
            Selector::OwnerLabel(owner, label) => self.store.delete_owner_label(owner, label),
        }
    }

    /// Every stored boundary record (the `raw` listing).
    pub fn schedule(&self) -> Result<Vec<BoundaryRecord>> {
        self.store.list_all()
    }

    /// The boundary records firing on one date, in sweep order.
    pub fn uptimes_for(&self, date: NaiveDate) -> Result<Vec<BoundaryRecord>> {
        self.store.for_date(date)
    }

    /// The unconsolidated transition list over the whole horizon.
    pub fn raw_transitions(&self, now: NaiveDateTime) -> Result<Vec<TransitionEvent>> {
        raw_transitions(&self.store, now, self.settings.horizon_days)
    }

    /// The consolidated transition list: past events dropped, short dips
    /// merged.
    pub fn transitions(&self, now: NaiveDateTime) -> Result<Vec<TransitionEvent>> {
        let raw = self.raw_transitions(now)?;
        Ok(consolidate(raw, now, self.settings.min_gap()))
    }

    /// When must the machine be up next? The boot grace period is
    /// subtracted so the machine wakes early. `None` if the horizon holds
    /// no boot.
    pub fn next_boot(&self, now: NaiveDateTime) -> Result<Option<NaiveDateTime>> {
        self.next_event(now, true)
    }

    /// When may the machine halt next? The halt grace period is added so
    /// the machine stays up slightly longer. `None` if the horizon holds no
    /// halt.
    pub fn next_halt(&self, now: NaiveDateTime) -> Result<Option<NaiveDateTime>> {
        self.next_event(now, false)
    }

    fn next_event(&self, now: NaiveDateTime, want_boot: bool) -> Result<Option<NaiveDateTime>> {
        let events = self.transitions(now)?;
        // once the scan crosses into a future date, any time of day counts
        let mut floor = now.time();
        for ev in events {
            if ev.date > now.date() {
                floor = NaiveTime::MIN;
            }
            if ev.is_boot() != want_boot {
                continue;
            }
            if floor <= ev.time {
                let ts = ev.timestamp();
                let adjusted = if want_boot {
                    ts - self.settings.grace_boot()
                } else {
                    ts + self.settings.grace_halt()
                };
                return Ok(Some(adjusted));
            }
        }
        Ok(None)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

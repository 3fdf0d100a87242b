use anyhow::Context;
use chrono::{Days, Local, NaiveDate};
use uptime_core::engine::Engine;
use uptime_core::types::{parse_dmy, weekday_name, BoundaryRecord, EdgeKind, Recurrence};

use crate::output::{print_json, print_table};

pub fn run(engine: &Engine, period: Option<&str>, json: bool) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let days: Vec<NaiveDate> = match period.unwrap_or("today") {
        "today" => vec![today],
        "week" => (0..7)
            .filter_map(|i| today.checked_add_days(Days::new(i)))
            .collect(),
        text => vec![parse_dmy(text).with_context(|| format!("bad period '{text}'"))?],
    };

    let mut matched = Vec::new();
    for day in days {
        for rec in engine.uptimes_for(day)? {
            matched.push((day, rec));
        }
    }

    if json {
        let items: Vec<serde_json::Value> = matched
            .iter()
            .map(|(day, rec)| {
                let mut v = serde_json::to_value(rec).unwrap_or_default();
                if let Some(obj) = v.as_object_mut() {
                    obj.insert("date".into(), serde_json::json!(day.to_string()));
                }
                v
            })
            .collect();
        return print_json(&items);
    }

    let rows = matched.iter().map(|(day, rec)| row(*day, rec)).collect();
    print_table(
        &["Date", "Time", "Owner", "Label", "Type", "Value", "State"],
        rows,
    );
    Ok(())
}

fn row(day: NaiveDate, rec: &BoundaryRecord) -> Vec<String> {
    let value = match rec.recurrence {
        Recurrence::DayOfWeek(v) => weekday_name(v).to_string(),
        _ => rec.recurrence.value_str(),
    };
    let state = match rec.kind {
        EdgeKind::Rise => "up",
        EdgeKind::Fall => "down",
    };
    vec![
        day.to_string(),
        rec.time.format("%H:%M:%S").to_string(),
        rec.owner.clone(),
        rec.label.clone(),
        rec.recurrence.type_str().to_string(),
        value,
        state.to_string(),
    ]
}

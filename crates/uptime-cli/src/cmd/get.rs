use chrono::Local;
use uptime_core::engine::Engine;
use uptime_core::types::TransitionEvent;

use crate::output::{print_json, print_table};
use crate::GetKind;

pub fn run(engine: &Engine, kind: GetKind, json: bool) -> anyhow::Result<()> {
    let now = Local::now().naive_local();

    match kind {
        GetKind::Boot => print_next(engine.next_boot(now)?, "next_boot", json),
        GetKind::Halt => print_next(engine.next_halt(now)?, "next_halt", json),
        GetKind::All => print_states(&engine.transitions(now)?, json),
        GetKind::Raw => print_states(&engine.raw_transitions(now)?, json),
    }
}

fn print_next(
    when: Option<chrono::NaiveDateTime>,
    key: &str,
    json: bool,
) -> anyhow::Result<()> {
    let text = when.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
    if json {
        return print_json(&serde_json::json!({ key: text }));
    }
    // no event within the horizon prints nothing, it is not an error
    if let Some(text) = text {
        println!("{text}");
    }
    Ok(())
}

fn print_states(events: &[TransitionEvent], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&events);
    }
    let rows = events
        .iter()
        .map(|e| {
            vec![
                e.date.to_string(),
                e.time.format("%H:%M:%S").to_string(),
                if e.is_halt() { "down" } else { "up" }.to_string(),
            ]
        })
        .collect();
    print_table(&["Date", "Time", "State"], rows);
    Ok(())
}

use uptime_core::engine::Engine;
use uptime_core::types::BoundaryRecord;

use crate::output::{print_json, print_table};

pub fn run(engine: &Engine, json: bool) -> anyhow::Result<()> {
    let records = engine.schedule()?;
    if json {
        return print_json(&records);
    }
    let rows = records.iter().map(row).collect();
    print_table(
        &["Owner", "Label", "Type", "Value", "State", "Time", "Id"],
        rows,
    );
    Ok(())
}

fn row(rec: &BoundaryRecord) -> Vec<String> {
    vec![
        rec.owner.clone(),
        rec.label.clone(),
        rec.recurrence.type_str().to_string(),
        rec.recurrence.value_str(),
        rec.kind.state().to_string(),
        rec.time.format("%H:%M:%S").to_string(),
        rec.group_id.to_string(),
    ]
}

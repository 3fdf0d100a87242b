use uptime_core::engine::{Engine, Selector};

use crate::output::print_json;

/// A selector that parses as an integer is a group id; otherwise it is an
/// owner, optionally narrowed by a label.
pub fn run(engine: &Engine, selector: &str, label: Option<&str>, json: bool) -> anyhow::Result<()> {
    let selector = match (selector.parse::<i64>(), label) {
        (Ok(id), None) => Selector::Group(id),
        (_, Some(label)) => Selector::OwnerLabel(selector.to_string(), label.to_string()),
        (Err(_), None) => Selector::Owner(selector.to_string()),
    };
    let removed = engine.unregister(&selector)?;

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("removed {removed} entries");
    }
    Ok(())
}

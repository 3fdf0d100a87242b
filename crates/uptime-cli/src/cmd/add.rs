use anyhow::{bail, Context};
use std::io::BufRead;
use uptime_core::engine::Engine;

use crate::output::print_json;

pub fn run(engine: &mut Engine, args: &[String], json: bool) -> anyhow::Result<()> {
    if args.len() == 1 && args[0] == "-" {
        return add_from_stdin(engine, json);
    }
    let [owner, label, rtype, value, interval] = args else {
        bail!("expected: owner label DOW|DOM|DATE value start-end (or a single '-')");
    };
    add_one(engine, owner, label, rtype, value, interval, json)
}

fn add_from_stdin(engine: &mut Engine, json: bool) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        // extra trailing fields (e.g. comments) are ignored
        let fields: Vec<&str> = line.split_whitespace().take(5).collect();
        let [owner, label, rtype, value, interval] = fields.as_slice() else {
            bail!("malformed line: '{line}'");
        };
        add_one(engine, owner, label, rtype, value, interval, json)?;
    }
    Ok(())
}

fn add_one(
    engine: &mut Engine,
    owner: &str,
    label: &str,
    rtype: &str,
    value: &str,
    interval: &str,
    json: bool,
) -> anyhow::Result<()> {
    let id = engine
        .register(owner, label, rtype, value, interval)
        .with_context(|| format!("failed to add entry for {owner}/{label}"))?;

    if json {
        print_json(&serde_json::json!({ "owner": owner, "label": label, "id": id }))?;
    } else {
        println!("added {owner}/{label} [{id}]");
    }
    Ok(())
}

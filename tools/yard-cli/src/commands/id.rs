//! Stable ids for every key in a group.

use anyhow::Result;
use serde_json::json;
use yard_catalog::stable_id::{canonical_key, stable_id};

use super::IdArgs;
use crate::context::Context;

/// Run the id command.
pub async fn run(args: IdArgs, ctx: &Context) -> Result<()> {
    let group = ctx
        .load_group(args.catalog.as_deref(), &args.group, args.product)
        .await?;

    let rows: Vec<(String, String, String)> = group
        .keys()
        .filter_map(|key| {
            let variant = group.get(key)?.first()?;
            Some((key.to_string(), stable_id(variant), canonical_key(variant)))
        })
        .collect();

    if ctx.output.is_json() {
        let body: Vec<serde_json::Value> = rows
            .iter()
            .map(|(key, id, canonical)| {
                json!({ "key": key, "stable_id": id, "canonical": canonical })
            })
            .collect();
        ctx.output.json(&body);
        return Ok(());
    }

    ctx.output
        .header(&format!("{} ({} keys)", group.id(), rows.len()));
    let width = rows.iter().map(|(key, _, _)| key.len()).max().unwrap_or(0);
    for (key, id, canonical) in &rows {
        if args.canonical {
            ctx.output
                .table_row(&[key.as_str(), id.as_str(), canonical.as_str()], &[width, 10, 0]);
        } else {
            ctx.output.table_row(&[key.as_str(), id.as_str()], &[width, 10]);
        }
    }

    let distinct: std::collections::BTreeSet<&str> =
        rows.iter().map(|(_, id, _)| id.as_str()).collect();
    if distinct.len() < rows.len() {
        ctx.output.warn(&format!(
            "{} keys share a stable id with another key",
            rows.len() - distinct.len()
        ));
    }

    Ok(())
}

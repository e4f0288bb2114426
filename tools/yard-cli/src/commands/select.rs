//! Resolve attribute choices to a variant key.

use anyhow::Result;
use dialoguer::Select;
use serde_json::json;
use yard_catalog::catalog::Variant;
use yard_catalog::session::ShopperSession;

use super::{open_session, SelectArgs};
use crate::context::Context;

/// Run the select command.
pub async fn run(args: SelectArgs, ctx: &Context) -> Result<()> {
    let mut session = open_session(&args.selection, ctx).await?;

    if args.interactive && !ctx.output.is_json() {
        prompt_selectors(&mut session)?;
    }

    ctx.logger()
        .info_builder("variant resolved")
        .field("key", session.resolved_key())
        .field_u64("quantity", session.quantity())
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(&selection_json(&session));
        return Ok(());
    }

    print_selection(&session, ctx)
}

/// Walk the selectors in order, prompting for each. Picking a value
/// recomputes everything after it.
fn prompt_selectors(session: &mut ShopperSession) -> Result<()> {
    let mut index = 0;
    while let Some(selector) = session.selectors().get(index) {
        let labels: Vec<String> = selector.options.iter().map(|o| selector.label(o)).collect();
        let current = selector
            .options
            .iter()
            .position(|o| *o == selector.current)
            .unwrap_or(0);

        let picked = Select::new()
            .with_prompt(selector.display_name)
            .items(&labels)
            .default(current)
            .interact()?;

        if picked != current {
            let attribute = selector.attribute;
            let value = selector.options[picked].clone();
            session.select_option(attribute, value)?;
        }
        index += 1;
    }
    Ok(())
}

pub(crate) fn selection_json(session: &ShopperSession) -> serde_json::Value {
    let selectors: Vec<serde_json::Value> = session
        .selectors()
        .iter()
        .map(|s| {
            json!({
                "attribute": s.attribute.key(),
                "name": s.display_name,
                "current": s.label(&s.current),
                "options": s.options.iter().map(|o| s.label(o)).collect::<Vec<_>>(),
            })
        })
        .collect();
    let representative = session.variants().first();

    json!({
        "group": session.group().id(),
        "category": session.group().category(),
        "key": session.resolved_key(),
        "selectors": selectors,
        "quantity": session.quantity(),
        "details": representative.map(details_json).unwrap_or_default(),
        "facilities": session.variants().iter().map(|v| v.facility_id()).collect::<Vec<_>>(),
    })
}

/// Detail-table rows as a JSON object.
pub(crate) fn details_json(variant: &Variant) -> serde_json::Map<String, serde_json::Value> {
    variant
        .display_rows()
        .into_iter()
        .map(|(label, value)| (label.to_string(), json!(value)))
        .collect()
}

fn print_selection(session: &ShopperSession, ctx: &Context) -> Result<()> {
    let currency = ctx.currency()?;

    ctx.output.header(&format!(
        "{} ({})",
        session.group().id(),
        session.group().category()
    ));
    for selector in session.selectors() {
        let labels: Vec<String> = selector.options.iter().map(|o| selector.label(o)).collect();
        let current = selector
            .options
            .iter()
            .position(|o| *o == selector.current)
            .unwrap_or(0);
        ctx.output.options(selector.display_name, &labels, current);
    }

    ctx.output.header("Resolved");
    ctx.output.kv("key", session.resolved_key());
    if let Some(variant) = session.variants().first() {
        if let Some(heading) = variant.heading() {
            ctx.output.kv("heading", heading);
        }
        for (label, value) in variant.display_rows() {
            ctx.output.kv(label, &value);
        }
    }

    if session.variants().len() > 1 {
        ctx.output.info("Supplied by:");
        for variant in session.variants() {
            ctx.output.list_item(variant.facility_id().as_str());
        }
    }

    let engine = session.engine();
    ctx.output.kv("packs", &engine.pack_sizes_label());
    match session.quote() {
        Some(quote) => {
            ctx.output.kv("quantity", &session.quantity().to_string());
            ctx.output.kv(
                "price",
                &format!(
                    "{} from {}",
                    quote.money(currency).display(),
                    quote.variant.facility_id()
                ),
            );
        }
        None => ctx.output.warn("No purchasable quantity for this selection"),
    }

    Ok(())
}

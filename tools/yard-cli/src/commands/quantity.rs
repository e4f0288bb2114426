//! Step to the next purchasable quantity.

use anyhow::{bail, Result};
use serde_json::json;
use yard_catalog::pricing::Direction;

use super::{open_session, QuantityArgs, StepDirection};
use crate::context::Context;

/// Run the quantity command.
pub async fn run(args: QuantityArgs, ctx: &Context) -> Result<()> {
    let mut session = open_session(&args.selection, ctx).await?;
    let currency = ctx.currency()?;
    let direction = Direction::from(args.direction);

    if let Some(from) = args.from {
        if session.set_quantity(from, direction).is_none() {
            bail!(
                "No purchasable quantity near {} for {}",
                from,
                session.resolved_key()
            );
        }
    }

    let mut trail = vec![session.quantity()];
    for _ in 0..args.steps {
        let next = match args.direction {
            StepDirection::Up => session.increment(),
            StepDirection::Down => session.decrement(),
        };
        match next {
            Some(quantity) => trail.push(quantity),
            None => break,
        }
    }

    let quote = session.quote().filter(|q| q.quantity > 0);
    let suggestion = session.suggestion();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "key": session.resolved_key(),
            "quantity": session.quantity(),
            "steps": trail,
            "total": quote.map(|q| q.total),
            "display": quote.map(|q| q.money(currency).display()),
            "suggestion": suggestion.map(|s| s.message(currency)),
        }));
        return Ok(());
    }

    ctx.output.header(session.resolved_key());
    let steps: Vec<String> = trail.iter().map(u64::to_string).collect();
    ctx.output.kv("quantity", &steps.join(" -> "));
    match quote {
        Some(quote) => ctx.output.kv("total", &quote.money(currency).display()),
        None => ctx.output.warn("No purchasable quantity for this selection"),
    }
    if let Some(suggestion) = suggestion {
        ctx.output.success(&suggestion.message(currency));
    }

    Ok(())
}

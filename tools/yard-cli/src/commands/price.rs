//! Price a quantity across supplying facilities.

use anyhow::Result;
use serde_json::json;
use yard_catalog::pricing::{cost_for_variant, Direction};
use yard_catalog::catalog::Variant;
use yard_catalog::{Currency, Money};

use super::{open_session, PriceArgs};
use crate::context::Context;
use crate::output::purchasable_badge;

/// Run the price command.
pub async fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.selection, ctx).await?;
    let currency = ctx.currency()?;
    let engine = session.engine();
    let quantity = args.quantity.unwrap_or(session.quantity());

    let quote = engine.best_price(quantity).filter(|_| quantity > 0);
    let suggestion = engine.discount_suggestion(quantity);
    let nearest = if quote.is_none() {
        (
            engine.next_allowed_quantity(quantity, Direction::Down),
            engine.next_allowed_quantity(quantity, Direction::Up),
        )
    } else {
        (None, None)
    };

    let facilities = facility_totals(engine.variants(), quantity, currency);

    ctx.logger()
        .debug_builder("priced")
        .field("key", session.resolved_key())
        .field_u64("quantity", quantity)
        .field_bool("purchasable", quote.is_some())
        .emit();

    if ctx.output.is_json() {
        let mut body = json!({
            "key": session.resolved_key(),
            "quantity": quantity,
            "purchasable": quote.is_some(),
            "currency": currency,
            "best": quote.map(|q| json!({
                "total": q.total,
                "display": q.money(currency).display(),
                "unit_average": q.unit_average(),
                "facility": q.variant.facility_id(),
                "variant": q.variant.id(),
            })),
            "suggestion": suggestion.map(|s| json!({
                "quantity": s.quantity,
                "total": s.total,
                "savings": s.savings,
                "message": s.message(currency),
            })),
            "nearest": { "down": nearest.0, "up": nearest.1 },
        });
        if args.all {
            body["facilities"] = facilities
                .iter()
                .map(|(facility, cost)| match cost {
                    Ok(total) => json!({ "facility": facility, "total": total }),
                    Err(reason) => json!({ "facility": facility, "error": reason }),
                })
                .collect();
        }
        ctx.output.json(&body);
        return Ok(());
    }

    ctx.output
        .header(&format!("{} x {}", session.resolved_key(), quantity));
    ctx.output.kv("status", &purchasable_badge(quote.is_some()));
    ctx.output.kv("packs", &engine.pack_sizes_label());

    match quote {
        Some(quote) => {
            ctx.output.kv("best", &quote.money(currency).display());
            ctx.output.kv("facility", quote.variant.facility_id().as_str());
            ctx.output.kv(
                "per piece",
                &Money::new(quote.unit_average(), currency).display(),
            );
        }
        None => {
            let hint: Vec<String> = [nearest.0, nearest.1]
                .into_iter()
                .flatten()
                .map(|q| q.to_string())
                .collect();
            if hint.is_empty() {
                ctx.output.warn("No purchasable quantity for this selection");
            } else {
                ctx.output
                    .warn(&format!("Not purchasable. Nearest: {}", hint.join(" or ")));
            }
        }
    }

    if args.all {
        ctx.output.header("Facilities");
        for (facility, cost) in &facilities {
            match cost {
                Ok(total) => ctx.output.table_row(&[facility.as_str(), total.as_str()], &[16, 12]),
                Err(reason) => ctx.output.table_row(&[facility.as_str(), reason.as_str()], &[16, 12]),
            }
        }
    }

    if let Some(suggestion) = suggestion {
        ctx.output.info("");
        ctx.output.success(&suggestion.message(currency));
    }

    Ok(())
}

/// Each facility's total for `quantity`, or why it cannot sell it.
fn facility_totals(
    variants: &[Variant],
    quantity: u64,
    currency: Currency,
) -> Vec<(String, Result<String, String>)> {
    variants
        .iter()
        .map(|variant| {
            let cost = if quantity == 0 || !variant.can_supply(quantity) {
                Err("not available".to_string())
            } else {
                cost_for_variant(variant, quantity)
                    .map(|total| Money::new(total, currency).display())
                    .map_err(|e| e.to_string())
            };
            (variant.facility_id().to_string(), cost)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use yard_catalog::catalog::{CategoryDetails, Dimensions, LumberDetails, PriceTier};

    fn variant(facility: &str, tiers: &[(i64, u64)], inventory: Option<u64>) -> Variant {
        Variant::new(
            format!("lumber#{facility}#a"),
            facility,
            CategoryDetails::Lumber(LumberDetails::default()),
            Dimensions::new(Decimal::from(96), Decimal::ZERO, Decimal::ZERO),
            tiers
                .iter()
                .map(|(price, pack)| PriceTier::new(Decimal::from(*price), *pack))
                .collect(),
        )
        .unwrap()
        .with_inventory(inventory)
    }

    #[test]
    fn test_facility_totals_mark_unavailable() {
        let variants = vec![
            variant("f1", &[(12, 1), (10, 50)], Some(40)),
            variant("f2", &[(11, 1)], None),
            variant("f3", &[(8, 12)], None),
        ];

        let totals = facility_totals(&variants, 50, Currency::USD);
        assert_eq!(totals[0], ("f1".to_string(), Err("not available".to_string())));
        assert_eq!(totals[1], ("f2".to_string(), Ok("$550.00".to_string())));
        assert_eq!(totals[2], ("f3".to_string(), Err("not available".to_string())));

        let totals = facility_totals(&variants, 24, Currency::USD);
        assert_eq!(totals[0].1, Ok("$288.00".to_string()));
        assert_eq!(totals[2].1, Ok("$192.00".to_string()));
    }
}

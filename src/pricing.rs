//! Margin arithmetic used when editing quote lines.

use crate::error::Error;
use crate::model::LineItem;

/// Highest margin applied; the selling price diverges as the margin nears 100%.
pub const MAX_MARGIN: f64 = 99.0;

/// Selling price for a cost at the given margin percentage, rounded to the euro.
///
/// `price = cost / (1 - margin/100)`. A missing or non-positive margin only
/// rounds; margins above [`MAX_MARGIN`] are clamped to it.
pub fn apply_margin(cost: f64, margin: f64) -> f64 {
    if margin.is_nan() || margin <= 0.0 {
        return cost.round();
    }
    let margin = margin.min(MAX_MARGIN);
    (cost / (1.0 - margin / 100.0)).round()
}

/// Accept a margin percentage in `[0, 100)`.
pub fn check_margin(margin: f64) -> Result<f64, Error> {
    if margin.is_finite() && (0.0..100.0).contains(&margin) {
        Ok(margin)
    } else {
        Err(Error::Config(format!("margin must be in [0, 100), got {margin}")))
    }
}

/// Reprice every line from its cost price at `margin`.
///
/// Lines without a cost price adopt their current unit price as cost first,
/// so repeated calls never compound the margin.
pub fn reprice_with_margin(items: &mut [LineItem], margin: f64) {
    for item in items.iter_mut() {
        let cost = match item.cost_price {
            Some(c) if c != 0.0 => c,
            _ => item.unit_price,
        };
        item.cost_price = Some(cost);
        item.unit_price = apply_margin(cost, margin);
        item.total_ht = item.quantity * item.unit_price;
    }
}

/// Recompute a line's total after its quantity or unit price changed.
pub fn update_line_total(item: &mut LineItem) {
    item.total_ht = item.quantity * item.unit_price;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_divides_by_the_kept_share() {
        assert_eq!(apply_margin(100.0, 20.0), 125.0);
        assert_eq!(apply_margin(80.0, 0.0), 80.0);
        assert_eq!(apply_margin(99.6, -5.0), 100.0);
        assert_eq!(apply_margin(1000.0, 30.0), 1429.0);
    }

    #[test]
    fn margins_at_or_over_100_stay_finite() {
        assert_eq!(apply_margin(100.0, 100.0), 10000.0);
        assert_eq!(apply_margin(100.0, 150.0), 10000.0);
        assert!(apply_margin(100.0, f64::INFINITY).is_finite());
        assert!(check_margin(100.0).is_err());
        assert!(check_margin(-1.0).is_err());
        assert!(check_margin(f64::NAN).is_err());
        assert_eq!(check_margin(30.0).unwrap(), 30.0);
    }

    #[test]
    fn repricing_is_stable_across_calls() {
        let mut items = vec![LineItem::new("Carrelage mural", 22.0, "m²", 75.0)];
        reprice_with_margin(&mut items, 25.0);
        assert_eq!(items[0].cost_price, Some(75.0));
        assert_eq!(items[0].unit_price, 100.0);
        assert_eq!(items[0].total_ht, 2200.0);

        reprice_with_margin(&mut items, 25.0);
        assert_eq!(items[0].unit_price, 100.0);

        reprice_with_margin(&mut items, 0.0);
        assert_eq!(items[0].unit_price, 75.0);
        assert_eq!(items[0].total_ht, 1650.0);
    }

    #[test]
    fn line_total_follows_quantity() {
        let mut item = LineItem::new("Main d'oeuvre", 35.0, "heure", 45.0);
        item.quantity = 10.0;
        update_line_total(&mut item);
        assert_eq!(item.total_ht, 450.0);
    }
}

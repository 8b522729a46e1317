//! # Quote Conversion
//!
//! Maps a [`CalculationResult`](crate::engine::CalculationResult) into
//! priced quote line items: one line per material list entry, unit price
//! left at zero pending user entry. Amounts render in the fixed naira
//! locale format used by the export formatters.

use serde::{Deserialize, Serialize};

use crate::engine::{CalculationResult, MaterialKind};

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub description: String,
    pub kind: MaterialKind,
    pub qty: u32,
    /// Unit price in naira; zero until the estimator fills it in
    pub unit_price: f64,
    pub line_total: f64,
}

impl QuoteLineItem {
    /// Set the unit price and recompute the line total.
    pub fn priced(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self.line_total = unit_price * self.qty as f64;
        self
    }
}

/// Convert a calculation result into quote lines, one per material list
/// entry, in material list order. Prices start at zero.
pub fn build_quote(result: &CalculationResult) -> Vec<QuoteLineItem> {
    result
        .material_list
        .iter()
        .map(|item| QuoteLineItem {
            description: item.item.clone(),
            kind: item.kind,
            qty: item.units,
            unit_price: 0.0,
            line_total: 0.0,
        })
        .collect()
}

/// Sum of all line totals.
pub fn quote_total(items: &[QuoteLineItem]) -> f64 {
    items.iter().map(|i| i.line_total).sum()
}

/// Render an amount in the fixed naira format: `₦1,234,567.89`.
pub fn format_naira(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}\u{20a6}{grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate, CalculationSettings};
    use crate::modules::{CartItem, ModuleId};

    fn sample_result() -> CalculationResult {
        let cart = vec![CartItem::new(ModuleId::SwingDoor)
            .with_size(900.0, 2100.0)
            .with_qty(2)];
        calculate(&cart, &CalculationSettings::default()).unwrap()
    }

    #[test]
    fn test_one_line_per_material_item() {
        let result = sample_result();
        let quote = build_quote(&result);
        assert_eq!(quote.len(), result.material_list.len());
        for (line, item) in quote.iter().zip(&result.material_list) {
            assert_eq!(line.description, item.item);
            assert_eq!(line.qty, item.units);
            assert_eq!(line.unit_price, 0.0);
            assert_eq!(line.line_total, 0.0);
        }
        assert_eq!(quote_total(&quote), 0.0);
    }

    #[test]
    fn test_pricing_a_line() {
        let line = QuoteLineItem {
            description: "Door Frame".to_string(),
            kind: MaterialKind::Profile,
            qty: 3,
            unit_price: 0.0,
            line_total: 0.0,
        }
        .priced(14_500.0);
        assert_eq!(line.line_total, 43_500.0);
        assert_eq!(quote_total(&[line]), 43_500.0);
    }

    #[test]
    fn test_format_naira() {
        assert_eq!(format_naira(0.0), "\u{20a6}0.00");
        assert_eq!(format_naira(950.5), "\u{20a6}950.50");
        assert_eq!(format_naira(14_500.0), "\u{20a6}14,500.00");
        assert_eq!(format_naira(1_234_567.891), "\u{20a6}1,234,567.89");
        assert_eq!(format_naira(-2_500.0), "-\u{20a6}2,500.00");
    }
}

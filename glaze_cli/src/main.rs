//! # Glazier CLI Application
//!
//! Terminal front end for quick glazing estimates: prompts for a
//! casement window's dimensions, runs the engine with default stock
//! settings, and prints the material list, cutting plans, and glass
//! summary plus the JSON result.

use std::io::{self, BufRead, Write};

use glaze_core::engine::{calculate, CalculationSettings};
use glaze_core::modules::{CartItem, ModuleId};
use glaze_core::quote::{build_quote, format_naira, quote_total};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn main() {
    println!("Glazier CLI - Glazing Material Estimator");
    println!("========================================");
    println!();

    let width_mm = prompt_f64("Window width (mm) [1200]: ", 1200.0);
    let height_mm = prompt_f64("Window height (mm) [1200]: ", 1200.0);
    let qty = prompt_f64("Quantity [10]: ", 10.0).max(1.0) as u32;

    println!();
    println!("Calculating 2-panel casement (1 openable) x {qty}...");
    println!();

    let cart = vec![CartItem::new(ModuleId::CasementDCurve)
        .with_size(width_mm, height_mm)
        .with_panels(2)
        .with_openable(1)
        .with_qty(qty)];
    let settings = CalculationSettings::default();

    match calculate(&cart, &settings) {
        Ok(result) => {
            println!("═══════════════════════════════════════");
            println!("  MATERIAL LIST");
            println!("═══════════════════════════════════════");
            for item in &result.material_list {
                println!("  {:<40} {:>5} ({:?})", item.item, item.units, item.kind);
            }

            println!();
            println!("═══════════════════════════════════════");
            println!("  CUTTING PLANS ({:.0}mm bars, {:.0}mm kerf)",
                settings.stock_length_mm,
                settings.blade_kerf_mm
            );
            println!("═══════════════════════════════════════");
            for plan in &result.cutting_lists {
                println!("  {} - {} bars", plan.profile_name, plan.bar_count());
                for bar in &plan.bars {
                    println!("    {}: {}", bar.slot_label(), bar.cut_labels().join(", "));
                }
            }

            println!();
            println!("═══════════════════════════════════════");
            println!("  GLASS ({})", result.glass.sheet_type);
            println!("═══════════════════════════════════════");
            println!(
                "  Sheets required: {} ({:.2} m\u{b2} of glass)",
                result.glass.total_sheets,
                result.glass.total_area_m2().0
            );
            for cut in &result.glass.cuts {
                println!("    {:.0} x {:.0} mm  x {}", cut.w, cut.h, cut.qty);
            }

            let quote = build_quote(&result);
            println!();
            println!("  Quote lines: {} (prices pending, total {})",
                quote.len(),
                format_naira(quote_total(&quote))
            );

            println!();
            println!("JSON Output (for scripting/API use):");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}

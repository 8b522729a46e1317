//! # Curtain Wall Formulas
//!
//! Bill-of-materials formula for stick curtain wall grids
//! (`M9_Curtain_Wall_Grid`).
//!
//! Unlike the window families, the grid is not uniform: `cell_width` and
//! `cell_heights` arrays give each column/row its own size, and the
//! formula iterates per cell, producing one glass demand entry per
//! distinct cell dimension pair. When an array is absent the grid divides
//! the inside-to-inside dimension evenly.

use std::collections::BTreeMap;

use crate::engine::bom::RawDemand;
use crate::errors::{GlazeError, GlazeResult};
use crate::modules::CartItem;

/// Vertical grid member, full height
pub const CW_MULLION: &str = "Curtain Wall Mullion";
/// Horizontal grid member, cut per cell width
pub const CW_TRANSOM: &str = "Curtain Wall Transom";
/// Exterior pressure/cover cap, same cuts as the grid members
pub const CW_COVER_CAP: &str = "Pressure Cover Cap";

/// Glass deduction per cell dimension for the structural rebate (mm)
const CELL_GLASS_DEDUCTION_MM: f64 = 25.0;

/// Expand one curtain wall cart item into per-unit raw demand.
pub fn expand(item: &CartItem) -> GlazeResult<RawDemand> {
    let columns = item.require_count("N_v")?;
    let rows = item.require_count("N_h")?;

    let widths = cell_sizes(item, "cell_width", &item.cell_widths, columns, "in_to_in_width")?;
    let heights = cell_sizes(item, "cell_heights", &item.cell_heights, rows, "in_to_in_height")?;

    let total_w: f64 = widths.iter().sum();
    let total_h: f64 = heights.iter().sum();

    let mut demand = RawDemand::new();

    // Verticals run full height; horizontals are cut per cell width.
    demand.push_profile(CW_MULLION, total_h, columns + 1);
    demand.push_profile(CW_COVER_CAP, total_h, columns + 1);
    for &w in &widths {
        demand.push_profile(CW_TRANSOM, w, rows + 1);
        demand.push_profile(CW_COVER_CAP, w, rows + 1);
    }

    // One glass entry per distinct cell dimension pair. Keys are whole
    // millimetres, the same resolution the demands are snapped to.
    let mut panes: BTreeMap<(i64, i64), u32> = BTreeMap::new();
    for &w in &widths {
        for &h in &heights {
            let gw = w - CELL_GLASS_DEDUCTION_MM;
            let gh = h - CELL_GLASS_DEDUCTION_MM;
            if gw <= 0.0 || gh <= 0.0 {
                return Err(GlazeError::invalid_parameter(
                    item.module_id.as_str(),
                    if gw <= 0.0 { "cell_width" } else { "cell_heights" },
                    format!("{w}x{h}"),
                    "cell too small for the structural rebate",
                ));
            }
            *panes
                .entry((gw.round() as i64, gh.round() as i64))
                .or_insert(0) += 1;
        }
    }

    let mut gasket_m = 0.0;
    for (&(gw, gh), &count) in &panes {
        demand.push_glass(gw as f64, gh as f64, count);
        // Inner and outer gasket run
        gasket_m += count as f64 * 2.0 * 2.0 * (gw + gh) as f64 / 1000.0;
    }
    demand.push_rubber("Structural EPDM Gasket", gasket_m);

    demand.push_accessory("Setting Block", 2 * columns * rows);
    demand.push_accessory("Mullion Anchor", 2 * (columns + 1));

    Ok(demand)
}

/// Resolve per-cell sizes from the explicit array or a uniform division
/// of the inside-to-inside dimension.
fn cell_sizes(
    item: &CartItem,
    array_field: &str,
    array: &Option<Vec<f64>>,
    divisions: u32,
    span_field: &str,
) -> GlazeResult<Vec<f64>> {
    if let Some(sizes) = array {
        if sizes.len() != divisions as usize {
            return Err(GlazeError::invalid_parameter(
                item.module_id.as_str(),
                array_field,
                format!("{} entries", sizes.len()),
                format!("expected {divisions} to match the grid division"),
            ));
        }
        for &size in sizes {
            if size <= 0.0 || !size.is_finite() {
                return Err(GlazeError::invalid_parameter(
                    item.module_id.as_str(),
                    array_field,
                    size.to_string(),
                    "cell sizes must be positive",
                ));
            }
        }
        return Ok(sizes.clone());
    }

    // Uniform fallback: prefer the in-to-in dimension, accept W/H.
    let span = match span_field {
        "in_to_in_width" if item.in_to_in_width.is_none() && item.width_mm.is_some() => {
            item.require_dim("W")?
        }
        "in_to_in_height" if item.in_to_in_height.is_none() && item.height_mm.is_some() => {
            item.require_dim("H")?
        }
        _ => item.require_dim(span_field)?,
    };
    Ok(vec![span / divisions as f64; divisions as usize])
}

//! # Sliding Family Formulas
//!
//! Bill-of-materials formulas for sliding units on 2-track
//! (`M3_Sliding_2Track`) and 3-track (`M4_Sliding_3Track`) frames.
//!
//! ## Assumptions
//!
//! - Panels divide the width evenly and overlap at every meeting stile
//! - Panel height rides the track, losing a fixed deduction to the frame
//! - A track carries at most two panels
//!
//! All formulas are per single unit; the expander multiplies by `qty`.

use crate::engine::bom::RawDemand;
use crate::errors::{GlazeError, GlazeResult};
use crate::modules::{CartItem, ModuleId};

/// Outer frame, 2-track system
pub const SLIDING_FRAME_2T: &str = "Sliding Frame (2-Track)";
/// Outer frame, 3-track system
pub const SLIDING_FRAME_3T: &str = "Sliding Frame (3-Track)";
/// Panel surround profile (shared by both systems)
pub const SLIDING_PANEL: &str = "Sliding Panel";
/// Interlock profile at meeting stiles
pub const SLIDING_INTERLOCK: &str = "Sliding Interlock";

/// Panel height lost to head and sill tracks (mm)
const TRACK_DEDUCTION_MM: f64 = 45.0;
/// Extra panel width at each meeting stile (mm)
const INTERLOCK_OVERLAP_MM: f64 = 25.0;
/// Glass deduction across the panel width (mm)
const GLASS_W_DEDUCTION_MM: f64 = 80.0;
/// Glass deduction down the panel height (mm)
const GLASS_H_DEDUCTION_MM: f64 = 125.0;

/// Expand one sliding-family cart item into per-unit raw demand.
pub fn expand(item: &CartItem) -> GlazeResult<RawDemand> {
    let (frame_profile, tracks) = match item.module_id {
        ModuleId::Sliding2Track => (SLIDING_FRAME_2T, 2u32),
        ModuleId::Sliding3Track => (SLIDING_FRAME_3T, 3u32),
        other => {
            return Err(GlazeError::Internal {
                message: format!("{other} routed to sliding family"),
            })
        }
    };

    let w = item.require_dim("W")?;
    let h = item.require_dim("H")?;
    let n = item.require_count("N")?;

    if n < 2 {
        return Err(GlazeError::invalid_parameter(
            item.module_id.as_str(),
            "N",
            n.to_string(),
            "a sliding unit needs at least 2 panels",
        ));
    }
    if n > 2 * tracks {
        return Err(GlazeError::invalid_parameter(
            item.module_id.as_str(),
            "N",
            n.to_string(),
            format!("a {tracks}-track frame carries at most {} panels", 2 * tracks),
        ));
    }

    let mut demand = RawDemand::new();

    demand.push_profile(frame_profile, w, 2);
    demand.push_profile(frame_profile, h, 2);

    let panel_w = w / n as f64 + INTERLOCK_OVERLAP_MM;
    let panel_h = h - TRACK_DEDUCTION_MM;
    ensure_cut(item, "H", panel_h)?;

    demand.push_profile(SLIDING_PANEL, panel_h, 2 * n);
    demand.push_profile(SLIDING_PANEL, panel_w, 2 * n);
    demand.push_profile(SLIDING_INTERLOCK, panel_h, 2 * (n - 1));

    let gw = panel_w - GLASS_W_DEDUCTION_MM;
    let gh = h - GLASS_H_DEDUCTION_MM;
    ensure_cut(item, "W", gw)?;
    ensure_cut(item, "H", gh)?;
    demand.push_glass(gw, gh, n);

    demand.push_rubber(
        "Wool Pile",
        n as f64 * 2.0 * (panel_w + panel_h) / 1000.0,
    );
    demand.push_rubber(
        "EPDM Glazing Gasket",
        n as f64 * 2.0 * (gw + gh) / 1000.0,
    );

    demand.push_accessory("Sliding Roller", n);
    demand.push_accessory("Sliding Lock", 1);
    demand.push_accessory("Anti-Lift Block", 2);

    Ok(demand)
}

fn ensure_cut(item: &CartItem, field: &str, length_mm: f64) -> GlazeResult<()> {
    if length_mm <= 0.0 {
        return Err(GlazeError::invalid_parameter(
            item.module_id.as_str(),
            field,
            length_mm.to_string(),
            "unit too small for track and glazing deductions",
        ));
    }
    Ok(())
}

//! # Casement Family Formulas
//!
//! Bill-of-materials formulas for the hinged family: casement windows
//! (`M1_Casement_DCurve`), projecting top-hung windows
//! (`M2_Projecting_Top_Hung`), and single-leaf swing doors
//! (`M5_Swing_Door`).
//!
//! ## Assumptions
//!
//! - Panels divide the width evenly; mullions sit on the division lines
//! - Openable panels carry a sash inside the panel opening; fixed panels
//!   are glazed directly into the frame
//! - Swing doors are three-sided frames (no threshold) with a mid rail
//!   splitting the leaf into two equal panes
//!
//! All formulas are per single unit; the expander multiplies by `qty`.

use crate::engine::bom::RawDemand;
use crate::errors::{GlazeError, GlazeResult};
use crate::modules::{CartItem, ModuleId};

/// Frame profile shared by the casement system
pub const CASEMENT_FRAME: &str = "Casement Frame";
/// Sash profile for openable panels
pub const CASEMENT_SASH: &str = "Casement Sash";
/// Mullion dividing adjacent panels
pub const CASEMENT_MULLION: &str = "Casement Mullion";
/// Snap-in glazing bead, shared with the door leaf
pub const GLAZING_BEAD: &str = "Glazing Bead";
/// Door outer frame (three-sided)
pub const DOOR_FRAME: &str = "Door Frame";
/// Door leaf profile
pub const DOOR_SASH: &str = "Door Sash";
/// Horizontal mid rail of the door leaf
pub const DOOR_MID_RAIL: &str = "Door Mid Rail";

/// Clearance between panel opening and sash, total per dimension (mm)
const SASH_DEDUCTION_MM: f64 = 12.0;
/// Glass deduction for a directly-glazed (fixed) panel, per dimension (mm)
const FIXED_GLASS_DEDUCTION_MM: f64 = 46.0;
/// Glass deduction for a sash-glazed (openable) panel, per dimension (mm)
const OPENABLE_GLASS_DEDUCTION_MM: f64 = 98.0;
/// Door leaf clearance inside the frame, per dimension (mm)
const DOOR_SASH_DEDUCTION_MM: f64 = 20.0;
/// Door glass deduction across the width (mm)
const DOOR_GLASS_W_DEDUCTION_MM: f64 = 180.0;
/// Door glazing height lost to frame, leaf, and mid rail (mm)
const DOOR_GLASS_H_DEDUCTION_MM: f64 = 240.0;

/// Expand one casement-family cart item into per-unit raw demand.
pub fn expand(item: &CartItem) -> GlazeResult<RawDemand> {
    match item.module_id {
        ModuleId::CasementDCurve => {
            let w = item.require_dim("W")?;
            let h = item.require_dim("H")?;
            let n = item.require_count("N")?;
            let o = item
                .openable
                .ok_or_else(|| GlazeError::missing_parameter(item.module_id.as_str(), "O"))?;
            if o > n {
                return Err(GlazeError::invalid_parameter(
                    item.module_id.as_str(),
                    "O",
                    o.to_string(),
                    format!("cannot exceed panel count N={n}"),
                ));
            }
            casement_window(item, w, h, n, o)
        }
        ModuleId::ProjectingTopHung => {
            let w = item.require_dim("W")?;
            let h = item.require_dim("H")?;
            let n = item.require_count("N")?;
            // Every projecting panel opens
            casement_window(item, w, h, n, n)
        }
        ModuleId::SwingDoor => {
            let w = item.require_dim("W")?;
            let h = item.require_dim("H")?;
            swing_door(item, w, h)
        }
        other => Err(GlazeError::Internal {
            message: format!("{other} routed to casement family"),
        }),
    }
}

fn casement_window(item: &CartItem, w: f64, h: f64, n: u32, o: u32) -> GlazeResult<RawDemand> {
    let mut demand = RawDemand::new();
    let panel_w = w / n as f64;

    // Outer frame and mullions
    demand.push_profile(CASEMENT_FRAME, w, 2);
    demand.push_profile(CASEMENT_FRAME, h, 2);
    demand.push_profile(CASEMENT_MULLION, h, n - 1);

    // Sashes on openable panels
    let sash_w = panel_w - SASH_DEDUCTION_MM;
    let sash_h = h - SASH_DEDUCTION_MM;
    if o > 0 {
        ensure_cut(item, "W", sash_w)?;
        ensure_cut(item, "H", sash_h)?;
        demand.push_profile(CASEMENT_SASH, sash_w, 2 * o);
        demand.push_profile(CASEMENT_SASH, sash_h, 2 * o);
        demand.push_rubber("Flipper Gasket", o as f64 * 2.0 * (sash_w + sash_h) / 1000.0);
    }

    // Glass, beading, and glazing gasket per pane
    let fixed = n - o;
    if o > 0 {
        let gw = panel_w - OPENABLE_GLASS_DEDUCTION_MM;
        let gh = h - OPENABLE_GLASS_DEDUCTION_MM;
        push_pane(item, &mut demand, gw, gh, o)?;
    }
    if fixed > 0 {
        let gw = panel_w - FIXED_GLASS_DEDUCTION_MM;
        let gh = h - FIXED_GLASS_DEDUCTION_MM;
        push_pane(item, &mut demand, gw, gh, fixed)?;
    }

    // Frame corners plus sash corners
    demand.push_accessory("Corner Cleat", 4 + 4 * o);
    demand.push_accessory("Friction Stay", o);
    demand.push_accessory("Casement Handle", o);

    Ok(demand)
}

fn swing_door(item: &CartItem, w: f64, h: f64) -> GlazeResult<RawDemand> {
    let mut demand = RawDemand::new();

    demand.push_profile(DOOR_FRAME, h, 2);
    demand.push_profile(DOOR_FRAME, w, 1);

    let leaf_w = w - DOOR_SASH_DEDUCTION_MM;
    let leaf_h = h - DOOR_SASH_DEDUCTION_MM;
    ensure_cut(item, "W", leaf_w)?;
    ensure_cut(item, "H", leaf_h)?;
    demand.push_profile(DOOR_SASH, leaf_h, 2);
    demand.push_profile(DOOR_SASH, leaf_w, 2);
    demand.push_profile(DOOR_MID_RAIL, leaf_w, 1);

    // Mid rail splits the leaf into two equal panes
    let gw = w - DOOR_GLASS_W_DEDUCTION_MM;
    let gh = (h - DOOR_GLASS_H_DEDUCTION_MM) / 2.0;
    push_pane(item, &mut demand, gw, gh, 2)?;

    demand.push_accessory("Door Hinge", 2);
    demand.push_accessory("Door Lock", 1);
    demand.push_accessory("Door Handle", 1);

    Ok(demand)
}

/// Add one pane size: glass, its beading, and its glazing gasket.
fn push_pane(
    item: &CartItem,
    demand: &mut RawDemand,
    gw: f64,
    gh: f64,
    count: u32,
) -> GlazeResult<()> {
    ensure_cut(item, "W", gw)?;
    ensure_cut(item, "H", gh)?;
    demand.push_glass(gw, gh, count);
    demand.push_profile(GLAZING_BEAD, gw, 2 * count);
    demand.push_profile(GLAZING_BEAD, gh, 2 * count);
    demand.push_rubber(
        "EPDM Glazing Gasket",
        count as f64 * 2.0 * (gw + gh) / 1000.0,
    );
    Ok(())
}

/// A derived cut or pane dimension must stay positive; when it does not,
/// the unit is too small for the system's deductions.
fn ensure_cut(item: &CartItem, field: &str, length_mm: f64) -> GlazeResult<()> {
    if length_mm <= 0.0 {
        return Err(GlazeError::invalid_parameter(
            item.module_id.as_str(),
            field,
            length_mm.to_string(),
            "unit too small for profile and glazing deductions",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{CartItem, ModuleId};

    fn profile_count(demand: &RawDemand, name: &str) -> u32 {
        demand
            .profile_demands
            .iter()
            .filter(|d| d.profile_name == name)
            .map(|d| d.count)
            .sum()
    }

    #[test]
    fn test_casement_two_panel_one_openable() {
        let item = CartItem::new(ModuleId::CasementDCurve)
            .with_size(1200.0, 1200.0)
            .with_panels(2)
            .with_openable(1);
        let demand = expand(&item).unwrap();

        assert_eq!(profile_count(&demand, CASEMENT_FRAME), 4);
        assert_eq!(profile_count(&demand, CASEMENT_MULLION), 1);
        assert_eq!(profile_count(&demand, CASEMENT_SASH), 4);

        // One openable pane (502x1102), one fixed pane (554x1154)
        assert_eq!(demand.total_panes(), 2);
        assert!(demand
            .glass_demands
            .iter()
            .any(|g| g.w_mm == 502.0 && g.h_mm == 1102.0 && g.count == 1));
        assert!(demand
            .glass_demands
            .iter()
            .any(|g| g.w_mm == 554.0 && g.h_mm == 1154.0 && g.count == 1));

        let stays: u32 = demand
            .accessory_demands
            .iter()
            .filter(|a| a.name == "Friction Stay")
            .map(|a| a.count)
            .sum();
        assert_eq!(stays, 1);
        let cleats: u32 = demand
            .accessory_demands
            .iter()
            .filter(|a| a.name == "Corner Cleat")
            .map(|a| a.count)
            .sum();
        assert_eq!(cleats, 8);
    }

    #[test]
    fn test_casement_all_fixed_has_no_sash() {
        let item = CartItem::new(ModuleId::CasementDCurve)
            .with_size(1800.0, 1200.0)
            .with_panels(3)
            .with_openable(0);
        let demand = expand(&item).unwrap();
        assert_eq!(profile_count(&demand, CASEMENT_SASH), 0);
        assert!(!demand.rubber_demands.iter().any(|r| r.name == "Flipper Gasket"));
        assert_eq!(demand.total_panes(), 3);
    }

    #[test]
    fn test_projecting_opens_every_panel() {
        let item = CartItem::new(ModuleId::ProjectingTopHung)
            .with_size(1800.0, 600.0)
            .with_panels(3);
        let demand = expand(&item).unwrap();
        let stays: u32 = demand
            .accessory_demands
            .iter()
            .filter(|a| a.name == "Friction Stay")
            .map(|a| a.count)
            .sum();
        assert_eq!(stays, 3);
        assert_eq!(profile_count(&demand, CASEMENT_SASH), 12);
    }

    #[test]
    fn test_openable_exceeding_panels_rejected() {
        let item = CartItem::new(ModuleId::CasementDCurve)
            .with_size(1200.0, 1200.0)
            .with_panels(2)
            .with_openable(3);
        let err = expand(&item).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("'O'"));
    }

    #[test]
    fn test_swing_door_demand() {
        let item = CartItem::new(ModuleId::SwingDoor).with_size(900.0, 2100.0);
        let demand = expand(&item).unwrap();

        assert_eq!(profile_count(&demand, DOOR_FRAME), 3);
        assert_eq!(profile_count(&demand, DOOR_SASH), 4);
        assert_eq!(profile_count(&demand, DOOR_MID_RAIL), 1);

        // Two equal panes of 720x930
        assert_eq!(demand.total_panes(), 2);
        assert!(demand
            .glass_demands
            .iter()
            .all(|g| g.w_mm == 720.0 && g.h_mm == 930.0));

        let hinges: u32 = demand
            .accessory_demands
            .iter()
            .filter(|a| a.name == "Door Hinge")
            .map(|a| a.count)
            .sum();
        assert_eq!(hinges, 2);
    }

    #[test]
    fn test_unit_too_small_to_glaze() {
        let item = CartItem::new(ModuleId::CasementDCurve)
            .with_size(90.0, 1200.0)
            .with_panels(1)
            .with_openable(1);
        let err = expand(&item).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_missing_height_named_in_error() {
        let mut item = CartItem::new(ModuleId::SwingDoor).with_size(900.0, 2100.0);
        item.height_mm = None;
        let err = expand(&item).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
        assert!(err.to_string().contains("'H'"));
    }
}

//! # Calculation Engine
//!
//! Turns a cart of glazing requirements into a complete material
//! estimate: the bill of materials is expanded per module formula, profile
//! demands are packed onto stock bars, glass demands are nested onto
//! stock sheets, and consumables are summed into purchase totals.
//!
//! The whole run is a pure function over immutable inputs: no ambient
//! state, no I/O, no randomness. It either fully succeeds with a
//! [`CalculationResult`] or fails with the first error encountered -
//! consumers never see a partially populated result. Recalculation
//! replaces the result wholesale.
//!
//! Independent runs may execute concurrently on their own copies of the
//! inputs; the engine holds no shared state and no cancellable
//! resources, so discarding an unwanted result is the whole cancellation
//! protocol.
//!
//! ## Example
//!
//! ```rust
//! use glaze_core::engine::{calculate, CalculationSettings};
//! use glaze_core::modules::{CartItem, ModuleId};
//!
//! let cart = vec![CartItem::new(ModuleId::CasementDCurve)
//!     .with_size(1200.0, 1200.0)
//!     .with_panels(2)
//!     .with_openable(1)
//!     .with_qty(10)];
//!
//! let result = calculate(&cart, &CalculationSettings::default()).unwrap();
//! assert!(!result.material_list.is_empty());
//! assert!(result.glass.total_sheets > 0);
//! ```

pub mod aggregate;
pub mod bom;
pub mod cutting;
pub mod nesting;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use aggregate::{AccessoryTotal, MaterialKind, MaterialListItem, RubberTotal};
pub use bom::{AccessoryDemand, GlassDemand, ProfileDemand, RawDemand, RubberDemand};
pub use cutting::{BarAssignment, CuttingListItem};
pub use nesting::{GlassCut, GlassListResult, PanePlacement, SheetAssignment};

use crate::errors::{GlazeError, GlazeResult};
use crate::modules::CartItem;

/// Full-length aluminium stock bar (mm)
pub const STOCK_LENGTH_FULL_MM: f64 = 6000.0;
/// Short stock bar variant some suppliers deliver (mm)
pub const STOCK_LENGTH_SHORT_MM: f64 = 5580.0;
/// Default float glass sheet width (mm)
pub const SHEET_WIDTH_DEFAULT_MM: f64 = 2440.0;
/// Default float glass sheet height (mm)
pub const SHEET_HEIGHT_DEFAULT_MM: f64 = 1830.0;

/// Bin-packing policy for the profile cutting plan.
///
/// The packing heuristic is a replaceable seam, not a fixed contract;
/// both policies are deterministic bounded-time greedy algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PackingPolicy {
    /// Sort descending, fill one bar at a time with the largest fitting
    /// piece (default)
    #[default]
    FirstFitDecreasing,
    /// Sort descending, place each piece in the open bar with the least
    /// leftover
    BestFitDecreasing,
}

/// Global settings for one calculation run.
///
/// Always passed explicitly - the engine never reads defaults from
/// ambient state. Immutable for the duration of a run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "stock_length_mm": 6000.0,
///   "blade_kerf_mm": 5.0,
///   "waste_threshold_mm": 200.0,
///   "sheet_width_mm": 2440.0,
///   "sheet_height_mm": 1830.0,
///   "allow_pane_rotation": false,
///   "packing_policy": "FirstFitDecreasing"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSettings {
    /// Stock bar length (mm); suppliers deliver 6000 or 5580
    pub stock_length_mm: f64,
    /// Material lost to the saw blade per additional cut (mm)
    pub blade_kerf_mm: f64,
    /// Minimum remainder worth keeping as a usable off-cut (mm)
    pub waste_threshold_mm: f64,
    /// Stock glass sheet width (mm)
    pub sheet_width_mm: f64,
    /// Stock glass sheet height (mm)
    pub sheet_height_mm: f64,
    /// Allow the nester to rotate panes 90 degrees
    pub allow_pane_rotation: bool,
    pub packing_policy: PackingPolicy,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            stock_length_mm: STOCK_LENGTH_FULL_MM,
            blade_kerf_mm: 5.0,
            waste_threshold_mm: 200.0,
            sheet_width_mm: SHEET_WIDTH_DEFAULT_MM,
            sheet_height_mm: SHEET_HEIGHT_DEFAULT_MM,
            allow_pane_rotation: false,
            packing_policy: PackingPolicy::default(),
        }
    }
}

impl CalculationSettings {
    /// Validate settings before a run.
    pub fn validate(&self) -> GlazeResult<()> {
        let positive = [
            ("stock_length_mm", self.stock_length_mm),
            ("sheet_width_mm", self.sheet_width_mm),
            ("sheet_height_mm", self.sheet_height_mm),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(GlazeError::invalid_settings(
                    field,
                    value.to_string(),
                    "must be positive",
                ));
            }
        }
        if self.blade_kerf_mm < 0.0 || self.blade_kerf_mm >= self.stock_length_mm {
            return Err(GlazeError::invalid_settings(
                "blade_kerf_mm",
                self.blade_kerf_mm.to_string(),
                "must be non-negative and smaller than the stock length",
            ));
        }
        if self.waste_threshold_mm < 0.0 {
            return Err(GlazeError::invalid_settings(
                "waste_threshold_mm",
                self.waste_threshold_mm.to_string(),
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Complete output of one calculation run.
///
/// Read-only for consumers (quote conversion, list screens, exports);
/// recalculation produces a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Purchasable items, pre-summed per distinct name
    pub material_list: Vec<MaterialListItem>,
    /// One cutting plan per profile that required cutting
    pub cutting_lists: Vec<CuttingListItem>,
    /// Sheet requirement and pane assignments
    pub glass: GlassListResult,
    pub rubber_totals: Vec<RubberTotal>,
    pub accessory_totals: Vec<AccessoryTotal>,
}

/// Run the engine over a cart.
///
/// Fails fast on the first invalid cart item, oversized profile piece,
/// or oversized pane; on success every collection in the result is
/// final.
pub fn calculate(
    cart: &[CartItem],
    settings: &CalculationSettings,
) -> GlazeResult<CalculationResult> {
    settings.validate()?;

    let demand = bom::expand_cart(cart)?;

    let cutting_lists = cutting::plan_all(&demand.profile_demands, settings)?;
    let glass = nesting::nest(&demand.glass_demands, settings)?;
    let rubber_totals = aggregate::aggregate_rubber(&demand.rubber_demands);
    let accessory_totals = aggregate::aggregate_accessories(&demand.accessory_demands);

    let material_list =
        aggregate::material_list(&cutting_lists, &glass, &rubber_totals, &accessory_totals);

    Ok(CalculationResult {
        material_list,
        cutting_lists,
        glass,
        rubber_totals,
        accessory_totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{casement, CartItem, ModuleId};

    fn m1_scenario() -> Vec<CartItem> {
        vec![CartItem::new(ModuleId::CasementDCurve)
            .with_size(1200.0, 1200.0)
            .with_panels(2)
            .with_openable(1)
            .with_qty(10)]
    }

    #[test]
    fn test_m1_scenario_cutting_plans() {
        let result = calculate(&m1_scenario(), &CalculationSettings::default()).unwrap();

        // One plan per distinct casement profile
        let names: Vec<_> = result
            .cutting_lists
            .iter()
            .map(|p| p.profile_name.as_str())
            .collect();
        assert!(names.contains(&casement::CASEMENT_FRAME));
        assert!(names.contains(&casement::CASEMENT_MULLION));
        assert!(names.contains(&casement::CASEMENT_SASH));
        assert!(names.contains(&casement::GLAZING_BEAD));

        // 40 frame pieces of 1200mm pack four per 6000mm bar
        let frame = result
            .cutting_lists
            .iter()
            .find(|p| p.profile_name == casement::CASEMENT_FRAME)
            .unwrap();
        assert_eq!(frame.bar_count(), 10);
        assert!(frame.bars.iter().all(|b| b.cuts_mm.len() == 4));

        // 10 mullion pieces pack 4 + 4 + 2
        let mullion = result
            .cutting_lists
            .iter()
            .find(|p| p.profile_name == casement::CASEMENT_MULLION)
            .unwrap();
        assert_eq!(mullion.bar_count(), 3);
    }

    #[test]
    fn test_bar_conservation_across_whole_run() {
        let settings = CalculationSettings::default();
        let result = calculate(&m1_scenario(), &settings).unwrap();

        for plan in &result.cutting_lists {
            for bar in &plan.bars {
                let cuts: f64 = bar.cuts_mm.iter().sum();
                let balance = cuts + bar.kerf_overhead_mm(settings.blade_kerf_mm) + bar.offcut_mm;
                assert!((balance - plan.stock_length_mm).abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_glass_totals() {
        let result = calculate(&m1_scenario(), &CalculationSettings::default()).unwrap();

        // 10 openable + 10 fixed panes
        assert_eq!(result.glass.total_panes(), 20);
        assert_eq!(result.glass.total_sheets, 5);
        assert_eq!(result.glass.total_sheets as usize, result.glass.sheets.len());
        let placed: usize = result.glass.sheets.iter().map(|s| s.panes.len()).sum();
        assert_eq!(placed as u32, result.glass.total_panes());
    }

    #[test]
    fn test_idempotent() {
        let settings = CalculationSettings::default();
        let a = calculate(&m1_scenario(), &settings).unwrap();
        let b = calculate(&m1_scenario(), &settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_profile_merges_across_items() {
        // Casement window and projecting window share the casement system
        let cart = vec![
            CartItem::new(ModuleId::CasementDCurve)
                .with_size(1200.0, 1200.0)
                .with_panels(2)
                .with_openable(1),
            CartItem::new(ModuleId::ProjectingTopHung)
                .with_size(1800.0, 600.0)
                .with_panels(3),
        ];
        let result = calculate(&cart, &CalculationSettings::default()).unwrap();

        let frame_plans = result
            .cutting_lists
            .iter()
            .filter(|p| p.profile_name == casement::CASEMENT_FRAME)
            .count();
        assert_eq!(frame_plans, 1);

        // Both items' frame pieces are in the one plan
        let frame = result
            .cutting_lists
            .iter()
            .find(|p| p.profile_name == casement::CASEMENT_FRAME)
            .unwrap();
        let cuts: usize = frame.bars.iter().map(|b| b.cuts_mm.len()).sum();
        assert_eq!(cuts, 8);
    }

    #[test]
    fn test_error_aborts_whole_run() {
        let cart = vec![
            m1_scenario().remove(0),
            // Curtain wall with a piece taller than the stock bar
            CartItem::new(ModuleId::CurtainWallGrid)
                .with_grid(2, 2)
                .with_in_to_in(2400.0, 6500.0),
        ];
        let err = calculate(&cart, &CalculationSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "PIECE_TOO_LONG");
    }

    #[test]
    fn test_short_stock_variant() {
        let settings = CalculationSettings {
            stock_length_mm: STOCK_LENGTH_SHORT_MM,
            ..Default::default()
        };
        let result = calculate(&m1_scenario(), &settings).unwrap();
        // 1200 + 3 x 1205 = 4815 still fits in 5580, so still 4 per bar
        let frame = result
            .cutting_lists
            .iter()
            .find(|p| p.profile_name == casement::CASEMENT_FRAME)
            .unwrap();
        assert_eq!(frame.stock_length_mm, 5580.0);
        assert_eq!(frame.bar_count(), 10);
    }

    #[test]
    fn test_settings_validation() {
        let settings = CalculationSettings {
            stock_length_mm: 0.0,
            ..Default::default()
        };
        let err = calculate(&m1_scenario(), &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SETTINGS");

        let settings = CalculationSettings {
            blade_kerf_mm: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_material_list_covers_all_outputs() {
        let result = calculate(&m1_scenario(), &CalculationSettings::default()).unwrap();

        for plan in &result.cutting_lists {
            assert!(result
                .material_list
                .iter()
                .any(|i| i.item == plan.profile_name && i.kind == MaterialKind::Profile));
        }
        assert!(result
            .material_list
            .iter()
            .any(|i| i.kind == MaterialKind::Sheet));
        for rubber in &result.rubber_totals {
            assert!(result.material_list.iter().any(|i| i.item == rubber.name));
        }
    }

    #[test]
    fn test_result_serde_roundtrip() {
        let result = calculate(&m1_scenario(), &CalculationSettings::default()).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}

//! # Module Parameter Catalog
//!
//! A *module* is a parametrized glazing-unit formula (a casement window
//! type, a sliding door type, a curtain wall grid) identified by a stable
//! id string such as `"M1_Casement_DCurve"`. Each module declares which
//! parameters it reads and owns a deterministic bill-of-materials formula
//! from those parameters to raw profile/glass/rubber/accessory demand.
//!
//! The registry is a closed enum, not a string-keyed dispatch table:
//! unknown ids are rejected once at the string boundary
//! ([`ModuleId::parse`] or serde) and every formula is exhaustively
//! enumerable after that.
//!
//! ## Registered Modules
//!
//! - [`casement`] - casement windows, projecting (top-hung) windows, swing doors
//! - [`sliding`] - 2-track and 3-track sliding windows/doors
//! - [`curtain_wall`] - stick curtain wall grids with per-cell dimensions
//!
//! ## Example
//!
//! ```rust
//! use glaze_core::modules::{CartItem, ModuleId};
//!
//! let id = ModuleId::parse("M1_Casement_DCurve").unwrap();
//! let item = CartItem::new(id).with_size(1200.0, 1200.0).with_qty(10);
//! assert_eq!(item.qty, 10);
//!
//! // Unknown ids fail at the boundary
//! assert!(ModuleId::parse("M42_Skylight").is_err());
//! ```

pub mod casement;
pub mod catalog;
pub mod curtain_wall;
pub mod sliding;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{GlazeError, GlazeResult};

/// Identifier for a registered glazing module.
///
/// Serializes to the original id strings (`"M1_Casement_DCurve"`, ...) so
/// cart JSON stays compatible with project files produced by the client
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    /// Casement window, D-curve profile system
    #[serde(rename = "M1_Casement_DCurve")]
    CasementDCurve,
    /// Projecting (top-hung) window; every panel opens
    #[serde(rename = "M2_Projecting_Top_Hung")]
    ProjectingTopHung,
    /// Sliding window/door on a 2-track frame
    #[serde(rename = "M3_Sliding_2Track")]
    Sliding2Track,
    /// Sliding window/door on a 3-track frame
    #[serde(rename = "M4_Sliding_3Track")]
    Sliding3Track,
    /// Single-leaf swing door
    #[serde(rename = "M5_Swing_Door")]
    SwingDoor,
    /// Stick curtain wall grid with per-cell glass
    #[serde(rename = "M9_Curtain_Wall_Grid")]
    CurtainWallGrid,
}

impl ModuleId {
    /// All registered modules, in id order.
    pub const ALL: [ModuleId; 6] = [
        ModuleId::CasementDCurve,
        ModuleId::ProjectingTopHung,
        ModuleId::Sliding2Track,
        ModuleId::Sliding3Track,
        ModuleId::SwingDoor,
        ModuleId::CurtainWallGrid,
    ];

    /// Resolve an id string to a registered module.
    ///
    /// This is the only place an unknown module id can surface; after it,
    /// the type system guarantees every module is handled.
    pub fn parse(s: &str) -> GlazeResult<ModuleId> {
        ModuleId::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| GlazeError::unknown_module(s))
    }

    /// The stable id string used in cart JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::CasementDCurve => "M1_Casement_DCurve",
            ModuleId::ProjectingTopHung => "M2_Projecting_Top_Hung",
            ModuleId::Sliding2Track => "M3_Sliding_2Track",
            ModuleId::Sliding3Track => "M4_Sliding_3Track",
            ModuleId::SwingDoor => "M5_Swing_Door",
            ModuleId::CurtainWallGrid => "M9_Curtain_Wall_Grid",
        }
    }

    /// Human-readable name for screens and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleId::CasementDCurve => "Casement Window (D-Curve)",
            ModuleId::ProjectingTopHung => "Projecting Window (Top-Hung)",
            ModuleId::Sliding2Track => "Sliding Unit (2-Track)",
            ModuleId::Sliding3Track => "Sliding Unit (3-Track)",
            ModuleId::SwingDoor => "Swing Door",
            ModuleId::CurtainWallGrid => "Curtain Wall Grid",
        }
    }

    /// Declared parameters for this module.
    pub fn spec(&self) -> &'static ModuleSpec {
        match self {
            ModuleId::CasementDCurve => &CASEMENT_D_CURVE_SPEC,
            ModuleId::ProjectingTopHung => &PROJECTING_TOP_HUNG_SPEC,
            ModuleId::Sliding2Track => &SLIDING_2_TRACK_SPEC,
            ModuleId::Sliding3Track => &SLIDING_3_TRACK_SPEC,
            ModuleId::SwingDoor => &SWING_DOOR_SPEC,
            ModuleId::CurtainWallGrid => &CURTAIN_WALL_GRID_SPEC,
        }
    }
}

impl FromStr for ModuleId {
    type Err = GlazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::parse(s)
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic role of a module parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamRole {
    /// A physical dimension in millimetres (W, H, in_to_in_width, ...)
    Dimension,
    /// A discrete count (panels, openable panels, grid divisions)
    Count,
    /// A per-cell dimension array (curtain wall cell widths/heights)
    PerCellArray,
}

/// Declaration of one parameter a module reads.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Field name as it appears in cart JSON
    pub name: &'static str,
    pub role: ParamRole,
    /// Whether the formula fails without it. Optional parameters have a
    /// documented fallback (e.g. curtain wall cell arrays default to a
    /// uniform grid division).
    pub required: bool,
}

/// Declared parameter set for a module.
pub struct ModuleSpec {
    pub id: ModuleId,
    pub params: &'static [ParamSpec],
}

const fn dim(name: &'static str, required: bool) -> ParamSpec {
    ParamSpec {
        name,
        role: ParamRole::Dimension,
        required,
    }
}

const fn count(name: &'static str, required: bool) -> ParamSpec {
    ParamSpec {
        name,
        role: ParamRole::Count,
        required,
    }
}

const fn cells(name: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        role: ParamRole::PerCellArray,
        required: false,
    }
}

static CASEMENT_D_CURVE_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::CasementDCurve,
    params: &[dim("W", true), dim("H", true), count("N", true), count("O", true)],
};

static PROJECTING_TOP_HUNG_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::ProjectingTopHung,
    params: &[dim("W", true), dim("H", true), count("N", true)],
};

static SLIDING_2_TRACK_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::Sliding2Track,
    params: &[dim("W", true), dim("H", true), count("N", true)],
};

static SLIDING_3_TRACK_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::Sliding3Track,
    params: &[dim("W", true), dim("H", true), count("N", true)],
};

static SWING_DOOR_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::SwingDoor,
    params: &[dim("W", true), dim("H", true)],
};

static CURTAIN_WALL_GRID_SPEC: ModuleSpec = ModuleSpec {
    id: ModuleId::CurtainWallGrid,
    params: &[
        count("N_v", true),
        count("N_h", true),
        dim("in_to_in_width", false),
        dim("in_to_in_height", false),
        cells("cell_width"),
        cells("cell_heights"),
    ],
};

/// One line of a project's glazing requirements.
///
/// Field names mirror the cart JSON produced by the dimension-entry
/// screens; parameters a module does not read are simply ignored by its
/// formula. `qty` defaults to 1 when absent.
///
/// ## JSON Example
///
/// ```json
/// { "module_id": "M1_Casement_DCurve", "W": 1200, "H": 1200, "N": 2, "O": 1, "qty": 10 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub module_id: ModuleId,

    /// Overall width (mm)
    #[serde(rename = "W", default, skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<f64>,

    /// Overall height (mm)
    #[serde(rename = "H", default, skip_serializing_if = "Option::is_none")]
    pub height_mm: Option<f64>,

    /// Number of panels across the width
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub panels: Option<u32>,

    /// Curtain wall: number of vertical divisions (columns)
    #[serde(rename = "N_v", default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,

    /// Curtain wall: number of horizontal divisions (rows)
    #[serde(rename = "N_h", default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,

    /// Number of openable panels (casement family)
    #[serde(rename = "O", default, skip_serializing_if = "Option::is_none")]
    pub openable: Option<u32>,

    /// Unit quantity; defaults to 1
    #[serde(default = "default_qty")]
    pub qty: u32,

    /// Curtain wall: inside-to-inside frame width (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_to_in_width: Option<f64>,

    /// Curtain wall: inside-to-inside frame height (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_to_in_height: Option<f64>,

    /// Curtain wall: per-row cell heights (mm), length `N_h`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_heights: Option<Vec<f64>>,

    /// Curtain wall: per-column cell widths (mm), length `N_v`
    #[serde(rename = "cell_width", default, skip_serializing_if = "Option::is_none")]
    pub cell_widths: Option<Vec<f64>>,
}

fn default_qty() -> u32 {
    1
}

impl CartItem {
    pub fn new(module_id: ModuleId) -> Self {
        CartItem {
            module_id,
            width_mm: None,
            height_mm: None,
            panels: None,
            columns: None,
            rows: None,
            openable: None,
            qty: 1,
            in_to_in_width: None,
            in_to_in_height: None,
            cell_heights: None,
            cell_widths: None,
        }
    }

    pub fn with_size(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.width_mm = Some(width_mm);
        self.height_mm = Some(height_mm);
        self
    }

    pub fn with_panels(mut self, panels: u32) -> Self {
        self.panels = Some(panels);
        self
    }

    pub fn with_openable(mut self, openable: u32) -> Self {
        self.openable = Some(openable);
        self
    }

    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = Some(columns);
        self.rows = Some(rows);
        self
    }

    pub fn with_in_to_in(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.in_to_in_width = Some(width_mm);
        self.in_to_in_height = Some(height_mm);
        self
    }

    pub fn with_cell_widths(mut self, widths_mm: Vec<f64>) -> Self {
        self.cell_widths = Some(widths_mm);
        self
    }

    pub fn with_cell_heights(mut self, heights_mm: Vec<f64>) -> Self {
        self.cell_heights = Some(heights_mm);
        self
    }

    /// Fetch a required dimension parameter, failing with the field name
    /// the way the dimension-entry screens spell it.
    pub(crate) fn require_dim(&self, field: &str) -> GlazeResult<f64> {
        let value = match field {
            "W" => self.width_mm,
            "H" => self.height_mm,
            "in_to_in_width" => self.in_to_in_width,
            "in_to_in_height" => self.in_to_in_height,
            _ => None,
        };
        let value = value
            .ok_or_else(|| GlazeError::missing_parameter(self.module_id.as_str(), field))?;
        if value <= 0.0 || !value.is_finite() {
            return Err(GlazeError::invalid_parameter(
                self.module_id.as_str(),
                field,
                value.to_string(),
                "must be positive",
            ));
        }
        Ok(value)
    }

    /// Fetch a required count parameter (must be >= 1).
    pub(crate) fn require_count(&self, field: &str) -> GlazeResult<u32> {
        let value = match field {
            "N" => self.panels,
            "N_v" => self.columns,
            "N_h" => self.rows,
            "O" => self.openable,
            _ => None,
        };
        let value = value
            .ok_or_else(|| GlazeError::missing_parameter(self.module_id.as_str(), field))?;
        if value == 0 {
            return Err(GlazeError::invalid_parameter(
                self.module_id.as_str(),
                field,
                value.to_string(),
                "must be at least 1",
            ));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        for id in ModuleId::ALL {
            assert_eq!(ModuleId::parse(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn test_parse_unknown_id() {
        let err = ModuleId::parse("M42_Skylight").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MODULE");
        assert!(err.to_string().contains("M42_Skylight"));
    }

    #[test]
    fn test_serde_uses_original_id_strings() {
        let json = serde_json::to_string(&ModuleId::CasementDCurve).unwrap();
        assert_eq!(json, "\"M1_Casement_DCurve\"");

        let id: ModuleId = serde_json::from_str("\"M9_Curtain_Wall_Grid\"").unwrap();
        assert_eq!(id, ModuleId::CurtainWallGrid);
    }

    #[test]
    fn test_cart_item_qty_defaults_to_one() {
        let item: CartItem =
            serde_json::from_str(r#"{ "module_id": "M5_Swing_Door", "W": 900, "H": 2100 }"#)
                .unwrap();
        assert_eq!(item.qty, 1);
        assert_eq!(item.width_mm, Some(900.0));
    }

    #[test]
    fn test_cart_item_json_field_names() {
        let item = CartItem::new(ModuleId::CasementDCurve)
            .with_size(1200.0, 1200.0)
            .with_panels(2)
            .with_openable(1);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"W\":1200"));
        assert!(json.contains("\"H\":1200"));
        assert!(json.contains("\"N\":2"));
        assert!(json.contains("\"O\":1"));
        // Unused parameters are omitted entirely
        assert!(!json.contains("N_v"));

        let roundtrip: CartItem = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, item);
    }

    #[test]
    fn test_require_dim_missing_and_negative() {
        let item = CartItem::new(ModuleId::CasementDCurve);
        let err = item.require_dim("W").unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PARAMETER");

        let item = CartItem::new(ModuleId::CasementDCurve).with_size(-100.0, 1200.0);
        let err = item.require_dim("W").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("'W'"));
    }

    #[test]
    fn test_require_count_zero() {
        let item = CartItem::new(ModuleId::Sliding2Track).with_panels(0);
        let err = item.require_count("N").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_specs_declare_params() {
        let spec = ModuleId::CurtainWallGrid.spec();
        let names: Vec<_> = spec.params.iter().map(|p| p.name).collect();
        assert!(names.contains(&"N_v"));
        assert!(names.contains(&"cell_width"));
        assert_eq!(spec.id, ModuleId::CurtainWallGrid);
    }
}

//! # Bill-of-Materials Expander
//!
//! Expands one cart item into raw material demand: linear profile pieces,
//! flat glass panes, rubber/gasket meters, and discrete accessory counts.
//! The per-module formulas live with the module catalog
//! ([`crate::modules`]); this module owns the demand types, the qty
//! multiplication, and the cross-cart merge.
//!
//! Demands are the engine's internal currency: the cutting optimizer
//! consumes `profile_demands`, the sheet nester `glass_demands`, and the
//! aggregator the rest.

use serde::{Deserialize, Serialize};

use crate::errors::{GlazeError, GlazeResult};
use crate::modules::{casement, curtain_wall, sliding, CartItem, ModuleId};

/// Demand for pieces of one profile cut to one length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDemand {
    pub profile_name: String,
    pub length_mm: f64,
    pub count: u32,
}

/// Demand for identical glass panes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassDemand {
    pub w_mm: f64,
    pub h_mm: f64,
    pub count: u32,
}

/// Demand for a rubber/gasket product in metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubberDemand {
    pub name: String,
    pub meters: f64,
}

/// Demand for a discrete accessory.
///
/// For paired goods (hinges, stays, rollers) `count` is the number of
/// pairs, matching how the catalog says they are bought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryDemand {
    pub name: String,
    pub count: u32,
}

/// Raw material demand for one or more cart items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDemand {
    pub profile_demands: Vec<ProfileDemand>,
    pub glass_demands: Vec<GlassDemand>,
    pub rubber_demands: Vec<RubberDemand>,
    pub accessory_demands: Vec<AccessoryDemand>,
}

impl RawDemand {
    pub fn new() -> Self {
        RawDemand::default()
    }

    /// Add profile pieces; lengths are snapped to whole millimetres, which
    /// is the saw's working resolution.
    pub fn push_profile(&mut self, profile_name: &str, length_mm: f64, count: u32) {
        if count == 0 {
            return;
        }
        self.profile_demands.push(ProfileDemand {
            profile_name: profile_name.to_string(),
            length_mm: length_mm.round(),
            count,
        });
    }

    pub fn push_glass(&mut self, w_mm: f64, h_mm: f64, count: u32) {
        if count == 0 {
            return;
        }
        self.glass_demands.push(GlassDemand {
            w_mm: w_mm.round(),
            h_mm: h_mm.round(),
            count,
        });
    }

    pub fn push_rubber(&mut self, name: &str, meters: f64) {
        if meters <= 0.0 {
            return;
        }
        self.rubber_demands.push(RubberDemand {
            name: name.to_string(),
            meters,
        });
    }

    pub fn push_accessory(&mut self, name: &str, count: u32) {
        if count == 0 {
            return;
        }
        self.accessory_demands.push(AccessoryDemand {
            name: name.to_string(),
            count,
        });
    }

    /// Multiply every demand by the cart line quantity.
    fn scale(&mut self, qty: u32) {
        if qty == 1 {
            return;
        }
        for d in &mut self.profile_demands {
            d.count *= qty;
        }
        for d in &mut self.glass_demands {
            d.count *= qty;
        }
        for d in &mut self.rubber_demands {
            d.meters *= qty as f64;
        }
        for d in &mut self.accessory_demands {
            d.count *= qty;
        }
    }

    /// Append another cart line's demand, preserving order.
    pub fn extend(&mut self, other: RawDemand) {
        self.profile_demands.extend(other.profile_demands);
        self.glass_demands.extend(other.glass_demands);
        self.rubber_demands.extend(other.rubber_demands);
        self.accessory_demands.extend(other.accessory_demands);
    }

    /// Total demanded glass panes.
    pub fn total_panes(&self) -> u32 {
        self.glass_demands.iter().map(|d| d.count).sum()
    }
}

/// Expand one cart item into raw demand for `qty` units.
///
/// Fails with `MissingParameter`/`InvalidParameter` when a parameter the
/// selected module requires is absent, non-positive, or inconsistent
/// (e.g. more openable panels than panels, a cell array of the wrong
/// length, dimensions too small to glaze).
pub fn expand(item: &CartItem) -> GlazeResult<RawDemand> {
    if item.qty == 0 {
        return Err(GlazeError::invalid_parameter(
            item.module_id.as_str(),
            "qty",
            "0",
            "must be at least 1",
        ));
    }

    let mut demand = match item.module_id {
        ModuleId::CasementDCurve | ModuleId::ProjectingTopHung | ModuleId::SwingDoor => {
            casement::expand(item)?
        }
        ModuleId::Sliding2Track | ModuleId::Sliding3Track => sliding::expand(item)?,
        ModuleId::CurtainWallGrid => curtain_wall::expand(item)?,
    };

    demand.scale(item.qty);
    Ok(demand)
}

/// Expand a whole cart, concatenating demands in cart order.
///
/// Packing always runs over the merged demand, never per cart item, so
/// two items sharing a profile feed a single cutting plan. The first
/// expansion error aborts the run.
pub fn expand_cart(cart: &[CartItem]) -> GlazeResult<RawDemand> {
    let mut merged = RawDemand::new();
    for item in cart {
        merged.extend(expand(item)?);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{CartItem, ModuleId};

    fn casement(qty: u32) -> CartItem {
        CartItem::new(ModuleId::CasementDCurve)
            .with_size(1200.0, 1200.0)
            .with_panels(2)
            .with_openable(1)
            .with_qty(qty)
    }

    #[test]
    fn test_qty_multiplies_every_demand() {
        let one = expand(&casement(1)).unwrap();
        let ten = expand(&casement(10)).unwrap();

        assert_eq!(one.profile_demands.len(), ten.profile_demands.len());
        for (a, b) in one.profile_demands.iter().zip(&ten.profile_demands) {
            assert_eq!(a.profile_name, b.profile_name);
            assert_eq!(a.length_mm, b.length_mm);
            assert_eq!(a.count * 10, b.count);
        }
        assert_eq!(one.total_panes() * 10, ten.total_panes());
        for (a, b) in one.rubber_demands.iter().zip(&ten.rubber_demands) {
            assert!((a.meters * 10.0 - b.meters).abs() < 1e-9);
        }
    }

    #[test]
    fn test_qty_zero_rejected() {
        let err = expand(&casement(0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert!(err.to_string().contains("qty"));
    }

    #[test]
    fn test_expand_cart_preserves_order() {
        let cart = vec![casement(1), casement(2)];
        let merged = expand_cart(&cart).unwrap();
        let single = expand(&casement(1)).unwrap();
        // First item's demands come first, unchanged
        assert_eq!(
            merged.profile_demands[..single.profile_demands.len()],
            single.profile_demands[..]
        );
    }

    #[test]
    fn test_expand_cart_fails_on_first_bad_item() {
        let cart = vec![casement(1), CartItem::new(ModuleId::SwingDoor)];
        let err = expand_cart(&cart).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
    }

    #[test]
    fn test_lengths_snapped_to_whole_mm() {
        let mut demand = RawDemand::new();
        demand.push_profile("Casement Frame", 1199.6, 2);
        assert_eq!(demand.profile_demands[0].length_mm, 1200.0);
    }
}

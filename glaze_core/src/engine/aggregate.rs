//! # Aggregation & Material List
//!
//! Sums rubber/gasket meters and accessory counts across the whole cart,
//! then assembles the purchasable material list: stock bars per profile,
//! glass sheets, rolls or meters of rubber, and accessory pairs/pieces
//! per the consumable catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::bom::{AccessoryDemand, RubberDemand};
use crate::engine::cutting::CuttingListItem;
use crate::engine::nesting::GlassListResult;
use crate::modules::catalog;

/// How a material list entry is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Full stock bars
    Profile,
    /// Paired hardware (hinges, stays, rollers)
    #[serde(rename = "Accessory_Pair")]
    AccessoryPair,
    /// Single-count hardware
    Piece,
    /// Full glass sheets
    Sheet,
    /// Full rolls of gasket/pile
    Roll,
    /// Cut-to-order goods, whole metres
    Meter,
}

/// One purchasable line of the material list. Derived output - never
/// hand-edited; counts are pre-summed per distinct item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialListItem {
    pub item: String,
    pub units: u32,
    pub kind: MaterialKind,
}

/// Summed gasket/pile demand for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubberTotal {
    pub name: String,
    pub total_meters: f64,
}

/// Summed accessory demand for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryTotal {
    pub name: String,
    pub qty: u32,
}

/// Sum rubber demand by name, alphabetical, metres rounded to 0.01.
pub fn aggregate_rubber(demands: &[RubberDemand]) -> Vec<RubberTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for d in demands {
        *totals.entry(d.name.as_str()).or_insert(0.0) += d.meters;
    }
    totals
        .into_iter()
        .map(|(name, meters)| RubberTotal {
            name: name.to_string(),
            total_meters: (meters * 100.0).round() / 100.0,
        })
        .collect()
}

/// Sum accessory demand by name, alphabetical.
pub fn aggregate_accessories(demands: &[AccessoryDemand]) -> Vec<AccessoryTotal> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for d in demands {
        *totals.entry(d.name.as_str()).or_insert(0) += d.count;
    }
    totals
        .into_iter()
        .map(|(name, qty)| AccessoryTotal {
            name: name.to_string(),
            qty,
        })
        .collect()
}

/// Assemble the purchasable material list from the packed plans and
/// aggregate totals.
pub fn material_list(
    cutting_lists: &[CuttingListItem],
    glass: &GlassListResult,
    rubber_totals: &[RubberTotal],
    accessory_totals: &[AccessoryTotal],
) -> Vec<MaterialListItem> {
    let mut list = Vec::new();

    for plan in cutting_lists {
        list.push(MaterialListItem {
            item: plan.profile_name.clone(),
            units: plan.bar_count(),
            kind: MaterialKind::Profile,
        });
    }

    if glass.total_sheets > 0 {
        list.push(MaterialListItem {
            item: format!("Glass Sheet {}", glass.sheet_type),
            units: glass.total_sheets,
            kind: MaterialKind::Sheet,
        });
    }

    for rubber in rubber_totals {
        let (units, kind) = match catalog::rubber_spec(&rubber.name).and_then(|s| s.roll_length_m) {
            Some(roll_m) => (
                (rubber.total_meters / roll_m).ceil() as u32,
                MaterialKind::Roll,
            ),
            None => (rubber.total_meters.ceil() as u32, MaterialKind::Meter),
        };
        list.push(MaterialListItem {
            item: rubber.name.clone(),
            units,
            kind,
        });
    }

    for accessory in accessory_totals {
        let pair = catalog::accessory_spec(&accessory.name)
            .map(|s| s.pair)
            .unwrap_or(false);
        list.push(MaterialListItem {
            item: if pair {
                format!("{} (Pair)", accessory.name)
            } else {
                accessory.name.clone()
            },
            units: accessory.qty,
            kind: if pair {
                MaterialKind::AccessoryPair
            } else {
                MaterialKind::Piece
            },
        });
    }

    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubber(name: &str, meters: f64) -> RubberDemand {
        RubberDemand {
            name: name.to_string(),
            meters,
        }
    }

    fn accessory(name: &str, count: u32) -> AccessoryDemand {
        AccessoryDemand {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_rubber_sums_by_name() {
        let totals = aggregate_rubber(&[
            rubber("Wool Pile", 9.52),
            rubber("EPDM Glazing Gasket", 6.624),
            rubber("Wool Pile", 4.48),
        ]);
        assert_eq!(totals.len(), 2);
        // Alphabetical
        assert_eq!(totals[0].name, "EPDM Glazing Gasket");
        assert_eq!(totals[0].total_meters, 6.62);
        assert_eq!(totals[1].name, "Wool Pile");
        assert_eq!(totals[1].total_meters, 14.0);
    }

    #[test]
    fn test_accessories_sum_by_name() {
        let totals = aggregate_accessories(&[
            accessory("Friction Stay", 2),
            accessory("Casement Handle", 2),
            accessory("Friction Stay", 3),
        ]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "Casement Handle");
        assert_eq!(totals[1].name, "Friction Stay");
        assert_eq!(totals[1].qty, 5);
    }

    #[test]
    fn test_material_list_kinds_and_rounding() {
        let glass = GlassListResult {
            sheet_type: "2440 x 1830 mm".to_string(),
            total_sheets: 3,
            cuts: vec![],
            sheets: vec![],
        };
        let rubber_totals = vec![
            RubberTotal {
                name: "EPDM Glazing Gasket".to_string(),
                total_meters: 51.0,
            },
            RubberTotal {
                name: "Structural EPDM Gasket".to_string(),
                total_meters: 18.2,
            },
        ];
        let accessory_totals = vec![
            AccessoryTotal {
                name: "Door Hinge".to_string(),
                qty: 4,
            },
            AccessoryTotal {
                name: "Door Lock".to_string(),
                qty: 2,
            },
        ];

        let list = material_list(&[], &glass, &rubber_totals, &accessory_totals);

        let sheet = list.iter().find(|i| i.kind == MaterialKind::Sheet).unwrap();
        assert_eq!(sheet.units, 3);
        assert!(sheet.item.contains("2440 x 1830"));

        // 51m of 50m rolls -> 2 rolls
        let gasket = list.iter().find(|i| i.item == "EPDM Glazing Gasket").unwrap();
        assert_eq!((gasket.units, gasket.kind), (2, MaterialKind::Roll));

        // Cut-to-order gasket -> whole metres, rounded up
        let structural = list
            .iter()
            .find(|i| i.item == "Structural EPDM Gasket")
            .unwrap();
        assert_eq!((structural.units, structural.kind), (19, MaterialKind::Meter));

        let hinge = list.iter().find(|i| i.item == "Door Hinge (Pair)").unwrap();
        assert_eq!((hinge.units, hinge.kind), (4, MaterialKind::AccessoryPair));

        let lock = list.iter().find(|i| i.item == "Door Lock").unwrap();
        assert_eq!((lock.units, lock.kind), (2, MaterialKind::Piece));
    }

    #[test]
    fn test_accessory_pair_serde_tag() {
        let json = serde_json::to_string(&MaterialKind::AccessoryPair).unwrap();
        assert_eq!(json, "\"Accessory_Pair\"");
    }

    #[test]
    fn test_empty_glass_omitted() {
        let glass = GlassListResult {
            sheet_type: "2440 x 1830 mm".to_string(),
            total_sheets: 0,
            cuts: vec![],
            sheets: vec![],
        };
        let list = material_list(&[], &glass, &[], &[]);
        assert!(list.is_empty());
    }
}

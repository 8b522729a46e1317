//! # Consumable Catalog
//!
//! Supply metadata for rubber/gasket goods and discrete accessories: how
//! each item is bought, so the material list can show whole rolls and
//! pairs instead of raw meters and piece counts.
//!
//! The tables are keyed by the exact demand names the module formulas
//! emit. An item missing from the table falls back to per-meter /
//! per-piece counting in the aggregator.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// How a rubber/gasket product is supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubberSpec {
    /// Roll length in metres; `None` means sold per meter
    pub roll_length_m: Option<f64>,
}

/// How a discrete accessory is supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessorySpec {
    /// Counted and sold in pairs (hinges, stays, rollers)
    pub pair: bool,
}

static RUBBER: Lazy<BTreeMap<&'static str, RubberSpec>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "EPDM Glazing Gasket",
            RubberSpec {
                roll_length_m: Some(50.0),
            },
        ),
        (
            "Flipper Gasket",
            RubberSpec {
                roll_length_m: Some(50.0),
            },
        ),
        (
            "Wool Pile",
            RubberSpec {
                roll_length_m: Some(100.0),
            },
        ),
        // Structural gasket is cut to order at the supplier
        ("Structural EPDM Gasket", RubberSpec { roll_length_m: None }),
    ])
});

static ACCESSORIES: Lazy<BTreeMap<&'static str, AccessorySpec>> = Lazy::new(|| {
    BTreeMap::from([
        ("Friction Stay", AccessorySpec { pair: true }),
        ("Casement Handle", AccessorySpec { pair: false }),
        ("Corner Cleat", AccessorySpec { pair: false }),
        ("Sliding Roller", AccessorySpec { pair: true }),
        ("Sliding Lock", AccessorySpec { pair: false }),
        ("Anti-Lift Block", AccessorySpec { pair: false }),
        ("Door Hinge", AccessorySpec { pair: true }),
        ("Door Lock", AccessorySpec { pair: false }),
        ("Door Handle", AccessorySpec { pair: false }),
        ("Setting Block", AccessorySpec { pair: false }),
        ("Mullion Anchor", AccessorySpec { pair: false }),
    ])
});

/// Look up supply metadata for a rubber/gasket demand name.
pub fn rubber_spec(name: &str) -> Option<RubberSpec> {
    RUBBER.get(name).copied()
}

/// Look up supply metadata for an accessory demand name.
pub fn accessory_spec(name: &str) -> Option<AccessorySpec> {
    ACCESSORIES.get(name).copied()
}

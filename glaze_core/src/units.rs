//! # Unit Types
//!
//! Type-safe wrappers for shop-floor units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64
//! wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - Glazing work uses a small, consistent set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Metric Units (Primary)
//!
//! All dimensions are metric, matching aluminium profile and float glass
//! supply:
//! - Length: millimetres (mm) for dimensions and cuts, metres (m) for
//!   gaskets and other roll goods
//! - Area: square metres (m²) for glass pricing
//!
//! ## Example
//!
//! ```rust
//! use glaze_core::units::{Millimeters, Meters};
//!
//! let frame = Millimeters(2400.0);
//! let gasket: Meters = frame.into();
//! assert_eq!(gasket.0, 2.4);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl Millimeters {
    /// Area of a w x h rectangle in square metres
    pub fn area_with(self, other: Millimeters) -> SquareMeters {
        SquareMeters(self.0 * other.0 / 1_000_000.0)
    }
}

impl Add for Millimeters {
    type Output = Millimeters;
    fn add(self, rhs: Millimeters) -> Millimeters {
        Millimeters(self.0 + rhs.0)
    }
}

impl Sub for Millimeters {
    type Output = Millimeters;
    fn sub(self, rhs: Millimeters) -> Millimeters {
        Millimeters(self.0 - rhs.0)
    }
}

impl Mul<f64> for Millimeters {
    type Output = Millimeters;
    fn mul(self, rhs: f64) -> Millimeters {
        Millimeters(self.0 * rhs)
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Millimeters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}mm", self.0)
    }
}

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}m", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let mm = Millimeters(5580.0);
        let m: Meters = mm.into();
        assert_eq!(m.0, 5.58);

        let back: Millimeters = m.into();
        assert_eq!(back.0, 5580.0);
    }

    #[test]
    fn test_area() {
        let area = Millimeters(1200.0).area_with(Millimeters(1500.0));
        assert!((area.0 - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let perimeter = (Millimeters(1200.0) + Millimeters(900.0)) * 2.0;
        assert_eq!(perimeter.0, 4200.0);
        assert_eq!((Millimeters(6000.0) - Millimeters(5.0)).0, 5995.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Millimeters(6000.0).to_string(), "6000mm");
        assert_eq!(Meters(2.345).to_string(), "2.35m");
    }
}

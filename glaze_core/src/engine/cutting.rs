//! # 1-D Cutting-Stock Optimizer
//!
//! Packs required profile piece lengths onto fixed-length stock bars,
//! charging one blade kerf per additional cut on a bar. The default
//! policy follows first-fit-decreasing intent: sort pieces descending
//! (stable, so equal lengths keep demand order), then fill one bar at a
//! time with the largest remaining piece that still fits; smaller pieces
//! drop into the bar's remainder before it is ever closed. A bar closes
//! only when no remaining piece fits; its remainder is labelled a usable
//! off-cut when it clears the waste threshold, waste otherwise.
//!
//! The whole computation is deterministic: bars are emitted in open
//! order, cuts in packing order, no randomness anywhere.

use serde::{Deserialize, Serialize};

use crate::engine::{CalculationSettings, PackingPolicy};
use crate::engine::bom::ProfileDemand;
use crate::errors::{GlazeError, GlazeResult};

/// Tolerance for length comparisons; demands are whole millimetres, so
/// anything below a hundredth of a millimetre is float noise.
const LENGTH_EPS_MM: f64 = 0.01;

/// One stock bar with its assigned cuts, in packing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarAssignment {
    /// 1-based bar number, in the order bars were opened
    pub bar_no: u32,
    /// Cut lengths in packing order (mm)
    pub cuts_mm: Vec<f64>,
    /// Trailing remainder after the last cut and kerf (mm)
    pub offcut_mm: f64,
    /// Whether the remainder clears the waste threshold
    pub offcut_usable: bool,
}

impl BarAssignment {
    /// Slot label for the bar ("bar_1", "bar_2", ...)
    pub fn slot_label(&self) -> String {
        format!("bar_{}", self.bar_no)
    }

    /// Label for the trailing remainder ("offcut_1185mm" or "waste_95mm")
    pub fn offcut_label(&self) -> String {
        if self.offcut_usable {
            format!("offcut_{:.0}mm", self.offcut_mm)
        } else {
            format!("waste_{:.0}mm", self.offcut_mm)
        }
    }

    /// Ordered cut labels followed by the off-cut label, the way the
    /// cutting screen and exports print a bar.
    pub fn cut_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.cuts_mm.iter().map(|c| format!("{c:.0}mm")).collect();
        labels.push(self.offcut_label());
        labels
    }

    /// Kerf material consumed on this bar (one kerf per additional cut)
    pub fn kerf_overhead_mm(&self, blade_kerf_mm: f64) -> f64 {
        blade_kerf_mm * (self.cuts_mm.len().saturating_sub(1)) as f64
    }
}

/// Cutting plan for one profile type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingListItem {
    pub profile_name: String,
    pub stock_length_mm: f64,
    /// Bars in the order they were opened
    pub bars: Vec<BarAssignment>,
}

impl CuttingListItem {
    /// Number of stock bars the plan consumes
    pub fn bar_count(&self) -> u32 {
        self.bars.len() as u32
    }

    /// Total usable off-cut length across all bars (mm)
    pub fn usable_offcut_mm(&self) -> f64 {
        self.bars
            .iter()
            .filter(|b| b.offcut_usable)
            .map(|b| b.offcut_mm)
            .sum()
    }
}

/// Plan cutting for every profile in the merged demand.
///
/// Demands are grouped by profile name in first-appearance (cart) order;
/// packing always runs over the merged group, never per cart item. All
/// piece lengths are validated against the stock length before any
/// packing starts.
pub fn plan_all(
    profile_demands: &[ProfileDemand],
    settings: &CalculationSettings,
) -> GlazeResult<Vec<CuttingListItem>> {
    // Fail fast on any oversized piece across all profiles
    for d in profile_demands {
        if d.length_mm > settings.stock_length_mm + LENGTH_EPS_MM {
            return Err(GlazeError::piece_too_long(
                &d.profile_name,
                d.length_mm,
                settings.stock_length_mm,
            ));
        }
    }

    let mut order: Vec<&str> = Vec::new();
    for d in profile_demands {
        if !order.contains(&d.profile_name.as_str()) {
            order.push(&d.profile_name);
        }
    }

    let mut plans = Vec::with_capacity(order.len());
    for name in order {
        let pieces: Vec<f64> = profile_demands
            .iter()
            .filter(|d| d.profile_name == name)
            .flat_map(|d| std::iter::repeat(d.length_mm).take(d.count as usize))
            .collect();
        plans.push(plan(name, &pieces, settings)?);
    }
    Ok(plans)
}

/// Plan cutting for a single profile from its piece lengths in demand
/// order.
pub fn plan(
    profile_name: &str,
    piece_lengths_mm: &[f64],
    settings: &CalculationSettings,
) -> GlazeResult<CuttingListItem> {
    for &length in piece_lengths_mm {
        if length > settings.stock_length_mm + LENGTH_EPS_MM {
            return Err(GlazeError::piece_too_long(
                profile_name,
                length,
                settings.stock_length_mm,
            ));
        }
    }

    // Stable sort keeps demand order among equal lengths
    let mut pending: Vec<f64> = piece_lengths_mm.to_vec();
    pending.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let bars = match settings.packing_policy {
        PackingPolicy::FirstFitDecreasing => pack_first_fit(&mut pending, settings),
        PackingPolicy::BestFitDecreasing => pack_best_fit(&pending, settings),
    };

    Ok(CuttingListItem {
        profile_name: profile_name.to_string(),
        stock_length_mm: settings.stock_length_mm,
        bars,
    })
}

/// Fill one bar at a time with the largest remaining piece that fits.
fn pack_first_fit(pending: &mut Vec<f64>, settings: &CalculationSettings) -> Vec<BarAssignment> {
    let mut bars = Vec::new();

    while !pending.is_empty() {
        let mut remaining = settings.stock_length_mm;
        let mut cuts: Vec<f64> = Vec::new();

        loop {
            let needed = |piece: f64| {
                if cuts.is_empty() {
                    piece
                } else {
                    piece + settings.blade_kerf_mm
                }
            };
            // pending is sorted descending, so the first fit is the
            // largest fitting piece
            let next = pending
                .iter()
                .position(|&p| needed(p) <= remaining + LENGTH_EPS_MM);
            match next {
                Some(idx) => {
                    let piece = pending.remove(idx);
                    remaining -= needed(piece);
                    cuts.push(piece);
                }
                None => break,
            }
        }

        bars.push(close_bar(bars.len() as u32 + 1, cuts, remaining, settings));
    }

    bars
}

/// Place each piece (largest first) into the open bar that leaves the
/// least room, opening a new bar when none fits.
fn pack_best_fit(pending: &[f64], settings: &CalculationSettings) -> Vec<BarAssignment> {
    struct OpenBar {
        remaining: f64,
        cuts: Vec<f64>,
    }

    let mut open: Vec<OpenBar> = Vec::new();
    for &piece in pending {
        let mut best: Option<(usize, f64)> = None;
        for (idx, bar) in open.iter().enumerate() {
            let needed = if bar.cuts.is_empty() {
                piece
            } else {
                piece + settings.blade_kerf_mm
            };
            let leftover = bar.remaining - needed;
            if leftover >= -LENGTH_EPS_MM {
                let better = match best {
                    Some((_, best_leftover)) => leftover < best_leftover,
                    None => true,
                };
                if better {
                    best = Some((idx, leftover));
                }
            }
        }
        match best {
            Some((idx, _)) => {
                let bar = &mut open[idx];
                let needed = if bar.cuts.is_empty() {
                    piece
                } else {
                    piece + settings.blade_kerf_mm
                };
                bar.remaining -= needed;
                bar.cuts.push(piece);
            }
            None => open.push(OpenBar {
                remaining: settings.stock_length_mm - piece,
                cuts: vec![piece],
            }),
        }
    }

    open.into_iter()
        .enumerate()
        .map(|(i, bar)| close_bar(i as u32 + 1, bar.cuts, bar.remaining, settings))
        .collect()
}

fn close_bar(
    bar_no: u32,
    cuts: Vec<f64>,
    remaining: f64,
    settings: &CalculationSettings,
) -> BarAssignment {
    let offcut = if remaining < LENGTH_EPS_MM { 0.0 } else { remaining };
    BarAssignment {
        bar_no,
        cuts_mm: cuts,
        offcut_mm: offcut,
        offcut_usable: offcut >= settings.waste_threshold_mm,
    }
}

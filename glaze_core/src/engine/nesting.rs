//! # 2-D Sheet-Nesting Optimizer
//!
//! Assigns demanded glass panes to fixed-size stock sheets using a
//! deterministic shelf heuristic: panes are sorted by height then width
//! descending and placed left-to-right along the current shelf; a new
//! shelf opens below when the sheet width is exhausted, a new sheet when
//! no shelf fits. Glass is scored, not sawn, so no kerf is charged
//! between panes.
//!
//! Panes are never rotated unless the settings permit it; with rotation
//! off a pane that only fits the sheet sideways is an input error, never
//! a silent rotation.

use serde::{Deserialize, Serialize};

use crate::engine::bom::GlassDemand;
use crate::engine::CalculationSettings;
use crate::errors::{GlazeError, GlazeResult};
use crate::units::{Millimeters, SquareMeters};

/// Demanded quantity of one distinct pane size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassCut {
    pub h: f64,
    pub w: f64,
    pub qty: u32,
}

/// One pane placed on a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanePlacement {
    pub w_mm: f64,
    pub h_mm: f64,
    /// Left edge offset from the sheet origin (mm)
    pub x_mm: f64,
    /// Top edge offset from the sheet origin (mm)
    pub y_mm: f64,
    pub rotated: bool,
}

/// All panes assigned to one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetAssignment {
    /// 1-based sheet number, in the order sheets were opened
    pub sheet_no: u32,
    pub panes: Vec<PanePlacement>,
}

/// Sheet requirement for the whole calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassListResult {
    /// Stock sheet dimension string, e.g. "2440 x 1830 mm"
    pub sheet_type: String,
    /// Number of sheets the packing opened
    pub total_sheets: u32,
    /// Distinct pane sizes with summed quantities
    pub cuts: Vec<GlassCut>,
    /// Which panes land on which sheet, for the cutting screen
    pub sheets: Vec<SheetAssignment>,
}

impl GlassListResult {
    /// Total demanded pane count across all sizes
    pub fn total_panes(&self) -> u32 {
        self.cuts.iter().map(|c| c.qty).sum()
    }

    /// Total demanded glass area, the basis glass is priced on
    pub fn total_area_m2(&self) -> SquareMeters {
        SquareMeters(
            self.cuts
                .iter()
                .map(|c| Millimeters(c.w).area_with(Millimeters(c.h)).0 * c.qty as f64)
                .sum(),
        )
    }
}

/// Nest all demanded panes onto stock sheets.
///
/// Every pane is validated against the sheet before packing starts:
/// a pane that fits in no permitted orientation fails with
/// `PaneTooLarge`.
pub fn nest(
    glass_demands: &[GlassDemand],
    settings: &CalculationSettings,
) -> GlazeResult<GlassListResult> {
    let sheet_w = settings.sheet_width_mm;
    let sheet_h = settings.sheet_height_mm;
    let sheet_type = format!("{sheet_w:.0} x {sheet_h:.0} mm");

    // Group distinct sizes, summing quantities
    let mut grouped: Vec<GlassCut> = Vec::new();
    for d in glass_demands {
        match grouped
            .iter_mut()
            .find(|c| c.w == d.w_mm && c.h == d.h_mm)
        {
            Some(cut) => cut.qty += d.count,
            None => grouped.push(GlassCut {
                h: d.h_mm,
                w: d.w_mm,
                qty: d.count,
            }),
        }
    }
    // Tallest (then widest) first; also the packing order
    grouped.sort_by(|a, b| {
        b.h.partial_cmp(&a.h)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.w.partial_cmp(&a.w).unwrap_or(std::cmp::Ordering::Equal))
    });

    // Fail fast before any sheet is opened
    for cut in &grouped {
        if !fits_sheet(cut.w, cut.h, sheet_w, sheet_h)
            && !(settings.allow_pane_rotation && fits_sheet(cut.h, cut.w, sheet_w, sheet_h))
        {
            return Err(GlazeError::pane_too_large(cut.w, cut.h, sheet_w, sheet_h));
        }
    }

    if grouped.is_empty() {
        return Ok(GlassListResult {
            sheet_type,
            total_sheets: 0,
            cuts: grouped,
            sheets: Vec::new(),
        });
    }

    let mut packer = ShelfPacker::new(sheet_w, sheet_h, settings.allow_pane_rotation);
    for cut in &grouped {
        for _ in 0..cut.qty {
            packer.place(cut.w, cut.h);
        }
    }

    let sheets = packer.finish();
    Ok(GlassListResult {
        sheet_type,
        total_sheets: sheets.len() as u32,
        cuts: grouped,
        sheets,
    })
}

fn fits_sheet(w: f64, h: f64, sheet_w: f64, sheet_h: f64) -> bool {
    w <= sheet_w && h <= sheet_h
}

struct ShelfPacker {
    sheet_w: f64,
    sheet_h: f64,
    allow_rotation: bool,
    sheets: Vec<SheetAssignment>,
    /// Horizontal cursor on the current shelf
    cursor_x: f64,
    /// Top of the current shelf
    shelf_y: f64,
    /// Height of the current shelf (its first pane)
    shelf_h: f64,
}

impl ShelfPacker {
    fn new(sheet_w: f64, sheet_h: f64, allow_rotation: bool) -> Self {
        ShelfPacker {
            sheet_w,
            sheet_h,
            allow_rotation,
            sheets: Vec::new(),
            cursor_x: 0.0,
            shelf_y: 0.0,
            shelf_h: 0.0,
        }
    }

    /// Place one pane, already validated to fit the sheet in some
    /// permitted orientation.
    fn place(&mut self, w: f64, h: f64) {
        // Orientation attempts in deterministic order: as demanded on the
        // current shelf, rotated on the current shelf, then the same pair
        // on a fresh shelf, then a fresh sheet.
        if self.try_put(w, h, false) {
            return;
        }
        if self.allow_rotation && self.try_put(h, w, true) {
            return;
        }

        self.open_shelf();
        if self.try_put(w, h, false) {
            return;
        }
        if self.allow_rotation && self.try_put(h, w, true) {
            return;
        }

        self.open_sheet();
        if self.try_put(w, h, false) {
            return;
        }
        // Validated up front, so the rotated orientation must fit
        let _placed = self.try_put(h, w, true);
        debug_assert!(_placed, "pane {w}x{h} fits no orientation after validation");
    }

    fn try_put(&mut self, w: f64, h: f64, rotated: bool) -> bool {
        if self.sheets.is_empty() {
            return false;
        }
        if self.cursor_x + w > self.sheet_w || self.shelf_y + h > self.sheet_h {
            return false;
        }
        // Shelf height is fixed by its first pane
        if self.shelf_h > 0.0 && h > self.shelf_h {
            return false;
        }

        let sheet = self.sheets.last_mut().expect("open sheet");
        sheet.panes.push(PanePlacement {
            w_mm: w,
            h_mm: h,
            x_mm: self.cursor_x,
            y_mm: self.shelf_y,
            rotated,
        });
        self.cursor_x += w;
        if self.shelf_h == 0.0 {
            self.shelf_h = h;
        }
        true
    }

    fn open_shelf(&mut self) {
        if self.sheets.is_empty() {
            return;
        }
        self.shelf_y += self.shelf_h;
        self.cursor_x = 0.0;
        self.shelf_h = 0.0;
    }

    fn open_sheet(&mut self) {
        self.sheets.push(SheetAssignment {
            sheet_no: self.sheets.len() as u32 + 1,
            panes: Vec::new(),
        });
        self.cursor_x = 0.0;
        self.shelf_y = 0.0;
        self.shelf_h = 0.0;
    }

    fn finish(self) -> Vec<SheetAssignment> {
        self.sheets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CalculationSettings;

    fn settings() -> CalculationSettings {
        CalculationSettings::default()
    }

    fn demand(w: f64, h: f64, count: u32) -> GlassDemand {
        GlassDemand {
            w_mm: w,
            h_mm: h,
            count,
        }
    }

    /// Validates placements: inside the sheet, no overlaps, counts match.
    fn assert_nesting_valid(result: &GlassListResult, sheet_w: f64, sheet_h: f64) {
        let placed: usize = result.sheets.iter().map(|s| s.panes.len()).sum();
        assert_eq!(placed as u32, result.total_panes());
        assert_eq!(result.total_sheets as usize, result.sheets.len());

        for sheet in &result.sheets {
            for p in &sheet.panes {
                assert!(p.x_mm + p.w_mm <= sheet_w + 0.01);
                assert!(p.y_mm + p.h_mm <= sheet_h + 0.01);
            }
            for i in 0..sheet.panes.len() {
                for j in (i + 1)..sheet.panes.len() {
                    let a = &sheet.panes[i];
                    let b = &sheet.panes[j];
                    let overlaps = a.x_mm < b.x_mm + b.w_mm
                        && b.x_mm < a.x_mm + a.w_mm
                        && a.y_mm < b.y_mm + b.h_mm
                        && b.y_mm < a.y_mm + a.h_mm;
                    assert!(!overlaps, "sheet {}: pane {i} overlaps pane {j}", sheet.sheet_no);
                }
            }
        }
    }

    #[test]
    fn test_groups_distinct_sizes() {
        let result = nest(
            &[demand(600.0, 400.0, 2), demand(600.0, 400.0, 3), demand(500.0, 400.0, 1)],
            &settings(),
        )
        .unwrap();
        assert_eq!(result.cuts.len(), 2);
        assert_eq!(result.total_panes(), 6);
        assert!(result.cuts.iter().any(|c| c.w == 600.0 && c.qty == 5));
        assert_nesting_valid(&result, 2440.0, 1830.0);
    }

    #[test]
    fn test_full_sheet_pane() {
        let result = nest(&[demand(2440.0, 1830.0, 2)], &settings()).unwrap();
        assert_eq!(result.total_sheets, 2);
        assert_nesting_valid(&result, 2440.0, 1830.0);
    }

    #[test]
    fn test_pane_too_large() {
        let err = nest(&[demand(2500.0, 1900.0, 1)], &settings()).unwrap_err();
        assert_eq!(err.error_code(), "PANE_TOO_LARGE");
    }

    #[test]
    fn test_no_silent_rotation() {
        // Fits only sideways; rotation is off by default
        let err = nest(&[demand(1000.0, 2000.0, 1)], &settings()).unwrap_err();
        assert_eq!(err.error_code(), "PANE_TOO_LARGE");
    }

    #[test]
    fn test_rotation_when_permitted() {
        let mut s = settings();
        s.allow_pane_rotation = true;
        let result = nest(&[demand(1000.0, 2000.0, 1)], &s).unwrap();
        assert_eq!(result.total_sheets, 1);
        assert!(result.sheets[0].panes[0].rotated);
        assert_nesting_valid(&result, 2440.0, 1830.0);
    }

    #[test]
    fn test_shelf_packing_counts() {
        // 1154-high panes, 554 wide: four per shelf, one shelf per sheet
        let result = nest(&[demand(554.0, 1154.0, 10)], &settings()).unwrap();
        assert_eq!(result.total_sheets, 3);
        assert_eq!(result.sheets[0].panes.len(), 4);
        assert_eq!(result.sheets[2].panes.len(), 2);
        assert_nesting_valid(&result, 2440.0, 1830.0);
    }

    #[test]
    fn test_second_shelf_opens_when_height_allows() {
        // 800-high panes: two shelves of four fit one sheet
        let result = nest(&[demand(600.0, 800.0, 8)], &settings()).unwrap();
        assert_eq!(result.total_sheets, 1);
        assert_eq!(result.sheets[0].panes.len(), 8);
        assert_nesting_valid(&result, 2440.0, 1830.0);
    }

    #[test]
    fn test_total_area() {
        let result = nest(&[demand(1000.0, 500.0, 4)], &settings()).unwrap();
        assert!((result.total_area_m2().0 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_demand() {
        let result = nest(&[], &settings()).unwrap();
        assert_eq!(result.total_sheets, 0);
        assert!(result.cuts.is_empty());
        assert!(result.sheets.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let demands = vec![
            demand(554.0, 1154.0, 5),
            demand(502.0, 1102.0, 5),
            demand(845.0, 1375.0, 4),
        ];
        let a = nest(&demands, &settings()).unwrap();
        let b = nest(&demands, &settings()).unwrap();
        assert_eq!(a, b);
    }
}

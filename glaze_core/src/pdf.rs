//! # PDF Generation Module
//!
//! Generates the estimate report - material list, cutting plans, glass
//! summary, and the priced quote - from a calculation result using Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected via string formatting before compilation
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! Fonts come from the bundled `typst-assets` set; the report does not
//! ship its own font files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use glaze_core::pdf::render_estimate_pdf;
//! use glaze_core::project::Project;
//! use glaze_core::quote::build_quote;
//! use glaze_core::modules::{CartItem, ModuleId};
//!
//! let mut project = Project::new("Jane Estimator", "25-042", "Acme Towers");
//! project.add_item(CartItem::new(ModuleId::SwingDoor).with_size(900.0, 2100.0));
//!
//! let result = project.calculate().unwrap();
//! let quote = build_quote(&result);
//! let pdf_bytes = render_estimate_pdf(&project, &result, &quote).unwrap();
//! std::fs::write("estimate.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::engine::CalculationResult;
use crate::errors::{GlazeError, GlazeResult};
use crate::project::Project;
use crate::quote::{format_naira, quote_total, QuoteLineItem};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the estimate report
const ESTIMATE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Glazier Estimate]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Material Estimate & Quote]
    #v(4pt)
    #text(size: 13pt)[{{CLIENT}}]
  ]
]

#v(10pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information* \
    Job: {{JOB_ID}} \
    Client: {{CLIENT}} \
    Estimator: {{ESTIMATOR}}
  ],
  [
    *Stock Settings* \
    Profile bar: {{STOCK_LENGTH}} mm \
    Blade kerf: {{KERF}} mm \
    Glass sheet: {{SHEET_TYPE}}
  ],
)

#v(10pt)
= Material List

#table(
  columns: (1fr, auto, auto),
  align: (left, right, left),
  table.header([*Item*], [*Units*], [*Counted As*]),
{{MATERIAL_ROWS}}
)

= Cutting Plans

{{CUTTING_SECTIONS}}

= Glass

Sheet type: {{SHEET_TYPE}}, sheets required: *{{TOTAL_SHEETS}}*

#table(
  columns: (auto, auto, auto),
  align: (right, right, right),
  table.header([*Width (mm)*], [*Height (mm)*], [*Qty*]),
{{GLASS_ROWS}}
)

= Quote

#table(
  columns: (1fr, auto, auto, auto),
  align: (left, right, right, right),
  table.header([*Description*], [*Qty*], [*Unit Price*], [*Total*]),
{{QUOTE_ROWS}}
)

#align(right)[
  #text(size: 12pt, weight: "bold")[Grand Total: {{GRAND_TOTAL}}]
]
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render the full estimate report to PDF bytes.
pub fn render_estimate_pdf(
    project: &Project,
    result: &CalculationResult,
    quote: &[QuoteLineItem],
) -> GlazeResult<Vec<u8>> {
    let settings = &project.settings.calculation;

    let source = ESTIMATE_TEMPLATE
        .replace("{{JOB_ID}}", &escape_typst(&project.meta.job_id))
        .replace("{{CLIENT}}", &escape_typst(&project.meta.client))
        .replace("{{ESTIMATOR}}", &escape_typst(&project.meta.estimator))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{STOCK_LENGTH}}", &format!("{:.0}", settings.stock_length_mm))
        .replace("{{KERF}}", &format!("{:.0}", settings.blade_kerf_mm))
        .replace("{{SHEET_TYPE}}", &escape_typst(&result.glass.sheet_type))
        .replace("{{TOTAL_SHEETS}}", &result.glass.total_sheets.to_string())
        .replace("{{MATERIAL_ROWS}}", &build_material_rows(result))
        .replace("{{CUTTING_SECTIONS}}", &build_cutting_sections(result))
        .replace("{{GLASS_ROWS}}", &build_glass_rows(result))
        .replace("{{QUOTE_ROWS}}", &build_quote_rows(quote))
        .replace("{{GRAND_TOTAL}}", &format_naira(quote_total(quote)));

    compile_pdf(source)
}

fn compile_pdf(source: String) -> GlazeResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        GlazeError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        GlazeError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    Ok(pdf_bytes)
}

/// Escape characters with meaning in Typst markup.
fn escape_typst(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('#', "\\#")
        .replace('$', "\\$")
        .replace('*', "\\*")
        .replace('_', "\\_")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

fn build_material_rows(result: &CalculationResult) -> String {
    let mut rows = String::new();
    for item in &result.material_list {
        let kind = match item.kind {
            crate::engine::MaterialKind::Profile => "Profile",
            crate::engine::MaterialKind::AccessoryPair => "Pair",
            crate::engine::MaterialKind::Piece => "Piece",
            crate::engine::MaterialKind::Sheet => "Sheet",
            crate::engine::MaterialKind::Roll => "Roll",
            crate::engine::MaterialKind::Meter => "Meter",
        };
        rows.push_str(&format!(
            "  [{}], [{}], [{}],\n",
            escape_typst(&item.item),
            item.units,
            kind
        ));
    }
    rows
}

fn build_cutting_sections(result: &CalculationResult) -> String {
    let mut sections = String::new();
    for plan in &result.cutting_lists {
        sections.push_str(&format!(
            "== {} ({:.0} mm bars x {})\n\n#table(\n  columns: (auto, 1fr),\n  align: (left, left),\n  table.header([*Bar*], [*Cuts*]),\n",
            escape_typst(&plan.profile_name),
            plan.stock_length_mm,
            plan.bar_count()
        ));
        for bar in &plan.bars {
            sections.push_str(&format!(
                "  [{}], [{}],\n",
                bar.slot_label(),
                escape_typst(&bar.cut_labels().join(", "))
            ));
        }
        sections.push_str(")\n\n");
    }
    sections
}

fn build_glass_rows(result: &CalculationResult) -> String {
    let mut rows = String::new();
    for cut in &result.glass.cuts {
        rows.push_str(&format!("  [{:.0}], [{:.0}], [{}],\n", cut.w, cut.h, cut.qty));
    }
    rows
}

fn build_quote_rows(quote: &[QuoteLineItem]) -> String {
    let mut rows = String::new();
    for line in quote {
        rows.push_str(&format!(
            "  [{}], [{}], [{}], [{}],\n",
            escape_typst(&line.description),
            line.qty,
            escape_typst(&format_naira(line.unit_price)),
            escape_typst(&format_naira(line.line_total)),
        ));
    }
    rows
}

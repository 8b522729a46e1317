//! # glaze_core - Glazing Estimation Engine
//!
//! `glaze_core` is the computational heart of Glazier: it turns a
//! project's glazing dimensions into material lists, profile cutting
//! plans, glass sheet requirements, and price quotes. All inputs and
//! outputs are JSON-serializable, making it straightforward to drive
//! from any front end or script.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: a calculation is a pure function from a cart and
//!   explicit settings to an immutable result - no ambient state
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Deterministic**: identical inputs always produce identical output
//!
//! ## Quick Start
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
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`modules`] - the module parameter catalog and per-family BOM formulas
//! - [`engine`] - demand expansion, cutting-stock packing, sheet nesting, aggregation
//! - [`quote`] - quote line conversion and naira formatting
//! - [`project`] - project container, metadata, and settings
//! - [`file_io`] - file operations with atomic saves and locking
//! - [`pdf`] - estimate report rendering
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod engine;
pub mod errors;
pub mod file_io;
pub mod modules;
pub mod pdf;
pub mod project;
pub mod quote;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use engine::{calculate, CalculationResult, CalculationSettings};
pub use errors::{GlazeError, GlazeResult};
pub use file_io::{load_project, save_project, FileLock};
pub use modules::{CartItem, ModuleId};
pub use project::{GlobalSettings, Project, ProjectMetadata};

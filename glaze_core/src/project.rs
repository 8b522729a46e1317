//! # Project Data Structures
//!
//! The `Project` struct is the root container for a job's glazing
//! requirements. Projects serialize to `.glz` files as human-readable
//! JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, estimator, job info, timestamps)
//! ├── settings: GlobalSettings (default calculation settings, currency)
//! └── cart: Vec<CartLine> (ordered glazing requirements)
//! ```
//!
//! Cart order is project state: the engine's output is deterministic in
//! it, so lines live in a vector with UUID handles rather than a keyed
//! map.
//!
//! ## Example
//!
//! ```rust
//! use glaze_core::project::Project;
//! use glaze_core::modules::{CartItem, ModuleId};
//!
//! let mut project = Project::new("Jane Estimator", "25-042", "Acme Towers");
//! project.add_item(
//!     CartItem::new(ModuleId::SwingDoor).with_size(900.0, 2100.0),
//! );
//!
//! let result = project.calculate().unwrap();
//! assert!(!result.material_list.is_empty());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{self, CalculationResult, CalculationSettings};
use crate::errors::GlazeResult;
use crate::modules::CartItem;

/// Current schema version for .glz files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.glz` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, estimator, job info)
    pub meta: ProjectMetadata,

    /// Global settings (calculation defaults, currency)
    pub settings: GlobalSettings,

    /// Glazing requirements in entry order
    pub cart: Vec<CartLine>,
}

/// One cart entry with its stable handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: Uuid,
    pub item: CartItem,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `estimator` - Name of the responsible estimator
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(
        estimator: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                estimator: estimator.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            cart: Vec::new(),
        }
    }

    /// Append a cart item. Returns the UUID assigned to the line.
    pub fn add_item(&mut self, item: CartItem) -> Uuid {
        let id = Uuid::new_v4();
        self.cart.push(CartLine { id, item });
        self.touch();
        id
    }

    /// Remove a cart line by UUID, preserving the order of the rest.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CartItem> {
        let idx = self.cart.iter().position(|line| line.id == *id)?;
        let line = self.cart.remove(idx);
        self.touch();
        Some(line.item)
    }

    /// Get a cart item by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&CartItem> {
        self.cart
            .iter()
            .find(|line| line.id == *id)
            .map(|line| &line.item)
    }

    /// Get a mutable reference to a cart item by UUID.
    ///
    /// Note: getting a mutable reference marks the project as modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CartItem> {
        let found = self.cart.iter().any(|line| line.id == *id);
        if found {
            self.meta.modified = Utc::now();
            self.cart
                .iter_mut()
                .find(|line| line.id == *id)
                .map(|line| &mut line.item)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.cart.len()
    }

    /// Run the engine over this project's cart with its own settings.
    ///
    /// The inputs are copied, so the result stays valid however the
    /// project changes afterwards.
    pub fn calculate(&self) -> GlazeResult<CalculationResult> {
        let items: Vec<CartItem> = self.cart.iter().map(|line| line.item.clone()).collect();
        engine::calculate(&items, &self.settings.calculation)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible estimator
    pub estimator: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default calculation settings for this project's runs
    pub calculation: CalculationSettings,

    /// ISO currency code for quotes (fixed-locale naira by default)
    pub currency: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            calculation: CalculationSettings::default(),
            currency: "NGN".to_string(),
        }
    }
}

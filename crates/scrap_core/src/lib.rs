//! `scrap_core`: scrap-repair consolidation engine.
//!
//! No IO. Reads inventory snapshots, picks copies of one part to combine,
//! and applies the result through collaborator traits after confirmation.

mod catalog;
pub mod consolidation;
pub mod damage;
mod error;
pub mod grouping;
mod id;
pub mod selector;
pub mod settings;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use catalog::{PartsCatalog, PartsInfo};
pub use consolidation::{
    condition_to_percent, propose, Inventory, PendingDecision, Phase, Proposal, RepairReport,
    RepairUi, Resolution, ScrapRepair, SelectionContext,
};
pub use damage::{combined_damage, damage_level, max_damage_level, repaired_condition};
pub use error::ConsolidationError;
pub use grouping::{find_consolidation_candidates, ItemGroup};
pub use id::{generate_item_uid, random_item_uid};
pub use selector::{select_optimal_subset, Selection, SelectionPath};
pub use settings::{InMemoryQolSettings, NoQolSettings, QolFlag, QolSettings};
pub use types::*;

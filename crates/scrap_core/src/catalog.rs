//! Classification lookup for part identities.
//!
//! The engine never consults shared mutable registries; hosts build a
//! `PartsInfo` once (see `scrap_world`) and pass it in by reference.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::{Classification, Item, ItemId, RepairThresholds};

pub trait PartsCatalog {
    fn classification(&self, id: &ItemId) -> Classification;

    fn thresholds(&self) -> RepairThresholds;

    fn min_condition_to_repair(&self, id: &ItemId) -> f32 {
        self.thresholds()
            .min_condition_to_repair(self.classification(id))
    }

    /// Largest combined damage a consolidated copy of `item` may retain.
    fn max_damage_level(&self, item: &Item) -> f32 {
        crate::damage::max_damage_level(self.min_condition_to_repair(&item.id))
    }
}

impl<C: PartsCatalog + ?Sized> PartsCatalog for &C {
    fn classification(&self, id: &ItemId) -> Classification {
        (**self).classification(id)
    }

    fn thresholds(&self) -> RepairThresholds {
        (**self).thresholds()
    }

    fn min_condition_to_repair(&self, id: &ItemId) -> f32 {
        (**self).min_condition_to_repair(id)
    }

    fn max_damage_level(&self, item: &Item) -> f32 {
        (**self).max_damage_level(item)
    }
}

/// Immutable part classification sets.
///
/// Ids missing from both sets are `Normal`. An id present in both is treated
/// as special repairable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartsInfo {
    pub special_repairable: AHashSet<ItemId>,
    pub non_repairable: AHashSet<ItemId>,
    /// Parts only found in junkyards, barns or on wrecks.
    pub rare: AHashSet<ItemId>,
    pub thresholds: RepairThresholds,
}

impl PartsInfo {
    pub fn new(thresholds: RepairThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_special_repairable<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.special_repairable
            .extend(ids.into_iter().map(|id| ItemId(id.into())));
        self
    }

    #[must_use]
    pub fn with_non_repairable<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_repairable
            .extend(ids.into_iter().map(|id| ItemId(id.into())));
        self
    }

    pub fn is_rare(&self, id: &ItemId) -> bool {
        self.rare.contains(id)
    }
}

impl PartsCatalog for PartsInfo {
    fn classification(&self, id: &ItemId) -> Classification {
        if self.special_repairable.contains(id) {
            Classification::SpecialRepairable
        } else if self.non_repairable.contains(id) {
            Classification::NonRepairable
        } else {
            Classification::Normal
        }
    }

    fn thresholds(&self) -> RepairThresholds {
        self.thresholds
    }
}

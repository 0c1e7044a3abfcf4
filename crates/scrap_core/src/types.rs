//! Type definitions for `scrap_core`.
//!
//! Items, ID newtypes, part classification and the repair thresholds that
//! derive from it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

/// Part identity shared by interchangeable copies (e.g. `"wheel_15"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique instance id of a single item in an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemUid(pub Uuid);

impl std::fmt::Display for ItemUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ItemUid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub uid: ItemUid,
    /// 1.0 is pristine, 0.0 is destroyed.
    pub condition: f32,
    /// Ranking used to pick the surviving item when nothing is preselected.
    #[serde(default)]
    pub quality: u32,
    /// Localized display name; falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, uid: ItemUid, condition: f32) -> Self {
        Self {
            id,
            uid,
            condition: condition.clamp(0.0, 1.0),
            quality: 0,
            name: None,
        }
    }

    #[must_use]
    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Repairable by the game from the normal minimum condition.
    Normal,
    /// Repairable only from a higher, configurable condition.
    SpecialRepairable,
    /// Cannot be a repair target; scrap copies are combined wholesale.
    NonRepairable,
}

/// Minimum conditions from which a part may be repaired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepairThresholds {
    pub special_min_condition: f32,
}

impl RepairThresholds {
    /// Set by the game, not configurable.
    pub const NORMAL_MIN_CONDITION: f32 = 0.15;
    pub const DEFAULT_SPECIAL_MIN_CONDITION: f32 = 0.85;

    pub fn min_condition_to_repair(&self, classification: Classification) -> f32 {
        match classification {
            Classification::Normal => Self::NORMAL_MIN_CONDITION,
            Classification::SpecialRepairable => self.special_min_condition,
            Classification::NonRepairable => 1.0,
        }
    }
}

impl Default for RepairThresholds {
    fn default() -> Self {
        Self {
            special_min_condition: Self::DEFAULT_SPECIAL_MIN_CONDITION,
        }
    }
}

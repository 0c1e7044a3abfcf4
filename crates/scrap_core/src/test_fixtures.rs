//! Shared test fixtures for scrap_core and downstream crates.
//!
//! `base_catalog()` classifies a handful of parts the scenario tests use.
//! `RecordingUi` captures every message the engine sends to the host.

use crate::{
    generate_item_uid, Item, ItemId, PartsInfo, RepairThresholds, RepairUi,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn make_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Normal parts by default; `"seat"` special (0.85), `"windshield"` non-repairable.
pub fn base_catalog() -> PartsInfo {
    PartsInfo::new(RepairThresholds::default())
        .with_special_repairable(["seat"])
        .with_non_repairable(["windshield"])
}

/// Catalog whose special threshold is `min_condition` for every id in `special`.
pub fn catalog_with_special(special: &[&str], min_condition: f32) -> PartsInfo {
    PartsInfo::new(RepairThresholds {
        special_min_condition: min_condition,
    })
    .with_special_repairable(special.iter().copied())
}

pub fn make_item(rng: &mut impl Rng, id: &str, condition: f32) -> Item {
    Item::new(ItemId::new(id), generate_item_uid(rng), condition)
}

pub fn make_items(rng: &mut impl Rng, id: &str, conditions: &[f32]) -> Vec<Item> {
    conditions
        .iter()
        .map(|&condition| make_item(rng, id, condition))
        .collect()
}

/// `count` copies of `id` with conditions drawn uniformly from `range`.
pub fn random_items(
    rng: &mut impl Rng,
    id: &str,
    count: usize,
    range: std::ops::Range<f32>,
) -> Vec<Item> {
    (0..count)
        .map(|_| {
            let condition = rng.gen_range(range.clone());
            make_item(rng, id, condition)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMessage {
    Confirmation { title: String, description: String },
    Notify { title: String, message: String },
    NoCandidates { message: String },
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    pub messages: Vec<UiMessage>,
}

impl RecordingUi {
    pub fn last_description(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            UiMessage::Confirmation { description, .. } => Some(description.as_str()),
            _ => None,
        })
    }
}

impl RepairUi for RecordingUi {
    fn request_confirmation(&mut self, title: &str, description: &str) {
        self.messages.push(UiMessage::Confirmation {
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    fn notify(&mut self, title: &str, message: &str) {
        self.messages.push(UiMessage::Notify {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn notify_no_candidates(&mut self, message: &str) {
        self.messages.push(UiMessage::NoCandidates {
            message: message.to_string(),
        });
    }
}

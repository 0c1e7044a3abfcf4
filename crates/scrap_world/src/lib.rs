//! Content loading shared between scrap_cli and other hosts.
//!
//! Reads part definitions and repair configuration, derives the part
//! classification the engine consumes, and loads/saves inventory snapshots.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use rand::Rng;
use scrap_core::{generate_item_uid, Item, ItemId, PartsInfo, RepairThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// 0 means the game cannot repair the part.
    #[serde(default)]
    pub repair_group: u32,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub car_id: Option<String>,
}

#[derive(Deserialize)]
struct PartsFile {
    content_version: String,
    parts: Vec<PartDef>,
}

fn default_special_min_condition() -> f32 {
    RepairThresholds::DEFAULT_SPECIAL_MIN_CONDITION
}

fn default_special_repair_shops() -> Vec<String> {
    ["BodyShop", "InteriorShop", "TireShop", "WorkshopBodyShop"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    #[serde(default = "default_special_min_condition")]
    pub special_repairable_min_condition: f32,
    /// Part ids or car ids whose parts only turn up in junkyards and barns.
    #[serde(default)]
    pub rare_parts: Vec<String>,
    /// Shops whose otherwise unrepairable parts become special repairable.
    #[serde(default = "default_special_repair_shops")]
    pub special_repair_shops: Vec<String>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            special_repairable_min_condition: default_special_min_condition(),
            rare_parts: Vec::new(),
            special_repair_shops: default_special_repair_shops(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Content {
    pub content_version: String,
    pub parts: Vec<PartDef>,
    pub config: RepairConfig,
    pub parts_info: PartsInfo,
}

impl Content {
    pub fn part(&self, id: &ItemId) -> Option<&PartDef> {
        self.parts.iter().find(|part| part.id == id.0)
    }
}

/// Classifies every part:
/// - rare (by part id or car id): special repairable if the game can't repair it,
/// - otherwise unrepairable parts from the configured shops: special repairable,
/// - any other unrepairable part: non-repairable.
pub fn build_parts_info(parts: &[PartDef], config: &RepairConfig) -> PartsInfo {
    let rare: HashSet<&str> = config.rare_parts.iter().map(String::as_str).collect();
    let shops: HashSet<&str> = config
        .special_repair_shops
        .iter()
        .map(String::as_str)
        .collect();

    let mut info = PartsInfo::new(RepairThresholds {
        special_min_condition: config.special_repairable_min_condition,
    });

    for part in parts {
        let id = ItemId::new(part.id.as_str());
        let is_rare = rare.contains(part.id.as_str())
            || part
                .car_id
                .as_deref()
                .is_some_and(|car| rare.contains(car));

        if is_rare {
            if part.repair_group == 0 {
                info.special_repairable.insert(id.clone());
            }
            info.rare.insert(id);
            continue;
        }

        if part.repair_group == 0 {
            if shops.contains(part.shop_name.as_str()) {
                info.special_repairable.insert(id);
            } else {
                info.non_repairable.insert(id);
            }
        }
    }

    tracing::info!(
        rare = info.rare.len(),
        special = info.special_repairable.len(),
        non_repairable = info.non_repairable.len(),
        "classified parts"
    );
    info
}

pub fn validate_content(content: &Content) -> Result<()> {
    let threshold = content.config.special_repairable_min_condition;
    ensure!(
        (0.0..=1.0).contains(&threshold),
        "special_repairable_min_condition {threshold} is outside [0, 1]"
    );

    let mut seen = HashSet::new();
    for part in &content.parts {
        ensure!(!part.id.is_empty(), "part has empty id");
        ensure!(seen.insert(part.id.as_str()), "duplicate part id '{}'", part.id);
    }
    Ok(())
}

pub fn load_content(content_dir: &str) -> Result<Content> {
    let dir = Path::new(content_dir);
    let parts_file: PartsFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("parts.json")).context("reading parts.json")?,
    )
    .context("parsing parts.json")?;

    let config_path = dir.join("config.json");
    let config: RepairConfig = if config_path.exists() {
        serde_json::from_str(&std::fs::read_to_string(&config_path).context("reading config.json")?)
            .context("parsing config.json")?
    } else {
        tracing::info!("no config.json in {content_dir}, using defaults");
        RepairConfig::default()
    };

    let parts_info = build_parts_info(&parts_file.parts, &config);
    let content = Content {
        content_version: parts_file.content_version,
        parts: parts_file.parts,
        config,
        parts_info,
    };
    validate_content(&content)?;
    Ok(content)
}

pub fn validate_inventory(items: &[Item]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        ensure!(
            (0.0..=1.0).contains(&item.condition),
            "item {} has condition {} outside [0, 1]",
            item.uid,
            item.condition
        );
        ensure!(seen.insert(item.uid), "duplicate item uid {}", item.uid);
    }
    Ok(())
}

pub fn load_inventory(path: &Path) -> Result<Vec<Item>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory file: {}", path.display()))?;
    let items: Vec<Item> = serde_json::from_str(&json)
        .with_context(|| format!("parsing inventory file: {}", path.display()))?;
    validate_inventory(&items)?;
    Ok(items)
}

pub fn save_inventory(path: &Path, items: &[Item]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, items)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Fills in missing display names from the part definitions.
pub fn label_items(items: &mut [Item], content: &Content) {
    for item in items.iter_mut().filter(|item| item.name.is_none()) {
        item.name = content.part(&item.id).and_then(|part| part.name.clone());
    }
}

/// `count` worn copies of `id` with conditions drawn from `[0, max_condition)`.
pub fn spawn_copies(
    rng: &mut impl Rng,
    id: &ItemId,
    count: usize,
    max_condition: f32,
) -> Vec<Item> {
    (0..count)
        .map(|_| {
            let condition = rng.gen_range(0.0..max_condition.max(f32::EPSILON));
            Item::new(id.clone(), generate_item_uid(rng), condition)
        })
        .collect()
}

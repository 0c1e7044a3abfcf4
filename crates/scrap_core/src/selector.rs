//! Optimal subset selection.
//!
//! Given copies of one part and the largest combined damage a repair may keep
//! (`M`), pick the subset whose combined damage is as large as possible while
//! staying strictly below `M`. That is the subset that wastes the least repair
//! potential.
//!
//! Products become sums in log space: with `w = -ln(damage)` and `T = -ln(M)`,
//! `Π damage < M` holds exactly when `Σ w > T`, and the best subset is the one
//! with the smallest weight sum above `T`. Weights are scaled to integers and
//! solved as a subset-sum reachability problem.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::damage::damage_level;
use crate::{Classification, Item};

/// Damage levels are clamped into `(DAMAGE_FLOOR, DAMAGE_CEILING)` so every
/// logarithm stays finite.
pub const DAMAGE_FLOOR: f64 = 1e-12;
pub const DAMAGE_CEILING: f64 = 1.0 - 1e-12;
/// Log-space weights are kept with 1e-5 precision.
pub const WEIGHT_SCALE: f64 = 1e5;
/// Weight used when a logarithm is not finite.
pub const FALLBACK_WEIGHT: f64 = 1e3;

/// Which branch of the selector produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    /// Fewer than two items, or a non-repairable part.
    Unchanged,
    /// Fewer than two copies are scrap; the group is combined wholesale.
    ScrapPoolTooSmall,
    /// Weight-minimal qualifying subset.
    Optimal,
    /// Even the whole pool keeps more damage than allowed; the whole pool is used.
    UnreachableThreshold,
    /// No achievable weight sum crossed the threshold; the whole pool is used.
    NoQualifyingSum,
    /// Reconstruction came back empty; the best single qualifying item is used.
    DegenerateSingle,
    /// Reconstruction came back empty and no single item qualified.
    DegenerateWholePool,
}

#[derive(Debug, Clone)]
pub struct Selection {
    pub items: Vec<Item>,
    pub path: SelectionPath,
}

impl Selection {
    fn new(items: Vec<Item>, path: SelectionPath) -> Self {
        Self { items, path }
    }
}

/// Pick the copies of one part to combine. All `items` must share an id.
pub fn select_optimal_subset(
    items: &[Item],
    max_damage_level: f32,
    classification: Classification,
) -> Vec<Item> {
    select_with_path(items, max_damage_level, classification).items
}

/// Like [`select_optimal_subset`], also reporting which branch was taken.
pub fn select_with_path(
    items: &[Item],
    max_damage_level: f32,
    classification: Classification,
) -> Selection {
    if items.len() < 2 || classification == Classification::NonRepairable {
        return Selection::new(items.to_vec(), SelectionPath::Unchanged);
    }

    // Copies that are repairable on their own are never consumed as scrap.
    let pool: Vec<Item> = items
        .iter()
        .filter(|item| damage_level(item) > max_damage_level)
        .cloned()
        .collect();
    if pool.len() < 2 {
        return Selection::new(items.to_vec(), SelectionPath::ScrapPoolTooSmall);
    }

    core_select(&pool, f64::from(max_damage_level))
}

/// Subset selection over a pool already restricted to scrap candidates.
pub fn core_select(pool: &[Item], max_damage: f64) -> Selection {
    let damages: Vec<f64> = pool.iter().map(clamped_damage).collect();

    let product_all: f64 = damages.iter().product();
    if product_all > max_damage || max_damage <= 0.0 {
        tracing::debug!(
            pool = pool.len(),
            product_all,
            max_damage,
            "threshold unreachable, combining whole pool"
        );
        return Selection::new(pool.to_vec(), SelectionPath::UnreachableThreshold);
    }

    let weights: Vec<u64> = damages.iter().map(|&d| scaled_weight(d)).collect();
    let threshold = scaled_threshold(max_damage);

    let Some(subset) = minimal_qualifying_subset(&weights, threshold) else {
        return Selection::new(pool.to_vec(), SelectionPath::NoQualifyingSum);
    };

    if subset.is_empty() {
        return degenerate_fallback(pool, &damages, max_damage);
    }

    let mut indices = subset;
    indices.sort_unstable();
    let items = indices.iter().map(|&idx| pool[idx].clone()).collect();
    Selection::new(items, SelectionPath::Optimal)
}

fn clamped_damage(item: &Item) -> f64 {
    f64::from(damage_level(item)).clamp(DAMAGE_FLOOR, DAMAGE_CEILING)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_weight(damage: f64) -> u64 {
    let weight = -damage.ln();
    let weight = if weight.is_finite() {
        weight.max(0.0)
    } else {
        FALLBACK_WEIGHT
    };
    (weight * WEIGHT_SCALE).round() as u64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_threshold(max_damage: f64) -> u64 {
    let threshold = -max_damage.ln();
    if threshold.is_finite() {
        (threshold.max(0.0) * WEIGHT_SCALE).round() as u64
    } else {
        (FALLBACK_WEIGHT * WEIGHT_SCALE).round() as u64
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    item: usize,
    prev: u64,
}

/// Indices of a subset whose weight sum is the smallest one strictly above
/// `threshold`, or `None` if no subset gets there.
///
/// Only sums at or below the threshold are extended further: weights are
/// non-negative, so anything above it can only grow. Equal sums keep the
/// first subset that reached them.
fn minimal_qualifying_subset(weights: &[u64], threshold: u64) -> Option<SmallVec<[usize; 8]>> {
    // Sum 0 (the empty subset) is the implicit root and never stored.
    let mut links: AHashMap<u64, Link> = AHashMap::new();
    let mut frontier: Vec<u64> = vec![0];
    let mut added: Vec<u64> = Vec::new();
    let mut best: Option<(u64, Link)> = None;

    for (item, &weight) in weights.iter().enumerate() {
        for &base in &frontier {
            let sum = base.saturating_add(weight);
            let link = Link { item, prev: base };
            if sum > threshold {
                if best.map_or(true, |(best_sum, _)| sum < best_sum) {
                    best = Some((sum, link));
                }
            } else if sum != 0 && !links.contains_key(&sum) {
                links.insert(sum, link);
                added.push(sum);
            }
        }
        frontier.append(&mut added);
    }

    let (_, last) = best?;
    Some(reconstruct(last, &links))
}

/// Walks predecessor links back to the root. A broken chain yields an empty
/// subset.
fn reconstruct(last: Link, links: &AHashMap<u64, Link>) -> SmallVec<[usize; 8]> {
    let mut subset: SmallVec<[usize; 8]> = SmallVec::new();
    subset.push(last.item);
    let mut prev = last.prev;
    while prev != 0 {
        let Some(link) = links.get(&prev) else {
            return SmallVec::new();
        };
        subset.push(link.item);
        prev = link.prev;
    }
    subset
}

fn degenerate_fallback(pool: &[Item], damages: &[f64], max_damage: f64) -> Selection {
    let single = damages
        .iter()
        .enumerate()
        .filter(|(_, &damage)| damage < max_damage)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx);

    match single {
        Some(idx) => Selection::new(vec![pool[idx].clone()], SelectionPath::DegenerateSingle),
        None => Selection::new(pool.to_vec(), SelectionPath::DegenerateWholePool),
    }
}

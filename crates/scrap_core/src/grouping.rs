//! Group selection: which part to consolidate.

use ahash::AHashMap;

use crate::selector::select_with_path;
use crate::{Item, ItemId, PartsCatalog};

/// Copies of one part present in an inventory snapshot.
#[derive(Debug, Clone)]
pub struct ItemGroup<'a> {
    pub id: &'a ItemId,
    pub members: Vec<&'a Item>,
}

impl ItemGroup<'_> {
    pub fn condition_sum(&self) -> f32 {
        self.members.iter().map(|item| item.condition).sum()
    }
}

/// Groups items by id, in evaluation order:
/// 1. the preferred id first,
/// 2. then more members first,
/// 3. then lower total condition first (most to gain),
/// 4. then by id for a stable order.
pub fn ordered_groups<'a>(items: &'a [Item], preferred: Option<&ItemId>) -> Vec<ItemGroup<'a>> {
    let mut by_id: AHashMap<&ItemId, Vec<&Item>> = AHashMap::new();
    for item in items {
        by_id.entry(&item.id).or_default().push(item);
    }

    let mut groups: Vec<ItemGroup<'a>> = by_id
        .into_iter()
        .map(|(id, members)| ItemGroup { id, members })
        .collect();

    groups.sort_by(|a, b| {
        let a_preferred = preferred == Some(a.id);
        let b_preferred = preferred == Some(b.id);
        b_preferred
            .cmp(&a_preferred)
            .then_with(|| b.members.len().cmp(&a.members.len()))
            .then_with(|| a.condition_sum().total_cmp(&b.condition_sum()))
            .then_with(|| a.id.cmp(b.id))
    });
    groups
}

/// First group (in [`ordered_groups`] order) whose optimal subset has at
/// least two items. Empty if no group qualifies.
pub fn find_consolidation_candidates(
    items: &[Item],
    preferred: Option<&ItemId>,
    catalog: &impl PartsCatalog,
) -> Vec<Item> {
    for group in ordered_groups(items, preferred) {
        if group.members.len() < 2 {
            continue;
        }
        // Every member shares the id, so any of them carries the threshold.
        let representative = group.members[0];
        let max_damage = catalog.max_damage_level(representative);
        let classification = catalog.classification(group.id);

        let members: Vec<Item> = group.members.iter().map(|&item| item.clone()).collect();
        let selection = select_with_path(&members, max_damage, classification);

        tracing::debug!(
            id = %group.id,
            members = members.len(),
            selected = selection.items.len(),
            max_damage,
            path = ?selection.path,
            "evaluated group"
        );

        if selection.items.len() >= 2 {
            return selection.items;
        }
    }
    Vec::new()
}

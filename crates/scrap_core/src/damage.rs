//! Damage math: pure functions over item conditions.
//!
//! Combining parts multiplies their damage levels: each extra scrapped copy
//! removes the same fraction of whatever damage is left.

use crate::Item;

/// `1 - condition`.
pub fn damage_level(item: &Item) -> f32 {
    1.0 - item.condition
}

/// Product of the damage levels of `items`. The empty product is 1.
pub fn combined_damage<'a>(items: impl IntoIterator<Item = &'a Item>) -> f64 {
    items
        .into_iter()
        .map(|item| f64::from(damage_level(item)))
        .product()
}

/// Condition of the single copy left after combining `items`.
pub fn repaired_condition<'a>(items: impl IntoIterator<Item = &'a Item>) -> f32 {
    let repaired = 1.0 - combined_damage(items);
    #[allow(clippy::cast_possible_truncation)]
    let repaired = repaired as f32;
    repaired.clamp(0.0, 1.0)
}

/// Most damage a combined result may keep and still count as repairable.
pub fn max_damage_level(min_condition_to_repair: f32) -> f32 {
    1.0 - min_condition_to_repair
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ItemId, ItemUid};
    use uuid::Uuid;

    fn item(condition: f32) -> Item {
        Item::new(ItemId::new("wheel"), ItemUid(Uuid::new_v4()), condition)
    }

    #[test]
    fn damage_is_complement_of_condition() {
        assert!((damage_level(&item(0.9)) - 0.1).abs() < 1e-6);
        assert!((damage_level(&item(0.0)) - 1.0).abs() < 1e-6);
        assert!(damage_level(&item(1.0)).abs() < 1e-6);
    }

    #[test]
    fn empty_set_has_full_damage() {
        let none: [Item; 0] = [];
        assert!((combined_damage(&none) - 1.0).abs() < 1e-12);
        assert!(repaired_condition(&none).abs() < 1e-6);
    }

    #[test]
    fn two_wheels_combine_multiplicatively() {
        let items = [item(0.9), item(0.8)];
        assert!((combined_damage(&items) - 0.02).abs() < 1e-6);
        assert!((repaired_condition(&items) - 0.98).abs() < 1e-5);
    }

    #[test]
    fn repaired_condition_ignores_order() {
        let forward = [item(0.2), item(0.1), item(0.05), item(0.6)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let shuffled = [
            forward[2].clone(),
            forward[0].clone(),
            forward[3].clone(),
            forward[1].clone(),
        ];
        let expected = repaired_condition(&forward);
        assert!((repaired_condition(&reversed) - expected).abs() < 1e-6);
        assert!((repaired_condition(&shuffled) - expected).abs() < 1e-6);
    }

    #[test]
    fn pristine_copy_repairs_fully() {
        let items = [item(1.0), item(0.0)];
        assert!((repaired_condition(&items) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn max_damage_from_threshold() {
        assert!((max_damage_level(0.15) - 0.85).abs() < 1e-6);
        assert!(max_damage_level(1.0).abs() < 1e-6);
    }
}

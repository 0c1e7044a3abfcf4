use rand::Rng;
use uuid::Uuid;

use crate::ItemUid;

/// Generate a deterministic v4-format item uid from a seeded RNG.
pub fn generate_item_uid(rng: &mut impl Rng) -> ItemUid {
    let bytes: [u8; 16] = rng.gen();
    ItemUid(uuid::Builder::from_random_bytes(bytes).into_uuid())
}

/// Fresh uid from the thread RNG, for hosts that spawn items interactively.
pub fn random_item_uid() -> ItemUid {
    ItemUid(Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn deterministic_uid_from_same_seed() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        let id1 = generate_item_uid(&mut rng1);
        let id2 = generate_item_uid(&mut rng2);
        assert_eq!(id1, id2);
        assert_eq!(id1.0.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn consecutive_uids_differ() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let id1 = generate_item_uid(&mut rng);
        let id2 = generate_item_uid(&mut rng);
        assert_ne!(id1, id2);
    }

    #[test]
    fn uid_round_trips_through_display() {
        let uid = random_item_uid();
        let parsed: ItemUid = uid.to_string().parse().unwrap();
        assert_eq!(parsed, uid);
    }
}

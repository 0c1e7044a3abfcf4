use super::*;
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn resolve_without_proposal_is_rejected() {
    let mut inventory: Vec<Item> = Vec::new();
    let catalog = base_catalog();
    let mut session = ScrapRepair::new(&catalog);
    let err = session
        .resolve(true, &mut inventory, &mut RecordingUi::default(), &mut NoQolSettings)
        .unwrap_err();
    assert_eq!(err, ConsolidationError::NoPendingDecision);
}

#[test]
fn decision_resolves_at_most_once() {
    let mut rng = make_rng();
    let mut inventory = make_items(&mut rng, "wheel", &[0.1, 0.05, 0.02]);
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session.start(&inventory, &no_selection(), &mut ui).unwrap();
    session
        .resolve(true, &mut inventory, &mut ui, &mut NoQolSettings)
        .unwrap();
    let after_first = inventory.clone();

    let second = session.resolve(true, &mut inventory, &mut ui, &mut NoQolSettings);
    assert_eq!(second, Err(ConsolidationError::NoPendingDecision));
    assert_eq!(inventory, after_first);
}

#[test]
fn nothing_mutates_before_confirmation() {
    let mut rng = make_rng();
    let inventory = make_items(&mut rng, "wheel", &[0.1, 0.05, 0.02]);
    let before = inventory.clone();
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    let phase = session.start(&inventory, &no_selection(), &mut ui).unwrap();

    assert_eq!(phase, Phase::AwaitingConfirmation);
    assert_eq!(inventory, before);
    assert!(matches!(
        ui.messages.as_slice(),
        [UiMessage::Confirmation { title, .. }] if title == consolidation::CONFIRMATION_TITLE
    ));
}

#[test]
fn restarting_replaces_pending_decision() {
    let mut rng = make_rng();
    let mut inventory = make_items(&mut rng, "wheel", &[0.1, 0.05]);
    inventory.extend(make_items(&mut rng, "tire", &[0.1, 0.05]));
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session
        .start(&inventory, &Some(inventory[0].clone()), &mut ui)
        .unwrap();
    session
        .start(&inventory, &Some(inventory[2].clone()), &mut ui)
        .unwrap();

    let pending = session.pending().unwrap().proposal();
    assert!(pending.members.iter().all(|item| item.id.as_str() == "tire"));
    assert_eq!(session.phase(), Phase::AwaitingConfirmation);
}

#[test]
fn applied_repair_notifies_with_final_percent() {
    let mut rng = make_rng();
    let mut inventory = make_items(&mut rng, "wheel", &[0.5, 0.5]);
    inventory[1].name = Some("Wheel".to_string());
    inventory[1].quality = 2;
    let catalog = PartsInfo::new(RepairThresholds::default());
    let mut ui = RecordingUi::default();

    let proposal = propose(&inventory, None, &catalog).unwrap();
    assert_eq!(
        proposal.description,
        "Repairing Wheel parts:\n50% + 50% to one 75% part."
    );

    let resolution =
        PendingDecision::new(proposal).resolve(true, &mut inventory, &mut ui, &mut NoQolSettings);

    assert!(matches!(resolution, Resolution::Applied(_)));
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].name.as_deref(), Some("Wheel"));
    assert_eq!(
        ui.messages,
        vec![UiMessage::Notify {
            title: consolidation::NOTIFICATION_TITLE.to_string(),
            message: "Wheel repaired from 2 parts to 75%.".to_string(),
        }]
    );
}

#[test]
fn vanished_members_are_reported_not_revalidated() {
    let mut rng = make_rng();
    let mut inventory = make_items(&mut rng, "wheel", &[0.1, 0.05, 0.02]);
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session.start(&inventory, &no_selection(), &mut ui).unwrap();
    let proposal = session.pending().unwrap().proposal().clone();
    let gone = proposal.consumed().next().unwrap().uid;
    inventory.retain(|item| item.uid != gone);

    let Ok(Resolution::Applied(report)) =
        session.resolve(true, &mut inventory, &mut ui, &mut NoQolSettings)
    else {
        panic!("expected the repair to apply");
    };

    assert_eq!(report.missing, vec![gone]);
    let target = find(&inventory, proposal.target.uid).unwrap();
    assert!((target.condition - proposal.repaired_condition).abs() < 1e-6);
}

/// Settings whose popup flag can be watched from the inventory.
struct SharedFlag(Rc<Cell<Option<bool>>>);

impl QolSettings for SharedFlag {
    fn get(&self, flag: QolFlag) -> Option<bool> {
        match flag {
            QolFlag::PopupForGroupAddedInventory => self.0.get(),
            QolFlag::PopupForAllPartsInGroup => None,
        }
    }

    fn set(&mut self, flag: QolFlag, value: bool) {
        if flag == QolFlag::PopupForGroupAddedInventory {
            self.0.set(Some(value));
        }
    }
}

struct WatchingInventory {
    items: Vec<Item>,
    flag: Rc<Cell<Option<bool>>>,
    flag_during_delete: Vec<Option<bool>>,
}

impl Inventory for WatchingInventory {
    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn set_condition(&mut self, uid: ItemUid, condition: f32) -> bool {
        self.items.set_condition(uid, condition)
    }

    fn delete(&mut self, uid: ItemUid) -> bool {
        self.flag_during_delete.push(self.flag.get());
        self.items.delete(uid)
    }
}

#[test]
fn popups_are_suppressed_while_deleting() {
    let mut rng = make_rng();
    let flag = Rc::new(Cell::new(Some(true)));
    let mut inventory = WatchingInventory {
        items: make_items(&mut rng, "wheel", &[0.1, 0.05, 0.02]),
        flag: Rc::clone(&flag),
        flag_during_delete: Vec::new(),
    };
    let mut settings = SharedFlag(Rc::clone(&flag));
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session.start(&inventory, &no_selection(), &mut ui).unwrap();
    session
        .resolve(true, &mut inventory, &mut ui, &mut settings)
        .unwrap();

    assert!(!inventory.flag_during_delete.is_empty());
    assert!(inventory
        .flag_during_delete
        .iter()
        .all(|&value| value == Some(false)));
    assert_eq!(flag.get(), Some(true));
}

#[test]
fn vanished_target_leaves_inventory_untouched() {
    let mut rng = make_rng();
    let mut inventory = make_items(&mut rng, "wheel", &[0.1, 0.05, 0.02]);
    let catalog = base_catalog();
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session.start(&inventory, &no_selection(), &mut ui).unwrap();
    let proposal = session.pending().unwrap().proposal().clone();
    inventory.retain(|item| item.uid != proposal.target.uid);
    let before = inventory.clone();

    let resolution = session
        .resolve(true, &mut inventory, &mut ui, &mut NoQolSettings)
        .unwrap();

    assert_eq!(resolution, Resolution::TargetMissing(proposal.target.uid));
    assert_eq!(inventory, before);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(
        ui.messages.last(),
        Some(&UiMessage::Notify {
            title: consolidation::NOTIFICATION_TITLE.to_string(),
            message: "wheel was not repaired: the part is no longer in the inventory."
                .to_string(),
        })
    );
}

/// Lets a part keep at most half its damage, whatever its classification.
struct HalfDamageCatalog;

impl PartsCatalog for HalfDamageCatalog {
    fn classification(&self, _id: &ItemId) -> Classification {
        Classification::Normal
    }

    fn thresholds(&self) -> RepairThresholds {
        RepairThresholds::default()
    }

    fn max_damage_level(&self, _item: &Item) -> f32 {
        0.5
    }
}

#[test]
fn borrowed_catalog_override_reaches_selection() {
    let mut rng = make_rng();
    // Damages 0.6, 0.7, 0.8: under the normal 0.85 limit no copy is scrap and
    // the group combines wholesale; under 0.5 the best pair is 0.6 * 0.8.
    let inventory = make_items(&mut rng, "wheel", &[0.4, 0.3, 0.2]);
    let catalog = HalfDamageCatalog;
    let mut ui = RecordingUi::default();
    let mut session = ScrapRepair::new(&catalog);

    session.start(&inventory, &no_selection(), &mut ui).unwrap();

    let proposal = session.pending().unwrap().proposal();
    assert_eq!(
        uids(&proposal.members),
        vec![inventory[0].uid, inventory[2].uid]
    );
    assert!((proposal.repaired_condition - 0.52).abs() < 1e-4);
}

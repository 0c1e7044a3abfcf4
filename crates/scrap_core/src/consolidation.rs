//! Scrap-repair transaction.
//!
//! A consolidation runs in two phases. [`propose`] reads an inventory
//! snapshot and builds a [`Proposal`] without touching anything. The host
//! shows its description, and once the user answers, the matching
//! [`PendingDecision`] is resolved exactly once: resolving consumes it.
//!
//! [`ScrapRepair`] wraps both phases for hosts that drive the flow from a
//! per-frame update: it keeps the single pending decision between frames.
//!
//! State machine: `Idle -> AwaitingConfirmation -> {Applied, Cancelled, TargetMissing}`.
//! After any terminal state the session is `Idle` again.

use crate::damage::repaired_condition;
use crate::grouping::find_consolidation_candidates;
use crate::settings::QolSettings;
use crate::{ConsolidationError, Item, ItemUid, PartsCatalog};

pub const CONFIRMATION_TITLE: &str = "SCRAP-REPAIR ITEMS";
pub const NOTIFICATION_TITLE: &str = "SCRAP-REPAIR";
pub const NO_CANDIDATES_MESSAGE: &str =
    "No repairable items found. You need several identical parts to repair one item.";

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// The container whose contents are consolidated.
pub trait Inventory {
    /// Live snapshot of the contents.
    fn items(&self) -> Vec<Item>;

    /// Returns `false` if no item with `uid` exists.
    fn set_condition(&mut self, uid: ItemUid, condition: f32) -> bool;

    /// Returns `false` if no item with `uid` exists.
    fn delete(&mut self, uid: ItemUid) -> bool;
}

impl Inventory for Vec<Item> {
    fn items(&self) -> Vec<Item> {
        self.clone()
    }

    fn set_condition(&mut self, uid: ItemUid, condition: f32) -> bool {
        match self.iter_mut().find(|item| item.uid == uid) {
            Some(item) => {
                item.condition = condition.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, uid: ItemUid) -> bool {
        let before = self.len();
        self.retain(|item| item.uid != uid);
        self.len() != before
    }
}

pub trait RepairUi {
    /// Shows the question. The answer comes back later through
    /// [`ScrapRepair::resolve`] or [`PendingDecision::resolve`].
    fn request_confirmation(&mut self, title: &str, description: &str);

    fn notify(&mut self, title: &str, message: &str);

    fn notify_no_candidates(&mut self, message: &str);
}

/// The item currently highlighted in the host UI.
pub trait SelectionContext {
    fn current_selected_item(&self) -> Option<Item>;
}

impl SelectionContext for Option<Item> {
    fn current_selected_item(&self) -> Option<Item> {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Proposal {
    /// The copy that survives with the repaired condition.
    pub target: Item,
    /// Every copy combined, target included, in inventory order.
    pub members: Vec<Item>,
    pub repaired_condition: f32,
    pub description: String,
}

impl Proposal {
    /// Members deleted when the proposal is applied.
    pub fn consumed(&self) -> impl Iterator<Item = &Item> {
        self.members
            .iter()
            .filter(move |item| item.uid != self.target.uid)
    }
}

/// Builds a consolidation proposal from an inventory snapshot. Nothing is
/// mutated.
pub fn propose(
    inventory: &impl Inventory,
    selected: Option<&Item>,
    catalog: &impl PartsCatalog,
) -> Result<Proposal, ConsolidationError> {
    let snapshot = inventory.items();
    let members = find_consolidation_candidates(&snapshot, selected.map(|item| &item.id), catalog);
    if members.len() < 2 {
        return Err(ConsolidationError::NoCandidates);
    }

    let target = members[choose_target(&members, selected)].clone();
    let repaired = repaired_condition(&members);
    let description = describe(&target, &members, repaired);

    for member in &members {
        tracing::debug!(
            uid = %member.uid,
            id = %member.id,
            condition = member.condition,
            quality = member.quality,
            "scrap-repair member"
        );
    }

    Ok(Proposal {
        target,
        members,
        repaired_condition: repaired,
        description,
    })
}

/// The preselected item if it takes part, else the highest quality (first
/// one on ties).
fn choose_target(members: &[Item], selected: Option<&Item>) -> usize {
    if let Some(idx) =
        selected.and_then(|sel| members.iter().position(|item| item.uid == sel.uid))
    {
        return idx;
    }
    let mut best = 0;
    for (idx, item) in members.iter().enumerate().skip(1) {
        if item.quality > members[best].quality {
            best = idx;
        }
    }
    best
}

/// Truncated whole percent, e.g. `0.456` -> `"45%"`.
pub fn condition_to_percent(condition: f32) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let percent = (condition * 100.0) as i32;
    format!("{percent}%")
}

pub fn describe(target: &Item, members: &[Item], repaired: f32) -> String {
    let parts: Vec<String> = members
        .iter()
        .map(|item| condition_to_percent(item.condition))
        .collect();
    format!(
        "Repairing {} parts:\n{} to one {} part.",
        target.display_name(),
        parts.join(" + "),
        condition_to_percent(repaired)
    )
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    pub target: ItemUid,
    pub condition: f32,
    pub consumed: Vec<ItemUid>,
    /// Consumed members that were gone by the time the repair was applied.
    pub missing: Vec<ItemUid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Applied(RepairReport),
    Cancelled,
    /// The target left the inventory before confirmation; nothing was changed.
    TargetMissing(ItemUid),
}

/// A proposal waiting for the user's answer.
#[derive(Debug, Clone)]
pub struct PendingDecision {
    proposal: Proposal,
}

impl PendingDecision {
    pub fn new(proposal: Proposal) -> Self {
        Self { proposal }
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    /// Applies or drops the proposal. The snapshot is not re-validated:
    /// consumed members removed in the meantime are skipped and reported as
    /// missing. A vanished target leaves the inventory untouched.
    pub fn resolve(
        self,
        confirmed: bool,
        inventory: &mut impl Inventory,
        ui: &mut impl RepairUi,
        settings: &mut impl QolSettings,
    ) -> Resolution {
        let proposal = self.proposal;
        if !confirmed {
            tracing::info!(id = %proposal.target.id, "scrap-repair cancelled by user");
            return Resolution::Cancelled;
        }

        if !inventory.set_condition(proposal.target.uid, proposal.repaired_condition) {
            tracing::warn!(uid = %proposal.target.uid, "scrap-repair target vanished before confirmation");
            ui.notify(
                NOTIFICATION_TITLE,
                &format!(
                    "{} was not repaired: the part is no longer in the inventory.",
                    proposal.target.display_name()
                ),
            );
            return Resolution::TargetMissing(proposal.target.uid);
        }

        let mut missing = Vec::new();
        let mut consumed = Vec::new();

        {
            let _suppressed = settings.scoped_suppression();
            for item in proposal.consumed() {
                tracing::info!(uid = %item.uid, "deleting consumed part");
                if inventory.delete(item.uid) {
                    consumed.push(item.uid);
                } else {
                    tracing::warn!(uid = %item.uid, "consumed part vanished before confirmation");
                    missing.push(item.uid);
                }
            }
        }

        ui.notify(
            NOTIFICATION_TITLE,
            &format!(
                "{} repaired from {} parts to {}.",
                proposal.target.display_name(),
                proposal.members.len(),
                condition_to_percent(proposal.repaired_condition)
            ),
        );
        tracing::info!(
            id = %proposal.target.id,
            parts = proposal.members.len(),
            condition = proposal.repaired_condition,
            "scrap-repair applied"
        );

        Resolution::Applied(RepairReport {
            target: proposal.target.uid,
            condition: proposal.repaired_condition,
            consumed,
            missing,
        })
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingConfirmation,
}

/// Scrap-repair session holding at most one pending decision.
#[derive(Debug)]
pub struct ScrapRepair<C> {
    catalog: C,
    pending: Option<PendingDecision>,
}

impl<C: PartsCatalog> ScrapRepair<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            pending: None,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::AwaitingConfirmation
        } else {
            Phase::Idle
        }
    }

    pub fn pending(&self) -> Option<&PendingDecision> {
        self.pending.as_ref()
    }

    /// Proposes a consolidation and asks the UI to confirm it. A decision
    /// still pending from an earlier call is abandoned.
    pub fn start(
        &mut self,
        inventory: &impl Inventory,
        selection: &impl SelectionContext,
        ui: &mut impl RepairUi,
    ) -> Result<Phase, ConsolidationError> {
        if let Some(abandoned) = self.pending.take() {
            tracing::debug!(id = %abandoned.proposal.target.id, "abandoning unanswered scrap-repair");
        }

        let selected = selection.current_selected_item();
        let proposal = match propose(inventory, selected.as_ref(), &self.catalog) {
            Ok(proposal) => proposal,
            Err(err) => {
                tracing::info!("{err}, nothing to scrap-repair");
                ui.notify_no_candidates(NO_CANDIDATES_MESSAGE);
                return Err(err);
            }
        };

        tracing::info!(
            id = %proposal.target.id,
            parts = proposal.members.len(),
            condition = proposal.repaired_condition,
            "scrap-repair proposed"
        );
        ui.request_confirmation(CONFIRMATION_TITLE, &proposal.description);
        self.pending = Some(PendingDecision::new(proposal));
        Ok(Phase::AwaitingConfirmation)
    }

    /// Delivers the user's answer to the pending decision.
    pub fn resolve(
        &mut self,
        confirmed: bool,
        inventory: &mut impl Inventory,
        ui: &mut impl RepairUi,
        settings: &mut impl QolSettings,
    ) -> Result<Resolution, ConsolidationError> {
        let pending = self
            .pending
            .take()
            .ok_or(ConsolidationError::NoPendingDecision)?;
        Ok(pending.resolve(confirmed, inventory, ui, settings))
    }
}

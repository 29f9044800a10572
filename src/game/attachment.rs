//! Attachment relation between battlefield cards
//!
//! A child names at most one parent through `attached_to`, and the parent lists the
//! child in `attached_cards`. Both sides are always written together here (and in the
//! transition teardown, which calls [`detach`]); nobody else touches either field.

use crate::core::{CardInstance, InstanceId};
use crate::error::AttachmentRejection;
use crate::game::CardRegistry;
use crate::zones::Zone;
use crate::{Result, TabletopError};
use serde::{Deserialize, Serialize};

/// "Pick source, then pick target" selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttachmentMode {
    #[default]
    Idle,
    Selecting(InstanceId),
}

impl AttachmentMode {
    pub fn pending_source(&self) -> Option<InstanceId> {
        match self {
            AttachmentMode::Idle => None,
            AttachmentMode::Selecting(source) => Some(*source),
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, AttachmentMode::Selecting(_))
    }
}

fn rejection(child: InstanceId, parent: InstanceId, reason: AttachmentRejection) -> TabletopError {
    TabletopError::InvalidAttachment {
        child,
        parent,
        reason,
    }
}

/// Is `card` attached (directly or through a chain) to `ancestor`?
pub fn is_descendant(registry: &CardRegistry, card: InstanceId, ancestor: InstanceId) -> bool {
    let mut current = registry.get(card).ok().and_then(|c| c.attached_to);
    // Chain length is bounded by the card count, even if the data were corrupt
    let mut remaining = registry.len();
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        if remaining == 0 {
            return false;
        }
        remaining -= 1;
        current = registry.get(id).ok().and_then(|c| c.attached_to);
    }
    false
}

/// Every card attached to `root`, directly or through a chain
pub fn descendants(registry: &CardRegistry, root: InstanceId) -> Vec<InstanceId> {
    let mut found = Vec::new();
    let mut pending: Vec<InstanceId> = registry
        .get(root)
        .map(|c| c.attached_cards.to_vec())
        .unwrap_or_default();

    while let Some(id) = pending.pop() {
        if id == root || found.contains(&id) {
            continue;
        }
        found.push(id);
        if let Ok(card) = registry.get(id) {
            pending.extend(card.attached_cards.iter().copied());
        }
    }
    found
}

/// Check every precondition of `attach` without changing anything
pub fn validate_attach(
    registry: &CardRegistry,
    child: InstanceId,
    parent: InstanceId,
) -> Result<()> {
    if child == parent {
        return Err(rejection(child, parent, AttachmentRejection::SelfAttachment));
    }

    let child_card = registry.get(child)?;
    let parent_card = registry.get(parent)?;

    for card in [child_card, parent_card] {
        if card.zone != Zone::Battlefield {
            return Err(rejection(
                child,
                parent,
                AttachmentRejection::NotOnBattlefield(card.id),
            ));
        }
    }

    if is_descendant(registry, parent, child) {
        return Err(rejection(child, parent, AttachmentRejection::Cycle));
    }

    Ok(())
}

/// Attach `child` to `parent`
///
/// A child already attached elsewhere is first removed from its old parent's list. The
/// child takes over the parent's cell, and so does everything attached to the child.
/// Attaching to the current parent again changes nothing. On error nothing is written.
pub fn attach(registry: &mut CardRegistry, child: InstanceId, parent: InstanceId) -> Result<()> {
    validate_attach(registry, child, parent)?;

    let child_card = registry.get(child)?.clone();
    if child_card.attached_to == Some(parent) {
        return Ok(());
    }

    let mut updates: Vec<CardInstance> = Vec::with_capacity(3);

    if let Some(old_parent) = child_card.attached_to {
        if let Ok(old) = registry.get(old_parent) {
            let mut old = old.clone();
            old.attached_cards.retain(|id| *id != child);
            updates.push(old);
        }
    }

    let mut parent_card = registry.get(parent)?.clone();
    if !parent_card.attached_cards.contains(&child) {
        parent_card.attached_cards.push(child);
    }

    let mut child_card = child_card;
    child_card.attached_to = Some(parent);
    child_card.position = parent_card.position;

    for id in descendants(registry, child) {
        let mut card = registry.get(id)?.clone();
        card.position = parent_card.position;
        updates.push(card);
    }

    updates.push(parent_card);
    updates.push(child_card);

    for card in updates {
        registry.replace(card)?;
    }
    Ok(())
}

/// Detach `child` from its parent
///
/// Returns `false` when the card was not attached (nothing to do). The child keeps
/// whatever cell the parent last gave it.
pub fn detach(registry: &mut CardRegistry, child: InstanceId) -> Result<bool> {
    let mut child_card = registry.get(child)?.clone();
    let Some(parent) = child_card.attached_to.take() else {
        return Ok(false);
    };

    if let Ok(parent_card) = registry.get(parent) {
        let mut parent_card = parent_card.clone();
        parent_card.attached_cards.retain(|id| *id != child);
        registry.replace(parent_card)?;
    }
    registry.replace(child_card)?;
    Ok(true)
}

/// Detach every card attached to `parent`, returning the freed children
pub fn detach_children(registry: &mut CardRegistry, parent: InstanceId) -> Result<Vec<InstanceId>> {
    let children: Vec<InstanceId> = registry.get(parent)?.attached_cards.to_vec();
    for &child in &children {
        detach(registry, child)?;
    }
    Ok(children)
}

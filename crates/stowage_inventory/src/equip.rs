//! Equip state machine
//!
//! An item transitions between stowed and one of three equipped
//! representations: a cosmetic model, a live part attached visually, or
//! a live part with full physics. Live representations are created
//! asynchronously by the host; between the spawn request and its
//! completion callback the state carries a pending phase that other
//! operations must tolerate or defer to.

use crate::container::{Inventory, InventoryEvent};
use crate::host::{AnchorHandle, GameHost, ModelHandle, PartHandle, Pose};
use glam::Vec3;
use stowage_part::EquipMode;
use thiserror::Error;

/// Ticks a pending spawn may stay unanswered before the equip is
/// abandoned and rolled back
pub const SPAWN_TIMEOUT_TICKS: u64 = 600;

/// Source of an equip/stack/drop action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// Code logic triggered the action
    Api,
    /// The player triggered the action through the GUI
    Player,
    /// A physics effect triggered the action
    Physics,
}

/// Which live representation a part-backed equip uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveMode {
    /// Attached visually, colliders are triggers, pose driven externally
    Part,
    /// Fully physics-simulated
    Physic,
}

/// Progress of an asynchronous part spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPhase {
    /// Requested, completion callback not yet delivered
    Pending { issued_tick: u64 },
    /// Instance finalized
    Ready,
}

/// Transient equip representation of an item
///
/// Never persisted; a loaded item always starts stowed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EquipState {
    /// Not equipped
    #[default]
    Stowed,
    /// Cosmetic model instance following an anchor bone
    Model {
        model: ModelHandle,
        anchor: AnchorHandle,
    },
    /// Live part instance
    Live {
        mode: LiveMode,
        part: PartHandle,
        anchor: AnchorHandle,
        phase: SpawnPhase,
    },
}

impl EquipState {
    /// Whether no representation exists
    pub fn is_stowed(&self) -> bool {
        matches!(self, Self::Stowed)
    }

    /// Anchor bone of the active representation
    pub fn anchor(&self) -> Option<AnchorHandle> {
        match self {
            Self::Stowed => None,
            Self::Model { anchor, .. } | Self::Live { anchor, .. } => Some(*anchor),
        }
    }

    /// Live part handle, when a part-backed representation exists
    pub fn live_part(&self) -> Option<PartHandle> {
        match self {
            Self::Live { part, .. } => Some(*part),
            _ => None,
        }
    }

    /// Whether a spawn request is still waiting for its callback
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::Live {
                phase: SpawnPhase::Pending { .. },
                ..
            }
        )
    }
}

/// Equip preconditions that can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    /// No item in the slot
    #[error("no item in slot {0}")]
    EmptySlot(u32),
    /// The item has no behavior descriptor
    #[error("item has no behavior descriptor")]
    NoBehavior,
    /// The container kind does not support equipping
    #[error("container does not support equipping")]
    UnsupportedContainer,
    /// Equipping requires a singleton stack
    #[error("cannot equip a stacked item")]
    Stacked,
    /// No crew member has the required skill
    #[error("required skill {0} not present in crew")]
    MissingSkill(String),
    /// The named equip slot is taken by a carried item
    #[error("equip slot {0} is occupied")]
    SlotOccupied(String),
    /// The anchor bone was not found on the wearer
    #[error("anchor bone not found on wearer")]
    AnchorNotFound,
}

impl Inventory {
    /// Equip the item in `slot`
    ///
    /// Precondition failures notify the player only when the player
    /// triggered the action; programmatic attempts fail silently.
    pub fn equip(
        &mut self,
        slot: u32,
        actor: Actor,
        host: &mut dyn GameHost,
    ) -> Result<(), EquipError> {
        use crate::container::ContainerKind;

        let (behavior, part, quantity, equip_slot) = {
            let item = self.items.get(&slot).ok_or(EquipError::EmptySlot(slot))?;
            (
                item.behavior(),
                item.part().clone(),
                item.quantity(),
                item.equip_slot.clone(),
            )
        };
        let Some(behavior) = behavior else {
            log::warn!("Cannot equip {}: no behavior descriptor", part.title);
            return Err(EquipError::NoBehavior);
        };
        if self.kind != ContainerKind::Wearer {
            log::warn!("Cannot equip item from container kind {:?}", self.kind);
            return Err(EquipError::UnsupportedContainer);
        }
        if quantity > 1 {
            if actor == Actor::Player {
                host.notify("Cannot equip stacked items");
                host.beep_wrong();
            }
            return Err(EquipError::Stacked);
        }
        log::info!("Equip item {} in mode {:?}", part.title, behavior.equip_mode());

        if host.game_mode().skill_checks_enabled() {
            if let Some(skill) = behavior.equip_skill() {
                if !self.crew.iter().any(|member| member.has_skill(skill)) {
                    if actor == Actor::Player {
                        host.notify(&format!(
                            "This item can only be used by a crew member with the skill: {skill}"
                        ));
                        host.beep_wrong();
                    }
                    return Err(EquipError::MissingSkill(skill.to_string()));
                }
            }
        }

        if let Some(slot_name) = equip_slot.as_deref() {
            if let Some(occupant_slot) = self.equipped_item_in(slot_name) {
                if occupant_slot != slot {
                    let (occ_carriable, occ_title) = match self.items.get(&occupant_slot) {
                        Some(occ) => (occ.carriable, occ.part().title.clone()),
                        None => (false, String::new()),
                    };
                    if occ_carriable && actor == Actor::Player {
                        host.notify(&format!(
                            "Cannot equip item, slot <{slot_name}> already used for carrying {occ_title}"
                        ));
                        host.beep_wrong();
                        return Err(EquipError::SlotOccupied(slot_name.to_string()));
                    }
                    self.unequip(occupant_slot, Actor::Api, host);
                }
            }
        }

        let anchor_spec = behavior.anchor();
        let state = match behavior.equip_mode() {
            EquipMode::Model => {
                let model = host.spawn_model(&part);
                match host.find_anchor(&anchor_spec.mesh, &anchor_spec.bone) {
                    Some(anchor) => EquipState::Model { model, anchor },
                    None => {
                        log::error!("Anchor bone {}/{} not found on wearer", anchor_spec.mesh, anchor_spec.bone);
                        host.destroy_model(model);
                        return Err(EquipError::AnchorNotFound);
                    }
                }
            }
            mode @ (EquipMode::Part | EquipMode::Physic) => {
                let live = match mode {
                    EquipMode::Physic => LiveMode::Physic,
                    _ => LiveMode::Part,
                };
                let Some(anchor) = host.find_anchor(&anchor_spec.mesh, &anchor_spec.bone) else {
                    log::error!("Anchor bone {}/{} not found on wearer", anchor_spec.mesh, anchor_spec.bone);
                    return Err(EquipError::AnchorNotFound);
                };
                if let Some(existing) = host.find_attached_part(&part.name) {
                    log::info!("Part {} already attached to wearer, adopting it", part.name);
                    if live == LiveMode::Part {
                        host.set_colliders_trigger(existing);
                    }
                    EquipState::Live {
                        mode: live,
                        part: existing,
                        anchor,
                        phase: SpawnPhase::Ready,
                    }
                } else {
                    let pose = host.anchor_pose(
                        anchor,
                        behavior.equip_position(),
                        behavior.equip_direction(),
                    );
                    let node = &self.items.get(&slot).ok_or(EquipError::EmptySlot(slot))?.node;
                    let handle = host.spawn_attached_part(node, pose, live != LiveMode::Physic);
                    EquipState::Live {
                        mode: live,
                        part: handle,
                        anchor,
                        phase: SpawnPhase::Pending {
                            issued_tick: host.tick(),
                        },
                    }
                }
            }
        };

        if behavior.remove_helmet() {
            self.set_helmet(host, false);
        }
        if actor == Actor::Player {
            if let Some(sound) = behavior.move_sound() {
                host.play_sound(sound);
            }
        }
        let Some(item) = self.items.get_mut(&slot) else {
            return Err(EquipError::EmptySlot(slot));
        };
        item.equipped = true;
        item.equip = state;
        behavior.on_equip(item.behavior_ctx());
        self.events.push(InventoryEvent::ItemEquipped { slot });
        Ok(())
    }

    /// Unequip the item in `slot`
    pub fn unequip(&mut self, slot: u32, actor: Actor, host: &mut dyn GameHost) {
        let (behavior, state, title) = {
            let Some(item) = self.items.get_mut(&slot) else {
                return;
            };
            let Some(behavior) = item.behavior() else {
                return;
            };
            // Cleared before teardown so handlers reacting to the
            // destruction already see the item as stowed.
            item.equipped = false;
            (behavior, std::mem::take(&mut item.equip), item.part().title.clone())
        };

        match state {
            EquipState::Stowed => {}
            EquipState::Model { model, .. } => {
                host.destroy_model(model);
                if behavior.remove_helmet() {
                    self.set_helmet(host, true);
                }
            }
            EquipState::Live { part, .. } => {
                log::info!("Sync payload node of equipped part: {title}");
                let snapshot = host.snapshot_part(part);
                if let Some(item) = self.items.get_mut(&slot) {
                    item.adopt_payload(snapshot.node);
                }
                host.destroy_part(part);
            }
        }

        if actor == Actor::Player {
            if let Some(sound) = behavior.move_sound() {
                host.play_sound(sound);
            }
        }
        if let Some(item) = self.items.get_mut(&slot) {
            behavior.on_unequip(item.behavior_ctx());
        }
        self.events.push(InventoryEvent::ItemUnequipped { slot });
    }

    /// Rebuild the equipped representation of `slot`
    ///
    /// Used after the underlying configuration changed.
    pub fn reequip(&mut self, slot: u32, host: &mut dyn GameHost) {
        if self.items.get(&slot).is_some_and(|item| item.equipped) {
            self.unequip(slot, Actor::Api, host);
            if let Err(err) = self.equip(slot, Actor::Api, host) {
                log::warn!("Re-equip of slot {slot} failed: {err}");
            }
        }
    }

    /// Completion callback for an asynchronous part spawn
    pub fn notify_spawn_ready(&mut self, slot: u32, ready: PartHandle, host: &mut dyn GameHost) {
        let Some(item) = self.items.get_mut(&slot) else {
            return;
        };
        if let EquipState::Live { mode, part, phase, .. } = &mut item.equip {
            if *part == ready {
                *phase = SpawnPhase::Ready;
                if *mode == LiveMode::Part {
                    // The wearer's orientation is driven externally, not by
                    // physics; a solid collider would hand an insane impulse
                    // to anything it touches.
                    host.set_colliders_trigger(ready);
                }
            }
        }
    }

    /// Per-tick update of every record
    ///
    /// Drives equipped representations after their anchor, abandons
    /// spawns whose completion callback never arrived, and dispatches
    /// behavior updates.
    pub fn update(&mut self, host: &mut dyn GameHost) {
        let slots: Vec<u32> = self.items.keys().copied().collect();
        for slot in slots {
            let Some(item) = self.items.get_mut(&slot) else {
                continue;
            };
            let Some(behavior) = item.behavior() else {
                continue;
            };
            match item.equip {
                EquipState::Model { model, anchor } => {
                    let pose = host.anchor_pose(
                        anchor,
                        behavior.equip_position(),
                        behavior.equip_direction(),
                    );
                    host.set_model_pose(model, pose);
                }
                EquipState::Live {
                    mode: LiveMode::Part,
                    part,
                    anchor,
                    phase: SpawnPhase::Ready,
                } => {
                    let pose = host.anchor_pose(
                        anchor,
                        behavior.equip_position(),
                        behavior.equip_direction(),
                    );
                    host.set_part_pose(part, pose);
                }
                EquipState::Live {
                    phase: SpawnPhase::Pending { issued_tick },
                    ..
                } if host.tick().saturating_sub(issued_tick) > SPAWN_TIMEOUT_TICKS => {
                    log::warn!(
                        "Spawn of equipped {} never completed, abandoning equip",
                        item.part().name
                    );
                    item.equipped = false;
                    item.equip = EquipState::Stowed;
                }
                _ => {}
            }
            behavior.on_update(item.behavior_ctx());
        }
    }

    /// Per-frame GUI hook for every record
    pub fn gui_update(&mut self) {
        for item in self.items.values_mut() {
            item.gui_update();
        }
    }

    /// Drop one unit of `slot` into the world
    ///
    /// The free-standing instance spawns at the equip anchor when one
    /// exists, otherwise one length unit above the carrier.
    pub fn drop_item(&mut self, slot: u32, host: &mut dyn GameHost) -> bool {
        let Some(item) = self.items.get(&slot) else {
            return false;
        };
        if item.equip.is_pending() {
            log::warn!(
                "Equipped part of {} still spawning, drop deferred",
                item.part().name
            );
            return false;
        }
        log::info!("Drop item {}", item.part().name);
        let pose = match (item.behavior(), item.equip.anchor()) {
            (Some(behavior), Some(anchor)) => host.anchor_pose(
                anchor,
                behavior.equip_position(),
                behavior.equip_direction(),
            ),
            _ => {
                let carrier = host.carrier_pose();
                Pose::new(carrier.position + Vec3::Y, carrier.rotation)
            }
        };
        host.spawn_free_part(&item.node, pose);
        self.stack_remove(slot, 1, host);
        true
    }
}

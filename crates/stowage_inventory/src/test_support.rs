//! Shared fixtures for the crate's unit tests

use crate::host::{
    AnchorHandle, GameHost, GameMode, ModelHandle, PartHandle, PartSnapshot, Pose,
};
use glam::{Quat, Vec3};
use std::collections::HashMap;
use stowage_node::Node;
use stowage_part::{
    AnchorSpec, EquipMode, GameData, ItemBehavior, PartCatalog, PartDefinition,
    ResourceDefinition, ResourceTable, ShortcutAction, StackableConfig,
};

/// Catalog with a plain tool, a resource tank and two equipable lamps
pub fn game_data() -> GameData {
    let mut parts = PartCatalog::new();
    parts.register(
        PartDefinition::new("wrench", "Wrench")
            .with_cost(150.0)
            .with_mass(0.005)
            .with_volume(4.0),
    );
    let mut tank_template = Node::new("PART");
    let res = tank_template.add_node("RESOURCE");
    res.add_value("name", "Oxygen");
    res.add_value("amount", 120.5);
    res.add_value("maxAmount", 200.0);
    parts.register(
        PartDefinition::new("oxygenTank", "Oxygen Tank")
            .with_cost(100.0)
            .with_mass(0.05)
            .with_volume(40.0)
            .with_template(tank_template),
    );
    parts.register(
        PartDefinition::new("helmetLamp", "Helmet Lamp")
            .with_cost(80.0)
            .with_mass(0.01)
            .with_volume(2.0)
            .with_module("ItemLamp"),
    );
    parts.register(
        PartDefinition::new("screwdriver", "Screwdriver")
            .with_cost(60.0)
            .with_mass(0.004)
            .with_volume(3.0)
            .with_module("ItemTool"),
    );

    let mut resources = ResourceTable::new();
    resources.register(ResourceDefinition::new("Oxygen", 2.0, 0.001));

    GameData {
        parts,
        resources,
        stacking: StackableConfig::new(),
    }
}

/// Pristine world capture of a part, payload taken from its template
pub fn snapshot_of(part: &PartDefinition) -> PartSnapshot {
    PartSnapshot {
        part_name: part.name.clone(),
        node: part.template.clone(),
        resource_mass: 0.0,
        content: None,
    }
}

/// Behavior descriptor with every knob settable per test
pub struct TestBehavior {
    pub mode: EquipMode,
    pub equipable: bool,
    pub carriable: bool,
    pub slot: Option<&'static str>,
    pub skill: Option<&'static str>,
    pub mesh: &'static str,
    pub bone: &'static str,
    pub remove_helmet: bool,
    pub sound: Option<&'static str>,
    pub shortcut: ShortcutAction,
}

impl Default for TestBehavior {
    fn default() -> Self {
        Self {
            mode: EquipMode::Model,
            equipable: true,
            carriable: false,
            slot: None,
            skill: None,
            mesh: "suitMesh",
            bone: "head",
            remove_helmet: false,
            sound: None,
            shortcut: ShortcutAction::Equip,
        }
    }
}

impl ItemBehavior for TestBehavior {
    fn equip_mode(&self) -> EquipMode {
        self.mode
    }

    fn equipable(&self) -> bool {
        self.equipable
    }

    fn carriable(&self) -> bool {
        self.carriable
    }

    fn equip_slot(&self) -> Option<&str> {
        self.slot
    }

    fn equip_skill(&self) -> Option<&str> {
        self.skill
    }

    fn anchor(&self) -> AnchorSpec {
        AnchorSpec {
            mesh: self.mesh.to_string(),
            bone: self.bone.to_string(),
        }
    }

    fn remove_helmet(&self) -> bool {
        self.remove_helmet
    }

    fn move_sound(&self) -> Option<&str> {
        self.sound
    }

    fn shortcut(&self) -> ShortcutAction {
        self.shortcut
    }
}

/// Recording host double
pub struct MockHost {
    pub mode: GameMode,
    pub flight: bool,
    pub now: u64,
    pub missing_anchor: bool,
    pub attached_part: Option<(String, PartHandle)>,
    pub notices: Vec<String>,
    pub beeps: u32,
    pub sounds: Vec<String>,
    pub helmet_calls: Vec<bool>,
    pub spawned_models: Vec<ModelHandle>,
    pub destroyed_models: Vec<ModelHandle>,
    pub model_poses: Vec<(ModelHandle, Pose)>,
    pub spawned_parts: Vec<(PartHandle, Node, Pose, bool)>,
    pub free_parts: Vec<(Node, Pose)>,
    pub snapshots: HashMap<u64, PartSnapshot>,
    pub destroyed_parts: Vec<PartHandle>,
    pub trigger_parts: Vec<PartHandle>,
    pub part_poses: Vec<(PartHandle, Pose)>,
    next_handle: u64,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            mode: GameMode::Sandbox,
            flight: true,
            now: 0,
            missing_anchor: false,
            attached_part: None,
            notices: Vec::new(),
            beeps: 0,
            sounds: Vec::new(),
            helmet_calls: Vec::new(),
            spawned_models: Vec::new(),
            destroyed_models: Vec::new(),
            model_poses: Vec::new(),
            spawned_parts: Vec::new(),
            free_parts: Vec::new(),
            snapshots: HashMap::new(),
            destroyed_parts: Vec::new(),
            trigger_parts: Vec::new(),
            part_poses: Vec::new(),
            next_handle: 100,
        }
    }

    pub fn career() -> Self {
        Self {
            mode: GameMode::Career,
            ..Self::new()
        }
    }

    pub fn last_spawned_part(&self) -> PartHandle {
        self.spawned_parts.last().expect("a part spawn was requested").0
    }
}

impl GameHost for MockHost {
    fn game_mode(&self) -> GameMode {
        self.mode
    }

    fn in_flight(&self) -> bool {
        self.flight
    }

    fn tick(&self) -> u64 {
        self.now
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn beep_wrong(&mut self) {
        self.beeps += 1;
    }

    fn play_sound(&mut self, path: &str) {
        self.sounds.push(path.to_string());
    }

    fn find_anchor(&self, _mesh: &str, _bone: &str) -> Option<AnchorHandle> {
        if self.missing_anchor {
            None
        } else {
            Some(AnchorHandle::from_raw(1))
        }
    }

    fn anchor_pose(&self, _anchor: AnchorHandle, position: Vec3, _direction: Vec3) -> Pose {
        Pose::new(position, Quat::IDENTITY)
    }

    fn carrier_pose(&self) -> Pose {
        Pose::IDENTITY
    }

    fn set_helmet(&mut self, visible: bool) {
        self.helmet_calls.push(visible);
    }

    fn spawn_model(&mut self, _part: &PartDefinition) -> ModelHandle {
        self.next_handle += 1;
        let handle = ModelHandle::from_raw(self.next_handle);
        self.spawned_models.push(handle);
        handle
    }

    fn set_model_pose(&mut self, model: ModelHandle, pose: Pose) {
        self.model_poses.push((model, pose));
    }

    fn destroy_model(&mut self, model: ModelHandle) {
        self.destroyed_models.push(model);
    }

    fn find_attached_part(&self, part_name: &str) -> Option<PartHandle> {
        match &self.attached_part {
            Some((name, handle)) if name == part_name => Some(*handle),
            _ => None,
        }
    }

    fn spawn_attached_part(&mut self, node: &Node, pose: Pose, physicsless: bool) -> PartHandle {
        self.next_handle += 1;
        let handle = PartHandle::from_raw(self.next_handle);
        self.spawned_parts.push((handle, node.clone(), pose, physicsless));
        handle
    }

    fn spawn_free_part(&mut self, node: &Node, pose: Pose) {
        self.free_parts.push((node.clone(), pose));
    }

    fn snapshot_part(&self, part: PartHandle) -> PartSnapshot {
        self.snapshots.get(&part.raw()).cloned().unwrap_or(PartSnapshot {
            part_name: String::new(),
            node: Node::new("PART"),
            resource_mass: 0.0,
            content: None,
        })
    }

    fn set_part_pose(&mut self, part: PartHandle, pose: Pose) {
        self.part_poses.push((part, pose));
    }

    fn set_colliders_trigger(&mut self, part: PartHandle) {
        self.trigger_parts.push(part);
    }

    fn destroy_part(&mut self, part: PartHandle) {
        self.destroyed_parts.push(part);
    }
}

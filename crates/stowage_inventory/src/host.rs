//! Host engine collaborator contract
//!
//! Everything the inventory core needs from the engine side - screen
//! notices, sounds, skeleton lookups, world-object instantiation - goes
//! through [`GameHost`]. World objects are referenced by opaque handles;
//! the core never touches scene state directly.

use glam::{Quat, Vec3};
use stowage_node::Node;
use stowage_part::PartDefinition;

/// Handle to a detached cosmetic model instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(u64);

impl ModelHandle {
    /// Create from a raw host identifier
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw host identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle to a live part instance in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartHandle(u64);

impl PartHandle {
    /// Create from a raw host identifier
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw host identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle to a bone on the wearer's skinned mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(u64);

impl AnchorHandle {
    /// Create from a raw host identifier
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw host identifier
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A world position and orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// Origin with no rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a pose
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

/// Current game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Unrestricted play
    Sandbox,
    /// Sandbox with science collection
    ScienceSandbox,
    /// Progression play with crew skills
    Career,
}

impl GameMode {
    /// Whether crew skill gating applies in this mode
    pub fn skill_checks_enabled(&self) -> bool {
        matches!(self, Self::Career)
    }
}

/// Aggregates of a nested container found on a captured part
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentInfo {
    /// Mass contributed by the container's content, in tons
    pub mass: f32,
    /// Cost contributed by the container's content
    pub cost: f32,
    /// Container display name, empty when unnamed
    pub name: String,
}

/// Configuration capture of a live part, taken by the host
#[derive(Debug, Clone)]
pub struct PartSnapshot {
    /// Part name, resolvable through the catalog
    pub part_name: String,
    /// Full serialized configuration of the instance
    pub node: Node,
    /// Mass of the resources currently aboard, in tons
    pub resource_mass: f32,
    /// Nested container aggregates, when the part hosts one
    pub content: Option<ContentInfo>,
}

/// Engine services consumed by the inventory core
///
/// All calls are synchronous except [`spawn_attached_part`], whose
/// completion the host signals on a later tick through
/// [`crate::Inventory::notify_spawn_ready`].
///
/// [`spawn_attached_part`]: GameHost::spawn_attached_part
pub trait GameHost {
    /// Current game mode
    fn game_mode(&self) -> GameMode;

    /// Whether the active scene is flight
    fn in_flight(&self) -> bool;

    /// Current main-loop tick
    fn tick(&self) -> u64;

    /// Show a priority screen message to the player
    fn notify(&mut self, message: &str);

    /// Play the rejected-action beep
    fn beep_wrong(&mut self);

    /// Play a sound by path
    fn play_sound(&mut self, path: &str);

    /// Find a bone by exact mesh and bone name on the wearer's skinned mesh
    fn find_anchor(&self, mesh: &str, bone: &str) -> Option<AnchorHandle>;

    /// World pose of `anchor` offset by a local position and euler rotation
    fn anchor_pose(&self, anchor: AnchorHandle, position: Vec3, direction: Vec3) -> Pose;

    /// World pose of the carrying entity
    fn carrier_pose(&self) -> Pose;

    /// Show or hide the wearer's helmet
    fn set_helmet(&mut self, visible: bool);

    /// Instantiate a detached copy of the part's visual model with all
    /// collision geometry stripped
    fn spawn_model(&mut self, part: &PartDefinition) -> ModelHandle;

    /// Move a cosmetic model instance
    fn set_model_pose(&mut self, model: ModelHandle, pose: Pose);

    /// Destroy a cosmetic model instance
    fn destroy_model(&mut self, model: ModelHandle);

    /// Find a child part of the given type already attached to the wearer
    fn find_attached_part(&self, part_name: &str) -> Option<PartHandle>;

    /// Request creation of a live part attached to the wearer
    ///
    /// Returns the handle immediately; the instance is only half
    /// initialized until the host reports completion on a later tick.
    fn spawn_attached_part(&mut self, node: &Node, pose: Pose, physicsless: bool) -> PartHandle;

    /// Create a free-standing part in the world from a serialized payload
    fn spawn_free_part(&mut self, node: &Node, pose: Pose);

    /// Capture the current configuration of a live part
    fn snapshot_part(&self, part: PartHandle) -> PartSnapshot;

    /// Move a live part driven externally rather than by physics
    fn set_part_pose(&mut self, part: PartHandle, pose: Pose);

    /// Mark all colliders of a live part as non-colliding triggers
    fn set_colliders_trigger(&mut self, part: PartHandle);

    /// Destroy a live part instance
    fn destroy_part(&mut self, part: PartHandle);
}

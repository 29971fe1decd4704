//! Collaborators the battle controllers drive but do not own.
//!
//! Drawing, asset lookup and audio live in the embedding scene. Controllers
//! only start animations and sounds through these traits and read back
//! animation progress once per tick.

use battle_core::{BattleSide, UnitAttackType, UnitId, UnitTypeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoundHandle(pub u64);

/// Which way a unit sprite faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleDirection {
    /// Facing the viewer (defending squad).
    Face,
    /// Back to the viewer (attacking squad).
    Back,
}

impl BattleDirection {
    pub const fn of(side: BattleSide) -> Self {
        match side {
            BattleSide::Attacker => Self::Back,
            BattleSide::Defender => Self::Face,
        }
    }
}

/// Animation set of a battle unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleUnitAction {
    Waiting,
    Attack,
    Death,
}

/// Where an overlay animation is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationAnchor {
    Unit(UnitId),
    Squad(BattleSide),
}

/// Frame set resolved by the resource provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationClip {
    /// Host-side key of the frame data.
    pub key: String,
    pub frame_count: usize,
    /// Frame at which the attack sound starts.
    pub sound_frame: Option<usize>,
    /// Frame at which the attack lands.
    pub impact_frame: Option<usize>,
}

impl AnimationClip {
    pub fn new(key: impl Into<String>, frame_count: usize) -> Self {
        Self {
            key: key.into(),
            frame_count,
            sound_frame: None,
            impact_frame: None,
        }
    }

    pub fn with_sound_frame(mut self, frame: usize) -> Self {
        self.sound_frame = Some(frame);
        self
    }

    pub fn with_impact_frame(mut self, frame: usize) -> Self {
        self.impact_frame = Some(frame);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundClip {
    pub key: String,
}

impl SoundClip {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Read side of the animation host, polled by the action container.
pub trait AnimationProgress {
    /// Current frame, `None` if the handle is unknown.
    fn frame_index(&self, animation: AnimationHandle) -> Option<usize>;

    fn is_animation_completed(&self, animation: AnimationHandle) -> bool;
}

pub trait AnimationHost: AnimationProgress {
    /// Spawns a free-standing animation, e.g. an attack overlay.
    fn add_animation(&mut self, clip: &AnimationClip, anchor: AnimationAnchor, looped: bool) -> AnimationHandle;

    /// Replaces the animation a battle unit plays.
    fn set_unit_animation(&mut self, unit: UnitId, clip: &AnimationClip) -> AnimationHandle;

    fn remove_animation(&mut self, animation: AnimationHandle);
}

/// Asset lookup for battle units and attack types.
pub trait BattleResourceProvider {
    fn unit_animation(
        &self,
        unit_type: &UnitTypeId,
        direction: BattleDirection,
        action: BattleUnitAction,
    ) -> Option<AnimationClip>;

    fn unit_sound(&self, unit_type: &UnitTypeId, action: BattleUnitAction) -> Option<SoundClip>;

    /// Overlay drawn on each target of an attack type, if any.
    fn attack_type_animation(&self, attack_type: UnitAttackType) -> Option<AnimationClip>;

    fn attack_type_sound(&self, attack_type: UnitAttackType) -> Option<SoundClip>;
}

pub trait SoundController {
    fn play_sound(&mut self, sound: &SoundClip) -> SoundHandle;

    fn stop(&mut self, sound: SoundHandle);

    fn is_completed(&self, sound: SoundHandle) -> bool;
}

//! Fake host, assets and sound for driving controllers tick by tick.

#![allow(dead_code)]

use std::collections::HashMap;

use battle_core::{
    BattleConfig, BattleContext, BattleEnv, BattleProcessor, BattleSide, BattleTimings, ScriptedRng,
    SquadPosition, UnitAttackType, UnitId, UnitType, UnitTypeCatalog, UnitTypeId, UnitTypeOracle,
};
use battle_runtime::{
    AnimationAnchor, AnimationClip, AnimationHandle, AnimationHost, AnimationProgress, BattleDirection,
    BattleEvent, BattleEventQueue, BattleResourceProvider, BattleUnitAction, BattleUnitActionController,
    ControllerContext, ControllerResult, SoundClip, SoundController, SoundHandle,
};

pub const ATTACK_FRAMES: usize = 6;
pub const SOUND_FRAME: usize = 2;
pub const IMPACT_FRAME: usize = 4;

#[derive(Debug)]
struct Playing {
    key: String,
    frame: usize,
    frame_count: usize,
    looped: bool,
}

/// Advances every animation by one frame per tick.
#[derive(Debug, Default)]
pub struct FakeHost {
    next: u64,
    playing: HashMap<AnimationHandle, Playing>,
    pub unit_animations: HashMap<UnitId, String>,
    pub overlays: Vec<(String, AnimationAnchor)>,
    pub removed: Vec<AnimationHandle>,
}

impl FakeHost {
    pub fn advance(&mut self) {
        for animation in self.playing.values_mut() {
            animation.frame += 1;
            if animation.looped {
                animation.frame %= animation.frame_count.max(1);
            }
        }
    }

    pub fn live_overlays(&self) -> usize {
        self.overlays.len() - self.removed.len()
    }

    fn start(&mut self, clip: &AnimationClip, looped: bool) -> AnimationHandle {
        self.next += 1;
        let handle = AnimationHandle(self.next);
        self.playing.insert(
            handle,
            Playing {
                key: clip.key.clone(),
                frame: 0,
                frame_count: clip.frame_count,
                looped,
            },
        );
        handle
    }
}

impl AnimationProgress for FakeHost {
    fn frame_index(&self, animation: AnimationHandle) -> Option<usize> {
        self.playing
            .get(&animation)
            .map(|playing| playing.frame.min(playing.frame_count.saturating_sub(1)))
    }

    fn is_animation_completed(&self, animation: AnimationHandle) -> bool {
        self.playing
            .get(&animation)
            .is_some_and(|playing| !playing.looped && playing.frame >= playing.frame_count)
    }
}

impl AnimationHost for FakeHost {
    fn add_animation(&mut self, clip: &AnimationClip, anchor: AnimationAnchor, looped: bool) -> AnimationHandle {
        self.overlays.push((clip.key.clone(), anchor));
        self.start(clip, looped)
    }

    fn set_unit_animation(&mut self, unit: UnitId, clip: &AnimationClip) -> AnimationHandle {
        self.unit_animations.insert(unit, clip.key.clone());
        let looped = clip.key.ends_with("/waiting");
        self.start(clip, looped)
    }

    fn remove_animation(&mut self, animation: AnimationHandle) {
        if self.playing.remove(&animation).is_some() {
            self.removed.push(animation);
        }
    }
}

/// Every unit type has every animation; only poison has an overlay.
#[derive(Debug, Default)]
pub struct FakeResources {
    pub silent: bool,
}

impl BattleResourceProvider for FakeResources {
    fn unit_animation(
        &self,
        unit_type: &UnitTypeId,
        _direction: BattleDirection,
        action: BattleUnitAction,
    ) -> Option<AnimationClip> {
        let clip = match action {
            BattleUnitAction::Waiting => AnimationClip::new(format!("{unit_type}/waiting"), 4),
            BattleUnitAction::Attack => AnimationClip::new(format!("{unit_type}/attack"), ATTACK_FRAMES)
                .with_sound_frame(SOUND_FRAME)
                .with_impact_frame(IMPACT_FRAME),
            BattleUnitAction::Death => AnimationClip::new(format!("{unit_type}/death"), 5),
        };
        Some(clip)
    }

    fn unit_sound(&self, unit_type: &UnitTypeId, action: BattleUnitAction) -> Option<SoundClip> {
        (!self.silent).then(|| SoundClip::new(format!("{unit_type}/{action:?}")))
    }

    fn attack_type_animation(&self, attack_type: UnitAttackType) -> Option<AnimationClip> {
        (attack_type == UnitAttackType::Poison).then(|| AnimationClip::new("overlay/poison", 3))
    }

    fn attack_type_sound(&self, _attack_type: UnitAttackType) -> Option<SoundClip> {
        None
    }
}

#[derive(Debug, Default)]
pub struct FakeSounds {
    next: u64,
    pub played: Vec<String>,
}

impl SoundController for FakeSounds {
    fn play_sound(&mut self, sound: &SoundClip) -> SoundHandle {
        self.next += 1;
        self.played.push(sound.key.clone());
        SoundHandle(self.next)
    }

    fn stop(&mut self, _sound: SoundHandle) {}

    fn is_completed(&self, _sound: SoundHandle) -> bool {
        true
    }
}

pub fn timings() -> BattleTimings {
    BattleTimings {
        processor_delay: 3,
        after_processor_delay: 1,
        instant_action_delay: 2,
    }
}

/// A battle plus everything the controllers talk to.
pub struct Stage {
    pub config: BattleConfig,
    pub catalog: UnitTypeCatalog,
    pub battle: BattleContext,
    pub processor: BattleProcessor,
    pub rng: ScriptedRng,
    pub host: FakeHost,
    pub resources: FakeResources,
    pub sounds: FakeSounds,
    pub events: BattleEventQueue,
}

impl Stage {
    pub fn new(types: impl IntoIterator<Item = UnitType>) -> Self {
        Self::with_catalog(types.into_iter().collect())
    }

    pub fn with_catalog(catalog: UnitTypeCatalog) -> Self {
        init_tracing();
        Self {
            config: BattleConfig::default().with_timings(timings()),
            catalog,
            battle: BattleContext::new(),
            processor: BattleProcessor::new(),
            rng: ScriptedRng::constant(0),
            host: FakeHost::default(),
            resources: FakeResources::default(),
            sounds: FakeSounds::default(),
            events: BattleEventQueue::new(),
        }
    }

    pub fn place(&mut self, id: &str, side: BattleSide, position: SquadPosition) -> UnitId {
        let unit_type = self
            .catalog
            .unit_type(&UnitTypeId::new(id))
            .expect("unit type registered");
        self.battle.add_unit(unit_type, side, position)
    }

    pub fn start_round(&mut self) -> Option<UnitId> {
        let env = BattleEnv::new(&self.config, &self.catalog);
        self.battle.start_round(&mut self.rng, &env)
    }

    pub fn ctx(&mut self) -> ControllerContext<'_> {
        ControllerContext {
            battle: &mut self.battle,
            env: BattleEnv::new(&self.config, &self.catalog),
            processor: &self.processor,
            rng: &mut self.rng,
            host: &mut self.host,
            resources: &self.resources,
            sounds: &mut self.sounds,
            events: &mut self.events,
        }
    }

    pub fn initialize(&mut self, controller: &mut impl BattleUnitActionController) -> ControllerResult<()> {
        let mut ctx = self.ctx();
        controller.initialize(&mut ctx)
    }

    /// One scene frame: the host animates, then the controller updates.
    pub fn tick(&mut self, controller: &mut impl BattleUnitActionController) -> ControllerResult<()> {
        self.host.advance();
        let mut ctx = self.ctx();
        controller.before_scene_update(&mut ctx, 1)?;
        controller.after_scene_update(&mut ctx)
    }

    /// Initializes the controller and ticks it to completion. Returns the
    /// number of ticks it took.
    pub fn drive(&mut self, controller: &mut impl BattleUnitActionController) -> ControllerResult<u32> {
        self.initialize(controller)?;
        let mut ticks = 0;
        while !controller.is_completed() {
            assert!(ticks < 500, "controller never completed");
            self.tick(controller)?;
            ticks += 1;
        }
        Ok(ticks)
    }

    pub fn take_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain().collect()
    }

    pub fn hit_points(&self, unit: UnitId) -> u32 {
        self.battle.unit(unit).expect("unit exists").hit_points()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

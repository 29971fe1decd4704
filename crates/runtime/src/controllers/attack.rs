use battle_core::{
    AttackResolution, AttackTarget, BattleError, CalculatedAttackResult, UnitActionProcessor, UnitAttackType,
    UnitId,
};

use super::sequencer::{add_processor_action, handle_processor_step};
use super::{ActionStep, BattleUnitActionController, ControllerContext};
use crate::error::{ControllerError, ControllerResult};
use crate::host::{AnimationAnchor, BattleUnitAction};
use crate::scheduler::{ActionTrigger, BattleActionContainer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttackStage {
    /// Waiting for the attacker animation to reach its impact frame.
    Animating,
    /// Main attack results are being applied.
    PrimaryWave,
    /// Secondary attack results are being applied.
    SecondaryWave,
    Done,
}

/// Plays the acting unit's attack and applies its results.
///
/// The attack sound starts at the animation's sound frame and the attack is
/// resolved at its impact frame. Results are applied as one wave; the
/// secondary attack, if any, runs as a second wave against the units the
/// first one hit.
#[derive(Debug)]
pub struct MainAttackController {
    attacker: UnitId,
    target: AttackTarget,
    use_alternative: bool,
    container: BattleActionContainer<ActionStep>,
    stage: AttackStage,
    resolution: Option<AttackResolution>,
    attacks_again: bool,
}

impl MainAttackController {
    pub fn new(attacker: UnitId, target: AttackTarget) -> Self {
        Self {
            attacker,
            target,
            use_alternative: false,
            container: BattleActionContainer::new(),
            stage: AttackStage::Animating,
            resolution: None,
            attacks_again: false,
        }
    }

    /// Uses the unit's alternative attack instead of the main one.
    pub fn with_alternative_attack(mut self) -> Self {
        self.use_alternative = true;
        self
    }

    pub fn attacker(&self) -> UnitId {
        self.attacker
    }

    /// The unit attacks once more this turn. Read once completed.
    pub fn attacks_again(&self) -> bool {
        self.attacks_again
    }

    /// Resolved main attack, available after the impact frame.
    pub fn resolution(&self) -> Option<&AttackResolution> {
        self.resolution.as_ref()
    }

    fn play_attack_sound(&self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let unit_type = ctx.battle.unit(self.attacker)?.unit_type.id.clone();
        let sound = ctx
            .resources
            .unit_sound(&unit_type, BattleUnitAction::Attack)
            .ok_or(ControllerError::MissingSound {
                unit_type,
                action: BattleUnitAction::Attack,
            })?;
        ctx.sounds.play_sound(&sound);
        Ok(())
    }

    fn resolve(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let resolution = ctx.processor.process_main_attack(
            ctx.battle,
            ctx.env,
            ctx.rng,
            self.attacker,
            self.target,
            self.use_alternative,
        )?;
        tracing::debug!(
            attacker = %self.attacker,
            attack_type = %resolution.attack_type,
            targets = resolution.results.len(),
            "attack resolved"
        );
        self.schedule_wave(ctx, &resolution.results)?;
        self.resolution = Some(resolution);
        self.stage = AttackStage::PrimaryWave;
        Ok(())
    }

    /// Spawns overlays on the targets and schedules every result.
    fn schedule_wave(
        &mut self,
        ctx: &mut ControllerContext<'_>,
        results: &[CalculatedAttackResult],
    ) -> ControllerResult<()> {
        let mut sounded: Vec<UnitAttackType> = Vec::new();
        for result in results {
            if !sounded.contains(&result.attack_type) {
                sounded.push(result.attack_type);
                if let Some(sound) = ctx.resources.attack_type_sound(result.attack_type) {
                    ctx.sounds.play_sound(&sound);
                }
            }
            if let Some(clip) = ctx.resources.attack_type_animation(result.attack_type) {
                let anchor = match result.target {
                    AttackTarget::Unit(unit) => AnimationAnchor::Unit(unit),
                    AttackTarget::Slot { side, .. } => AnimationAnchor::Squad(side),
                };
                let handle = ctx.host.add_animation(&clip, anchor, false);
                self.container
                    .add(ActionTrigger::AnimationEnd { animation: handle }, ActionStep::Overlay(handle));
            }
            add_processor_action(ctx, &mut self.container, UnitActionProcessor::Attack(result.clone()))?;
        }
        Ok(())
    }

    /// Starts the secondary wave, or finishes when there is none.
    fn after_primary_wave(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let targets = match &self.resolution {
            Some(resolution) => ctx.processor.secondary_targets(ctx.battle, resolution),
            None => Vec::new(),
        };
        self.stage = AttackStage::SecondaryWave;
        if targets.is_empty() {
            return Ok(());
        }

        let results =
            ctx.processor
                .process_secondary_attack(ctx.battle, ctx.env, ctx.rng, self.attacker, &targets)?;
        tracing::debug!(attacker = %self.attacker, targets = results.len(), "secondary attack resolved");
        self.schedule_wave(ctx, &results)
    }

    fn finish(&mut self, ctx: &mut ControllerContext<'_>) {
        let attacks_again = self.resolution.as_ref().is_some_and(|r| r.attacks_again)
            && ctx.battle.is_unit_active(self.attacker)
            && ctx.battle.battle_outcome().is_none();
        self.attacks_again = attacks_again;
        ctx.battle.is_second_attack = attacks_again;
        self.stage = AttackStage::Done;
        tracing::debug!(attacker = %self.attacker, attacks_again, "attack finished");
    }
}

impl BattleUnitActionController for MainAttackController {
    fn is_completed(&self) -> bool {
        self.stage == AttackStage::Done
    }

    fn should_pass_turn(&self) -> bool {
        false
    }

    fn initialize(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let targets = ctx
            .processor
            .attack_targets(ctx.battle, ctx.env, self.attacker, self.use_alternative)?;
        if !targets.contains(&self.target) {
            tracing::warn!(attacker = %self.attacker, target = ?self.target, "target cannot be attacked");
            let attack_type = ctx.battle.unit(self.attacker)?.unit_type.main_attack.attack_type;
            let unit = self.target.unit().unwrap_or(self.attacker);
            return Err(BattleError::invalid_target(unit, attack_type, ctx.battle.round()).into());
        }

        let (handle, clip) = ctx.play_unit_animation(self.attacker, BattleUnitAction::Attack)?;
        if let Some(frame) = clip.sound_frame {
            self.container.add(
                ActionTrigger::AnimationFrame { animation: handle, frame },
                ActionStep::AttackSound,
            );
        }
        self.container.add(
            ActionTrigger::AnimationFrame {
                animation: handle,
                frame: clip.impact_frame.unwrap_or(0),
            },
            ActionStep::AttackImpact,
        );
        self.container
            .add(ActionTrigger::AnimationEnd { animation: handle }, ActionStep::AttackEnd);
        tracing::debug!(attacker = %self.attacker, target = ?self.target, "attack started");
        Ok(())
    }

    fn before_scene_update(&mut self, ctx: &mut ControllerContext<'_>, ticks: u64) -> ControllerResult<()> {
        self.container.before_scene_update(ticks, &*ctx.host);
        for action in self.container.take_completed() {
            match action.payload {
                ActionStep::AttackSound => self.play_attack_sound(ctx)?,
                ActionStep::AttackImpact => self.resolve(ctx)?,
                ActionStep::AttackEnd => {
                    if ctx.battle.is_unit_active(self.attacker) {
                        ctx.play_unit_animation(self.attacker, BattleUnitAction::Waiting)?;
                    }
                }
                ActionStep::Overlay(handle) => ctx.host.remove_animation(handle),
                step => {
                    handle_processor_step(ctx, &mut self.container, step)?;
                }
            }
        }

        if self.container.is_empty() {
            match self.stage {
                AttackStage::PrimaryWave => {
                    self.after_primary_wave(ctx)?;
                    if self.container.is_empty() {
                        self.finish(ctx);
                    }
                }
                AttackStage::SecondaryWave => self.finish(ctx),
                AttackStage::Animating | AttackStage::Done => {}
            }
        }
        Ok(())
    }

    fn after_scene_update(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        self.container.after_scene_update();
        Ok(())
    }
}

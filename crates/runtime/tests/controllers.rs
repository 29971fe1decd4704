//! Controllers driven tick by tick against a fake scene.

mod common;

use std::path::PathBuf;

use battle_content::ContentFactory;
use battle_core::{
    AttackTarget, BattleError, BattleSide, ErrorSeverity, SquadPosition, UnitActionType, UnitAttack,
    UnitAttackReach, UnitAttackSource, UnitAttackType, UnitId, UnitType, UnitTypeId,
};
use battle_runtime::{
    AnimationAnchor, BattleEvent, BattleUnitActionController, BeginUnitTurnController, ControllerError,
    InstantAction, InstantActionController, MainAttackController,
};

use common::Stage;

fn melee(power: u32) -> UnitAttack {
    UnitAttack::new(UnitAttackType::Damage, UnitAttackSource::Weapon, UnitAttackReach::Adjacent)
        .with_power(power)
        .with_accuracy(100)
}

fn spell(attack_type: UnitAttackType, power: u32) -> UnitAttack {
    UnitAttack::new(attack_type, UnitAttackSource::Death, UnitAttackReach::Any)
        .with_power(power)
        .with_accuracy(100)
}

fn actions(events: &[BattleEvent]) -> Vec<(bool, UnitActionType)> {
    events
        .iter()
        .map(|event| (event.is_begin(), event.description().action))
        .collect()
}

fn attack_types(events: &[BattleEvent]) -> Vec<Option<UnitAttackType>> {
    events.iter().map(|event| event.description().attack_type).collect()
}

/// Witch casting `attack_type` from the back line on a front-line knight.
fn caster_and_victim(attack_type: UnitAttackType, power: u32, victim_hit_points: u32) -> (Stage, UnitId, UnitId) {
    let mut stage = Stage::new([
        UnitType::new("witch", 80, spell(attack_type, power)),
        UnitType::new("knight", victim_hit_points, melee(20)),
    ]);
    let witch = stage.place("witch", BattleSide::Attacker, SquadPosition::back(1));
    let knight = stage.place("knight", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut cast = MainAttackController::new(witch, knight.into());
    stage.drive(&mut cast).unwrap();
    stage.take_events();
    (stage, witch, knight)
}

#[test]
fn attack_resolves_at_impact_and_applies_after_delay() {
    let mut stage = Stage::new([
        UnitType::new("squire", 100, melee(20)),
        UnitType::new("knight", 100, melee(20)).with_armor(50),
    ]);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    let knight = stage.place("knight", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut controller = MainAttackController::new(squire, knight.into());
    stage.initialize(&mut controller).unwrap();
    assert_eq!(stage.host.unit_animations[&squire], "squire/attack");

    let mut ticks = 0;
    while stage.events.is_empty() {
        stage.tick(&mut controller).unwrap();
        ticks += 1;
        assert!(ticks < 50);
    }
    // sound cue came first; the hit is announced but not applied yet
    assert_eq!(stage.sounds.played, vec!["squire/Attack".to_string()]);
    assert_eq!(stage.hit_points(knight), 100);

    while !controller.is_completed() {
        stage.tick(&mut controller).unwrap();
    }
    assert_eq!(stage.hit_points(knight), 90);

    let events = stage.take_events();
    assert_eq!(
        actions(&events),
        vec![(true, UnitActionType::Attack), (false, UnitActionType::Attack)]
    );
    let description = events[0].description();
    assert_eq!(description.target, Some(knight));
    assert_eq!(description.attack_type, Some(UnitAttackType::Damage));
    assert_eq!(description.power, Some(10));

    assert_eq!(stage.host.unit_animations[&squire], "squire/waiting");
    assert!(!controller.should_pass_turn());
    assert!(!controller.attacks_again());
    assert!(!stage.battle.is_second_attack);
}

#[test]
fn killing_blow_is_followed_by_death_wave() {
    let mut stage = Stage::new([
        UnitType::new("squire", 100, melee(200)),
        UnitType::new("peasant", 12, melee(5)).with_death_experience(40),
    ]);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    let peasant = stage.place("peasant", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut controller = MainAttackController::new(squire, peasant.into());
    stage.drive(&mut controller).unwrap();

    assert_eq!(
        actions(&stage.take_events()),
        vec![
            (true, UnitActionType::Attack),
            (false, UnitActionType::Attack),
            (true, UnitActionType::Death),
            (false, UnitActionType::Death),
        ]
    );
    let dead = stage.battle.unit(peasant).unwrap();
    assert!(dead.is_dead());
    assert_eq!(dead.hit_points(), 0);
    assert_eq!(stage.battle.unit(squire).unwrap().experience, 40);
    assert_eq!(stage.host.unit_animations[&peasant], "peasant/death");
    assert_eq!(stage.battle.battle_outcome(), Some(BattleSide::Attacker));
}

#[test]
fn secondary_attack_follows_the_first_wave() {
    let scorpion = UnitType::new("scorpion", 80, spell(UnitAttackType::Damage, 10))
        .with_secondary_attack(spell(UnitAttackType::Poison, 5));
    let mut stage = Stage::new([scorpion, UnitType::new("knight", 100, melee(20))]);
    let attacker = stage.place("scorpion", BattleSide::Attacker, SquadPosition::back(1));
    let knight = stage.place("knight", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut controller = MainAttackController::new(attacker, knight.into());
    stage.drive(&mut controller).unwrap();

    let events = stage.take_events();
    assert_eq!(
        attack_types(&events),
        vec![
            Some(UnitAttackType::Damage),
            Some(UnitAttackType::Damage),
            Some(UnitAttackType::Poison),
            Some(UnitAttackType::Poison),
        ]
    );
    assert_eq!(stage.hit_points(knight), 90);
    assert!(stage.battle.unit(knight).unwrap().effects.has(UnitAttackType::Poison));

    // the poison overlay was drawn on the knight and cleaned up
    assert_eq!(
        stage.host.overlays,
        vec![("overlay/poison".to_string(), AnimationAnchor::Unit(knight))]
    );
    assert_eq!(stage.host.live_overlays(), 0);
}

#[test]
fn poison_ticks_when_the_victim_turn_begins() {
    let (mut stage, _, knight) = caster_and_victim(UnitAttackType::Poison, 5, 12);

    let mut begin = BeginUnitTurnController::new(knight);
    stage.drive(&mut begin).unwrap();

    let events = stage.take_events();
    assert_eq!(
        actions(&events),
        vec![(true, UnitActionType::Effect), (false, UnitActionType::Effect)]
    );
    assert_eq!(events[0].description().power, Some(5));
    assert_eq!(stage.hit_points(knight), 7);
    assert!(!begin.should_pass_turn());

    // already fired this round
    let mut again = BeginUnitTurnController::new(knight);
    assert_eq!(stage.drive(&mut again).unwrap(), 0);
    assert!(stage.take_events().is_empty());
    assert_eq!(stage.hit_points(knight), 7);
}

#[test]
fn poison_death_passes_the_turn() {
    let (mut stage, witch, knight) = caster_and_victim(UnitAttackType::Poison, 5, 4);

    let mut begin = BeginUnitTurnController::new(knight);
    stage.drive(&mut begin).unwrap();

    assert_eq!(
        actions(&stage.take_events()),
        vec![
            (true, UnitActionType::Effect),
            (false, UnitActionType::Effect),
            (true, UnitActionType::Death),
            (false, UnitActionType::Death),
        ]
    );
    assert!(begin.should_pass_turn());
    assert!(stage.battle.unit(knight).unwrap().is_dead());
    assert!(stage.battle.is_unit_active(witch));
}

#[test]
fn paralysis_costs_one_turn() {
    let (mut stage, _, knight) = caster_and_victim(UnitAttackType::Paralyze, 0, 50);
    assert!(stage.battle.unit(knight).unwrap().is_paralyzed());

    let mut begin = BeginUnitTurnController::new(knight);
    stage.drive(&mut begin).unwrap();

    assert!(begin.should_pass_turn());
    assert!(!stage.battle.unit(knight).unwrap().is_paralyzed());
}

#[test]
fn fear_makes_the_victim_leave() {
    let (mut stage, _, knight) = caster_and_victim(UnitAttackType::Fear, 0, 50);

    let mut begin = BeginUnitTurnController::new(knight);
    stage.drive(&mut begin).unwrap();

    assert_eq!(
        actions(&stage.take_events()),
        vec![
            (true, UnitActionType::Effect),
            (false, UnitActionType::Effect),
            (true, UnitActionType::Retreated),
            (false, UnitActionType::Retreated),
        ]
    );
    assert!(begin.should_pass_turn());
    let knight = stage.battle.unit(knight).unwrap();
    assert!(knight.is_retreated());
    assert!(!knight.is_active());
}

#[test]
fn reverted_transformation_hands_the_turn_back() {
    let hex = spell(UnitAttackType::TransformEnemy, 0).with_transform_unit_type(UnitTypeId::new("imp"));
    let mut stage = Stage::new([
        UnitType::new("hexer", 80, hex),
        UnitType::new("knight", 100, melee(20)),
        UnitType::new("imp", 40, melee(5)),
    ]);
    let hexer = stage.place("hexer", BattleSide::Attacker, SquadPosition::back(1));
    let knight = stage.place("knight", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut cast = MainAttackController::new(hexer, knight.into());
    stage.drive(&mut cast).unwrap();
    stage.take_events();
    let imp = stage.battle.replacement_of(knight).unwrap();

    let mut begin = BeginUnitTurnController::new(imp);
    stage.drive(&mut begin).unwrap();

    assert_eq!(
        actions(&stage.take_events()),
        vec![(true, UnitActionType::Effect), (false, UnitActionType::Effect)]
    );
    assert!(!begin.should_pass_turn());
    assert_eq!(begin.unit(), knight);
    assert!(stage.battle.is_unit_active(knight));
    assert_eq!(stage.hit_points(knight), 100);
}

#[test]
fn retreat_order_takes_effect_on_the_next_turn() {
    let mut stage = Stage::new([UnitType::new("squire", 100, melee(20))]);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    stage.place("squire", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut retreat = InstantActionController::new(squire, InstantAction::Retreat);
    stage.drive(&mut retreat).unwrap();
    assert!(stage.battle.unit(squire).unwrap().is_retreating());
    assert!(stage.battle.is_unit_active(squire));

    let mut begin = BeginUnitTurnController::new(squire);
    stage.drive(&mut begin).unwrap();
    assert!(begin.should_pass_turn());
    assert!(!stage.battle.is_unit_active(squire));
    assert_eq!(stage.battle.battle_outcome(), Some(BattleSide::Defender));
}

#[test]
fn defend_lasts_until_the_next_turn() {
    let mut stage = Stage::new([UnitType::new("squire", 100, melee(20))]);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    stage.start_round();

    let mut defend = InstantActionController::new(squire, InstantAction::Defend);
    // one tick to start the delay, two to run it out
    assert_eq!(stage.drive(&mut defend).unwrap(), 3);
    assert!(stage.battle.unit(squire).unwrap().is_defending());
    assert_eq!(
        actions(&stage.take_events()),
        vec![(true, UnitActionType::Defend), (false, UnitActionType::Defend)]
    );

    let mut begin = BeginUnitTurnController::new(squire);
    stage.drive(&mut begin).unwrap();
    assert!(!stage.battle.unit(squire).unwrap().is_defending());
    assert!(!begin.should_pass_turn());
}

#[test]
fn a_unit_waits_at_most_once_per_round() {
    let mut stage = Stage::new([
        UnitType::new("scout", 50, melee(10).with_initiative(70)),
        UnitType::new("squire", 100, melee(20).with_initiative(40)),
    ]);
    let scout = stage.place("scout", BattleSide::Attacker, SquadPosition::front(0));
    let squire = stage.place("squire", BattleSide::Defender, SquadPosition::front(0));
    assert_eq!(stage.start_round(), Some(scout));

    let mut wait = InstantActionController::new(scout, InstantAction::Wait);
    stage.drive(&mut wait).unwrap();

    assert_eq!(stage.battle.next_unit(), Some(squire));
    assert_eq!(stage.battle.next_unit(), Some(scout));
    assert!(stage.battle.turn_queue.is_waiting_turn());

    let mut again = InstantActionController::new(scout, InstantAction::Wait);
    let err = stage.initialize(&mut again).unwrap_err();
    assert!(matches!(err, ControllerError::Battle(BattleError::CannotWait { unit, .. }) if unit == scout));
    assert_eq!(err.severity(), ErrorSeverity::Validation);
}

#[test]
fn attacks_twice_reenters_without_passing_the_turn() {
    let centaur = UnitType::new("centaur", 90, spell(UnitAttackType::Damage, 10)).attacking_twice();
    let mut stage = Stage::new([centaur, UnitType::new("knight", 100, melee(20))]);
    let attacker = stage.place("centaur", BattleSide::Attacker, SquadPosition::back(1));
    let knight = stage.place("knight", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut first = MainAttackController::new(attacker, knight.into());
    stage.drive(&mut first).unwrap();
    assert!(first.attacks_again());
    assert!(stage.battle.is_second_attack);

    let mut second = MainAttackController::new(attacker, knight.into());
    stage.drive(&mut second).unwrap();
    assert!(!second.attacks_again());
    assert!(!stage.battle.is_second_attack);
    assert_eq!(stage.hit_points(knight), 80);
}

#[test]
fn unreachable_target_is_rejected_before_animating() {
    let mut stage = Stage::new([UnitType::new("squire", 100, melee(20))]);
    let blocked = stage.place("squire", BattleSide::Attacker, SquadPosition::back(1));
    stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    let enemy = stage.place("squire", BattleSide::Defender, SquadPosition::front(1));
    stage.start_round();

    let mut controller = MainAttackController::new(blocked, AttackTarget::Unit(enemy));
    let err = stage.initialize(&mut controller).unwrap_err();

    assert!(matches!(err, ControllerError::Battle(BattleError::InvalidTarget { .. })));
    assert!(!stage.host.unit_animations.contains_key(&blocked));
}

#[test]
fn missing_attack_sound_is_fatal() {
    let mut stage = Stage::new([UnitType::new("squire", 100, melee(20))]);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    let enemy = stage.place("squire", BattleSide::Defender, SquadPosition::front(1));
    stage.resources.silent = true;
    stage.start_round();

    let mut controller = MainAttackController::new(squire, enemy.into());
    let err = stage.drive(&mut controller).unwrap_err();
    assert!(matches!(err, ControllerError::MissingSound { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Fatal);
}

#[test]
fn bundled_units_duel_until_one_side_wins() {
    let data = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../battle/content/data");
    let catalog = ContentFactory::new(data).load_unit_types().unwrap();
    let mut stage = Stage::with_catalog(catalog);
    let squire = stage.place("squire", BattleSide::Attacker, SquadPosition::front(1));
    let rival = stage.place("squire", BattleSide::Defender, SquadPosition::front(1));

    let mut rounds = 0;
    while stage.battle.battle_outcome().is_none() {
        rounds += 1;
        assert!(rounds <= 10, "duel did not end");
        let mut acting = stage.start_round();
        while let Some(unit) = acting {
            let mut begin = BeginUnitTurnController::new(unit);
            stage.drive(&mut begin).unwrap();
            if !begin.should_pass_turn() {
                let env = battle_core::BattleEnv::new(&stage.config, &stage.catalog);
                let targets = stage.processor.attack_targets(&stage.battle, env, unit, false).unwrap();
                if let Some(&target) = targets.first() {
                    let mut attack = MainAttackController::new(unit, target);
                    stage.drive(&mut attack).unwrap();
                }
            }
            if stage.battle.battle_outcome().is_some() {
                break;
            }
            acting = stage.battle.next_unit();
        }
    }

    // 25 damage per hit, the attacker strikes first every round
    assert_eq!(stage.battle.battle_outcome(), Some(BattleSide::Attacker));
    assert_eq!(rounds, 4);
    assert!(stage.battle.unit(rival).unwrap().is_dead());
    assert_eq!(stage.hit_points(squire), 25);
    assert_eq!(stage.battle.unit(squire).unwrap().experience, 30);
}

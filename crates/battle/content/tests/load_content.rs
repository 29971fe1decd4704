//! Loading the bundled data directory and ad-hoc files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use battle_content::{ConfigLoader, ContentFactory, UnitTypeLoader};
use battle_core::{
    BattleConfig, BattleContext, BattleEnv, BattleProcessor, BattleSide, InfiniteDurationPolicy,
    ScriptedRng, SquadPosition, UnitAttackType, UnitTypeId, UnitTypeOracle,
};

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn bundled_content_loads() {
    let factory = ContentFactory::new(bundled_data());

    let config = factory.load_config().expect("battle.toml");
    assert_eq!(config, BattleConfig::default());

    let catalog = factory.load_unit_types().expect("units.ron");
    let druid = catalog.unit_type(&UnitTypeId::new("druid")).unwrap();
    assert_eq!(druid.main_attack.attack_type, UnitAttackType::Summon);

    // every summon/transform target resolves
    for id in catalog.all_ids() {
        let unit_type = catalog.unit_type(&id).unwrap();
        if let Some(target) = &unit_type.main_attack.transform_unit_type {
            assert!(catalog.unit_type(target).is_some(), "{id} -> {target}");
        }
    }

    let priestess = catalog.unit_type(&UnitTypeId::new("priestess")).unwrap();
    assert!(priestess.has_distinct_secondary_attack());
    assert_eq!(
        priestess.main_attack.alternative.as_ref().map(|alt| alt.attack_type),
        Some(UnitAttackType::Revive)
    );
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());
    assert_eq!(factory.load_config().unwrap(), BattleConfig::default());
}

#[test]
fn missing_catalog_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ContentFactory::new(dir.path());
    let err = factory.load_unit_types().unwrap_err();
    assert!(err.to_string().contains("units.ron"));
}

#[test]
fn config_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(ContentFactory::CONFIG_FILE);
    fs::write(
        &path,
        "infinite_duration_policy = \"Maximum\"\n[timings]\ninstant_action_delay = 40\n",
    )
    .unwrap();

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.infinite_duration_policy, InfiniteDurationPolicy::Maximum);
    assert_eq!(config.timings.instant_action_delay, 40);
}

#[test]
fn malformed_catalog_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("units.ron");
    fs::write(&path, "UnitCatalog(units: [UnitType(id: \"x\")])").unwrap();

    let err = UnitTypeLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse unit catalog RON"));
}

#[test]
fn loaded_units_fight() {
    let factory = ContentFactory::new(bundled_data());
    let config = factory.load_config().unwrap();
    let catalog = factory.load_unit_types().unwrap();
    let env = BattleEnv::new(&config, &catalog);

    let squire = catalog.unit_type(&UnitTypeId::new("squire")).unwrap();
    let knight = catalog.unit_type(&UnitTypeId::new("knight")).unwrap();

    let mut battle = BattleContext::new();
    let attacker = battle.add_unit(Arc::clone(&squire), BattleSide::Attacker, SquadPosition::front(1));
    let defender = battle.add_unit(Arc::clone(&knight), BattleSide::Defender, SquadPosition::front(1));

    // hit roll 0, damage bonus 0
    let mut rng = ScriptedRng::new([0, 0]);
    let processor = BattleProcessor::new();
    let resolution = processor
        .process_main_attack(&battle, env, &mut rng, attacker, defender.into(), false)
        .unwrap();
    for result in &resolution.results {
        processor.apply_attack(&mut battle, env, result).unwrap();
    }

    // 25 power through 30% armor
    let knight_hp = battle.unit(defender).unwrap().hit_points();
    assert_eq!(knight_hp, 150 - 17);
}

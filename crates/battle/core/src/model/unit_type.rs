use super::{UnitAttack, UnitProtection, UnitTypeId};

/// Broad role of a unit type. Informational; rules do not branch on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitBranch {
    #[default]
    Fighter,
    Archer,
    Mage,
    Support,
    Special,
}

/// Immutable unit template shared by every [`Unit`](super::Unit) of that type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitType {
    pub id: UnitTypeId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub branch: UnitBranch,
    pub hit_points: u32,
    /// Damage reduction in percent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: u32,
    pub main_attack: UnitAttack,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_attack: Option<UnitAttack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attacks_twice: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub protections: Vec<UnitProtection>,
    /// Experience split among the enemies that survive this unit's death.
    #[cfg_attr(feature = "serde", serde(default))]
    pub death_experience: u32,
}

impl UnitType {
    pub fn new(id: impl Into<String>, hit_points: u32, main_attack: UnitAttack) -> Self {
        let id = UnitTypeId::new(id);
        Self {
            name: id.0.clone(),
            id,
            branch: UnitBranch::default(),
            hit_points,
            armor: 0,
            main_attack,
            secondary_attack: None,
            attacks_twice: false,
            protections: Vec::new(),
            death_experience: 0,
        }
    }

    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_secondary_attack(mut self, attack: UnitAttack) -> Self {
        self.secondary_attack = Some(attack);
        self
    }

    pub fn attacking_twice(mut self) -> Self {
        self.attacks_twice = true;
        self
    }

    pub fn with_protection(mut self, protection: UnitProtection) -> Self {
        self.protections.push(protection);
        self
    }

    pub fn with_death_experience(mut self, experience: u32) -> Self {
        self.death_experience = experience;
        self
    }

    pub fn with_branch(mut self, branch: UnitBranch) -> Self {
        self.branch = branch;
        self
    }

    /// Initiative of the unit's turn, taken from its main attack.
    pub fn initiative(&self) -> u32 {
        self.main_attack.initiative
    }

    /// Unit types whose secondary attack differs from the main one.
    pub fn has_distinct_secondary_attack(&self) -> bool {
        self.secondary_attack
            .as_ref()
            .is_some_and(|secondary| secondary.attack_type != self.main_attack.attack_type)
    }
}

use std::fmt;

/// Stable index of a unit in the battle arena.
///
/// Ids are never reused within a battle: a transformed or summoned unit gets a
/// fresh id and the replaced unit keeps its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Catalog key of a unit template (e.g. `"squire"`, `"wolf_lord"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitTypeId(pub String);

impl UnitTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which squad a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleSide {
    Attacker,
    Defender,
}

impl BattleSide {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Attacker => 0,
            Self::Defender => 1,
        }
    }
}

/// Squad row. Melee attacks must go through the front line first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SquadLine {
    Front,
    Back,
}

/// Slot inside a squad: a line and a flank column (`0..SquadPosition::FLANKS`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquadPosition {
    pub line: SquadLine,
    pub flank: u8,
}

impl SquadPosition {
    pub const FLANKS: u8 = 3;

    pub const fn new(line: SquadLine, flank: u8) -> Self {
        Self { line, flank }
    }

    pub const fn front(flank: u8) -> Self {
        Self::new(SquadLine::Front, flank)
    }

    pub const fn back(flank: u8) -> Self {
        Self::new(SquadLine::Back, flank)
    }

    /// Every slot of a squad, front line first.
    pub fn all() -> impl Iterator<Item = SquadPosition> {
        [SquadLine::Front, SquadLine::Back]
            .into_iter()
            .flat_map(|line| (0..Self::FLANKS).map(move |flank| Self::new(line, flank)))
    }

    pub fn flank_distance(&self, other: &SquadPosition) -> u8 {
        self.flank.abs_diff(other.flank)
    }
}

impl fmt::Display for SquadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.flank)
    }
}

//! Data-driven battle content.
//!
//! Loads the static data a battle needs from RON/TOML files:
//! - Unit-type catalogs (RON)
//! - Battle rule configuration and presentation timings (TOML)
//!
//! Content feeds the [`battle_core::UnitTypeOracle`] and
//! [`battle_core::BattleConfig`] handed to the runtime; it never appears in
//! battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, UnitCatalog, UnitTypeLoader};

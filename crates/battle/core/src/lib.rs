//! Deterministic tactical battle resolution.
//!
//! `battle-core` defines the canonical combat rules: dice and probability
//! primitives, the arena grid with pathfinding, the tactical rules engine,
//! the action resolver, the turn orchestrator, and the opponent AI. All
//! state mutation flows through [`engine::BattleEngine`]; every other layer
//! is a pure function over snapshots. Rendering, persistence, and world
//! generation live in consumer crates and only ever read the state exposed
//! here.

pub mod ai;
pub mod config;
pub mod dice;
pub mod effect;
pub mod engine;
pub mod grid;
pub mod resolve;
pub mod rules;
pub mod state;

pub use ai::{Intent, ScriptedStrategy, Strategy};
pub use config::BattleConfig;
pub use dice::{D20Roll, DiceRng, DiceSpec, RollMode, ability_modifier, proficiency_bonus};
pub use effect::{
    Ability, AbilityId, AbilityOracle, ActionEffect, AoeShape, EffectKind, StatusApplication,
};
pub use engine::{BattleEngine, BattleEvent, BattleSetupError};
pub use grid::{
    Adjacency, BattleGrid, GridCell, Path, PathError, TileEffect, TileEffectKind, find_path,
    reachable_tiles,
};
pub use resolve::{ResolveContext, Resolution, resolve, weapon_strike_effects};
pub use rules::{
    AttackRoll, ElevationEdge, apply_resistance, armor_class, compute_attack_roll, compute_damage,
    entity_armor_class, hit_points, vision_range,
};
pub use state::{
    AbilityKind, AbilityScores, ActionSelection, ArmorType, BattlePhase, BattleState, Behavior,
    ClassKind, CombatStats, DamageType, Entity, EntityId, FxKind, Popup, PopupColor, Position,
    Race, Resistance, Resistances, ResourceMeter, Side, SpellFx, StatusEffect, StatusKind,
    StatusSet, TurnBudget, TurnOrder, WeaponProfile,
};

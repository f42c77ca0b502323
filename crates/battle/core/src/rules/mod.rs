//! Tactical rules engine.
//!
//! Pure functions deriving attack rolls, damage, armor class, hit points,
//! and vision from entity stats and grid geometry. All combat logic here is
//! side-effect free; the resolver and orchestrator call into it.

mod attack;
mod damage;
mod defense;
mod vision;

pub use attack::{
    AttackRoll, ElevationEdge, attack_ability, compute_attack_roll, status_roll_mode,
};
pub use damage::{apply_resistance, compute_damage, rage_bonus};
pub use defense::{armor_class, entity_armor_class, hit_points};
pub use vision::{Dimension, TimeOfDay, vision_range};

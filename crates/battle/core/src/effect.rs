//! Declarative ability effects.
//!
//! An ability is an ordered list of [`ActionEffect`]s plus targeting data.
//! Effect kinds form a closed sum type so a newly added kind fails to
//! compile anywhere it is not handled.

use std::fmt;

use crate::dice::DiceSpec;
use crate::state::{AbilityKind, DamageType, StatusKind};

/// Identifier for an ability definition in the content registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub u16);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ability:{}", self.0)
    }
}

/// What one effect does when it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Subtract HP from the target; requires the resolution's hit roll.
    Damage,
    /// Restore HP to the target.
    Heal,
    /// Attach a status effect to the target.
    Status,
    /// Attach a beneficial status to the caster.
    Buff,
    /// Attach a detrimental status to the target.
    Debuff,
    /// Damage the target and return half the dealt amount to the caster.
    Drain,
    /// Polymorph the target; queues the Transformed marker status.
    Transform,
}

/// A status change carried by an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusApplication {
    pub kind: StatusKind,
    pub duration: u32,
    pub intensity: u32,
}

impl StatusApplication {
    pub fn new(kind: StatusKind, duration: u32, intensity: u32) -> Self {
        Self {
            kind,
            duration,
            intensity,
        }
    }
}

/// One declarative effect bound to an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEffect {
    pub kind: EffectKind,
    pub damage_type: DamageType,
    pub dice: DiceSpec,
    /// Ability score whose modifier is added to the rolled amount.
    pub scaling: Option<AbilityKind>,
    pub status: Option<StatusApplication>,
    /// Application chance in percent; 100 always applies.
    pub chance: u32,
}

impl ActionEffect {
    pub fn damage(damage_type: DamageType, dice: DiceSpec) -> Self {
        Self {
            kind: EffectKind::Damage,
            damage_type,
            dice,
            scaling: None,
            status: None,
            chance: 100,
        }
    }

    pub fn heal(dice: DiceSpec) -> Self {
        Self {
            kind: EffectKind::Heal,
            damage_type: DamageType::True,
            dice,
            scaling: None,
            status: None,
            chance: 100,
        }
    }

    pub fn status(application: StatusApplication) -> Self {
        Self {
            kind: EffectKind::Status,
            damage_type: DamageType::True,
            dice: DiceSpec::new(0, 0, 0),
            scaling: None,
            status: Some(application),
            chance: 100,
        }
    }

    pub fn drain(damage_type: DamageType, dice: DiceSpec) -> Self {
        Self {
            kind: EffectKind::Drain,
            ..Self::damage(damage_type, dice)
        }
    }

    pub fn with_kind(mut self, kind: EffectKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn scaled_by(mut self, kind: AbilityKind) -> Self {
        self.scaling = Some(kind);
        self
    }

    pub fn inflicts(mut self, application: StatusApplication) -> Self {
        self.status = Some(application);
        self
    }

    pub fn with_chance(mut self, chance: u32) -> Self {
        self.chance = chance.min(100);
        self
    }

    /// True for effect kinds gated behind the resolution's attack roll.
    pub fn requires_hit_roll(&self) -> bool {
        matches!(self.kind, EffectKind::Damage | EffectKind::Drain)
    }
}

/// Area-of-effect footprint shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AoeShape {
    /// All tiles within `radius` of the target tile.
    Circle { radius: u32 },
    /// A 90-degree wedge of `radius` aimed from the caster at the target tile.
    Cone { radius: u32 },
}

/// A castable spell or skill: ordered effects plus targeting data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub effects: Vec<ActionEffect>,
    /// Maximum cast distance in tiles.
    pub range: u32,
    pub aoe: Option<AoeShape>,
    /// Spell slots consumed per cast.
    pub slot_cost: u32,
    /// Stamina consumed per cast.
    pub stamina_cost: u32,
}

impl Ability {
    /// True when resolving this ability rolls to hit.
    pub fn requires_hit_roll(&self) -> bool {
        self.effects.iter().any(ActionEffect::requires_hit_roll)
    }

    /// True when any effect subtracts HP; the AI uses this to pick spells.
    pub fn is_damaging(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::Damage | EffectKind::Drain))
    }
}

/// Read access to ability definitions, implemented by the content layer.
pub trait AbilityOracle {
    fn ability(&self, id: AbilityId) -> Option<&Ability>;
}

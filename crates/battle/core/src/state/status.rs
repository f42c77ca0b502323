//! Timed status effects attached to entities.
//!
//! # Turn-based duration
//!
//! Durations are whole turns of the owning entity. At the start of the
//! owner's own turn every effect ticks down by exactly 1; an effect whose
//! remaining duration reaches 0 is removed, never decremented further.
//! Re-applying an effect of the same kind extends the duration to the max
//! of old and new; it never stacks.

use arrayvec::ArrayVec;
use strum::EnumIter;

use crate::config::BattleConfig;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// HP loss each turn.
    Poison,

    /// Fire damage each turn.
    Burn,

    /// HP loss each turn from an open wound.
    Bleed,

    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot act this turn.
    Stun,

    /// Cannot move.
    Freeze,

    /// Attack rolls at disadvantage.
    Slow,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// HP recovery each turn.
    Regen,

    /// Attack rolls at advantage.
    Haste,

    /// Armor class bonus equal to intensity.
    Shield,

    /// Flat damage bonus equal to intensity.
    Rage,

    /// Effective STR raised by intensity.
    Strengthened,

    // ========================================================================
    // Debuffs & markers
    // ========================================================================
    /// Effective STR lowered by intensity.
    Weakened,

    /// Polymorphed into another form; presentation-side marker.
    Transformed,
}

impl StatusKind {
    /// Signed HP change applied at the start of the owner's turn, scaled by
    /// the effect's intensity. Zero for non-periodic kinds.
    pub fn periodic_hp_delta(self, intensity: u32) -> i32 {
        let intensity = intensity as i32;
        match self {
            StatusKind::Poison | StatusKind::Bleed => -2 * intensity,
            StatusKind::Burn => -3 * intensity,
            StatusKind::Regen => 2 * intensity,
            _ => 0,
        }
    }

    /// True when the effect prevents taking any action this turn.
    pub fn blocks_action(self) -> bool {
        matches!(self, StatusKind::Stun)
    }

    /// True when the effect prevents movement.
    pub fn blocks_movement(self) -> bool {
        matches!(self, StatusKind::Stun | StatusKind::Freeze)
    }

    /// True for effects a cleanse would remove.
    pub fn is_debuff(self) -> bool {
        matches!(
            self,
            StatusKind::Poison
                | StatusKind::Burn
                | StatusKind::Bleed
                | StatusKind::Stun
                | StatusKind::Freeze
                | StatusKind::Slow
                | StatusKind::Weakened
        )
    }
}

/// A single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Whole turns remaining, counted on the owner's turns.
    pub remaining_turns: u32,
    /// Magnitude multiplier for periodic and flat-bonus effects.
    pub intensity: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, remaining_turns: u32, intensity: u32) -> Self {
        Self {
            kind,
            remaining_turns,
            intensity,
        }
    }
}

/// Active status effects on one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSet {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Applies a status effect.
    ///
    /// An existing effect of the same kind has its duration extended to the
    /// max of old and new, and keeps the stronger intensity. New kinds are
    /// dropped silently once the set is full.
    pub fn apply(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
            existing.intensity = existing.intensity.max(effect.intensity);
            return;
        }
        if !self.effects.is_full() {
            self.effects.push(effect);
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Net periodic HP change for the start of the owner's turn.
    pub fn periodic_hp_delta(&self) -> i32 {
        self.effects
            .iter()
            .map(|e| e.kind.periodic_hp_delta(e.intensity))
            .sum()
    }

    /// Decrements every effect by one turn and removes the expired ones.
    ///
    /// Returns the kinds that expired this tick.
    pub fn tick_down(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining_turns > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// True when any active effect prevents acting.
    pub fn blocks_action(&self) -> bool {
        self.effects.iter().any(|e| e.kind.blocks_action())
    }

    /// True when any active effect prevents movement.
    pub fn blocks_movement(&self) -> bool {
        self.effects.iter().any(|e| e.kind.blocks_movement())
    }
}

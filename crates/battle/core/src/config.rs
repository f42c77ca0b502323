/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Flat multiplier applied to every computed hit-point total.
    pub hp_scale: u32,

    /// Lifetime of a damage/heal popup before the renderer drops it.
    pub popup_lifetime_ms: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum concurrent status effects on one entity.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum known abilities per entity.
    pub const MAX_ABILITIES: usize = 8;

    // ===== rules constants =====
    /// Height difference (in elevation units) that grants the high-ground edge.
    pub const ELEVATION_EDGE: i32 = 2;
    /// Attack-roll bonus/penalty from the elevation edge.
    pub const ELEVATION_ROLL_BONUS: i32 = 2;
    /// Shield equipment bonus to armor class.
    pub const SHIELD_AC_BONUS: i32 = 2;
    /// DEX-to-AC cap for medium armor.
    pub const MEDIUM_ARMOR_DEX_CAP: i32 = 2;
    /// Base vision radius before modifiers.
    pub const BASE_VISION_RANGE: i32 = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HP_SCALE: u32 = 2;
    pub const DEFAULT_POPUP_LIFETIME_MS: u32 = 1000;

    pub fn new() -> Self {
        Self {
            hp_scale: Self::DEFAULT_HP_SCALE,
            popup_lifetime_ms: Self::DEFAULT_POPUP_LIFETIME_MS,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

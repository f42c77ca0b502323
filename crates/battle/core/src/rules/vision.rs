//! Sight radius for the overworld collaborator.
//!
//! Lives in the rules layer because it shares the ability-modifier
//! primitive; battle resolution itself only uses grid line of sight.

use crate::config::BattleConfig;
use crate::dice::ability_modifier;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dimension {
    #[default]
    Material,
    /// The shadow dimension dims everything.
    Shadow,
}

/// Vision radius in tiles.
///
/// Base radius plus the WIS modifier, reduced by one per 25 corruption,
/// by night, and by the shadow dimension. Never drops below 1.
pub fn vision_range(
    wisdom: i32,
    corruption: u32,
    time_of_day: TimeOfDay,
    dimension: Dimension,
) -> u32 {
    let mut range = BattleConfig::BASE_VISION_RANGE + ability_modifier(wisdom);
    range -= (corruption / 25) as i32;
    if time_of_day == TimeOfDay::Night {
        range -= 2;
    }
    if dimension == Dimension::Shadow {
        range -= 3;
    }
    range.max(1) as u32
}

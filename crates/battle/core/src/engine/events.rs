//! Events emitted by the orchestrator.
//!
//! Engine methods return the events their mutation produced; the runtime
//! fans them out to the rendering layer and to the loot/quest collaborators.

use crate::grid::TileEffectKind;
use crate::state::{BattlePhase, EntityId, Position, Side, SpellFx, StatusKind};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PhaseChanged {
        phase: BattlePhase,
    },
    RoundStarted {
        round: u32,
    },
    TurnStarted {
        entity: EntityId,
    },
    Moved {
        entity: EntityId,
        path: Vec<Position>,
    },
    ActionResolved {
        actor: EntityId,
        target: EntityId,
        hit: bool,
        critical: bool,
        hp_delta: i32,
    },
    FxStarted {
        fx: SpellFx,
    },
    StatusApplied {
        entity: EntityId,
        kind: StatusKind,
        duration: u32,
    },
    StatusExpired {
        entity: EntityId,
        kind: StatusKind,
    },
    TileHazard {
        entity: EntityId,
        kind: TileEffectKind,
        hp_delta: i32,
    },
    /// An entity dropped to 0 HP. For enemies this is the hook the
    /// inventory (loot) and quest collaborators key off.
    EntityDefeated {
        entity: EntityId,
        side: Side,
    },
    BattleEnded {
        victory: bool,
    },
}

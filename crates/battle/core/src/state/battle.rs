//! The mutable battle aggregate owned by the orchestrator.

use std::collections::BTreeSet;

use crate::config::BattleConfig;
use crate::dice::DiceRng;
use crate::effect::AbilityId;
use crate::grid::BattleGrid;

use super::common::{EntityId, Position, Side};
use super::entity::Entity;

/// Orchestrator state machine phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    /// Arena built, initiative not yet rolled.
    Init,
    /// Current actor is player-controlled and may act.
    AwaitingInput,
    /// An action is resolving; input is locked.
    Animating,
    /// Current actor is AI-controlled.
    EnemyTurn,
    /// All enemies defeated. Terminal.
    Victory,
    /// All player characters defeated. Terminal.
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }
}

/// Player's pending action selection; selecting the same kind again
/// clears it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionSelection {
    Move,
    Attack,
    Cast(AbilityId),
    /// Drink a potion; consumes the action, needs no tile.
    Potion,
    /// End the turn without acting.
    Wait,
}

/// Initiative order rolled once at battle start.
///
/// Defeated entities are skipped when advancing but never removed from the
/// order, so indices stay stable for the whole battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnOrder {
    pub order: Vec<EntityId>,
    pub index: usize,
}

impl TurnOrder {
    /// Rolls initiative: `initiative_bonus + d20` descending, ties broken
    /// by ascending entity id.
    pub fn roll(entities: &[Entity], rng: &mut DiceRng) -> Self {
        let mut rolled: Vec<(i32, EntityId)> = entities
            .iter()
            .filter(|e| e.side != Side::Npc)
            .map(|e| {
                let roll = e.stats.initiative_bonus + rng.roll_die(20) as i32;
                (roll, e.id)
            })
            .collect();
        rolled.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        Self {
            order: rolled.into_iter().map(|(_, id)| id).collect(),
            index: 0,
        }
    }

    pub fn current(&self) -> Option<EntityId> {
        self.order.get(self.index).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Color channel for floating combat popups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopupColor {
    /// Normal damage.
    Red,
    /// Critical damage.
    Amber,
    /// Healing.
    Green,
    /// Informational (miss, status labels).
    White,
}

/// A floating combat-text popup consumed by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Popup {
    /// Signed amount; `None` for text-only popups.
    pub amount: Option<i32>,
    pub label: String,
    pub color: PopupColor,
    pub crit: bool,
    pub position: Position,
    /// Milliseconds left before the renderer drops it.
    pub remaining_ms: u32,
}

impl Popup {
    pub fn damage(amount: u32, label: impl Into<String>, crit: bool, position: Position) -> Self {
        Self {
            amount: Some(-(amount as i32)),
            label: label.into(),
            color: if crit { PopupColor::Amber } else { PopupColor::Red },
            crit,
            position,
            remaining_ms: BattleConfig::DEFAULT_POPUP_LIFETIME_MS,
        }
    }

    pub fn heal(amount: u32, position: Position) -> Self {
        Self {
            amount: Some(amount as i32),
            label: String::new(),
            color: PopupColor::Green,
            crit: false,
            position,
            remaining_ms: BattleConfig::DEFAULT_POPUP_LIFETIME_MS,
        }
    }

    pub fn text(label: impl Into<String>, position: Position) -> Self {
        Self {
            amount: None,
            label: label.into(),
            color: PopupColor::White,
            crit: false,
            position,
            remaining_ms: BattleConfig::DEFAULT_POPUP_LIFETIME_MS,
        }
    }
}

/// In-flight spell visual descriptor for the rendering layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FxKind {
    Projectile,
    Burst,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellFx {
    pub kind: FxKind,
    pub from: Position,
    pub to: Position,
    pub color: [u8; 3],
    pub duration_ms: u32,
}

/// Per-turn bookkeeping for the active entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnBudget {
    pub has_moved: bool,
    pub actions_remaining: u32,
}

/// The whole battle: entities, arena, schedule, and presentation queues.
///
/// One explicit aggregate, owned by the engine wrapper; the rules engine,
/// resolver, and AI only ever see it by reference.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub entities: Vec<Entity>,
    pub grid: BattleGrid,
    pub turn_order: TurnOrder,
    pub phase: BattlePhase,
    pub round: u32,
    pub budget: TurnBudget,
    pub selection: Option<ActionSelection>,
    pub popups: Vec<Popup>,
    pub fx: Option<SpellFx>,
    pub rng: DiceRng,
    pub config: BattleConfig,
}

impl BattleState {
    /// Builds a pre-initiative battle from arena and combatants.
    pub fn new(grid: BattleGrid, entities: Vec<Entity>, seed: u64) -> Self {
        Self {
            entities,
            grid,
            turn_order: TurnOrder::default(),
            phase: BattlePhase::Init,
            round: 0,
            budget: TurnBudget::default(),
            selection: None,
            popups: Vec::new(),
            fx: None,
            rng: DiceRng::seed(seed),
            config: BattleConfig::default(),
        }
    }

    /// Replaces the balance config (loaded by the content layer).
    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The living entity standing on a tile, if any.
    pub fn living_entity_at(&self, position: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.is_alive() && e.position == position)
    }

    pub fn living_on_side(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.side == side && e.is_alive())
    }

    pub fn side_defeated(&self, side: Side) -> bool {
        self.living_on_side(side).next().is_none()
    }

    /// Tiles occupied by living entities, optionally ignoring one of them.
    ///
    /// Fed to pathfinding as its blocked set.
    pub fn occupied_tiles(&self, ignore: Option<EntityId>) -> BTreeSet<Position> {
        self.entities
            .iter()
            .filter(|e| e.is_alive() && Some(e.id) != ignore)
            .map(|e| e.position)
            .collect()
    }

    /// Ages popups by `elapsed_ms`, dropping the expired ones.
    pub fn expire_popups(&mut self, elapsed_ms: u32) {
        for popup in &mut self.popups {
            popup.remaining_ms = popup.remaining_ms.saturating_sub(elapsed_ms);
        }
        self.popups.retain(|p| p.remaining_ms > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CombatStats;

    fn entity(id: u32, side: Side, initiative: i32) -> Entity {
        let stats = CombatStats {
            initiative_bonus: initiative,
            ..CombatStats::default()
        };
        Entity::new(EntityId(id), format!("e{id}"), side, stats)
    }

    #[test]
    fn initiative_sorts_descending_with_stable_ties() {
        let entities = vec![
            entity(0, Side::Player, 0),
            entity(1, Side::Enemy, 20),
            entity(2, Side::Enemy, -20),
        ];
        let mut rng = DiceRng::seed(5);
        let order = TurnOrder::roll(&entities, &mut rng);
        assert_eq!(order.len(), 3);
        // A +20 bonus always beats +0, which always beats -20 (d20 spread is 19).
        assert_eq!(order.order[0], EntityId(1));
        assert_eq!(order.order[2], EntityId(2));
    }

    #[test]
    fn npcs_stay_out_of_the_order() {
        let entities = vec![entity(0, Side::Player, 0), entity(1, Side::Npc, 0)];
        let mut rng = DiceRng::seed(5);
        let order = TurnOrder::roll(&entities, &mut rng);
        assert_eq!(order.order, vec![EntityId(0)]);
    }

    #[test]
    fn popups_expire_after_lifetime() {
        let mut state = BattleState::new(
            BattleGrid::open(2, 2, crate::grid::Adjacency::Eight),
            vec![],
            1,
        );
        state.popups.push(Popup::text("MISS", Position::ORIGIN));
        state.expire_popups(400);
        assert_eq!(state.popups.len(), 1);
        state.expire_popups(700);
        assert!(state.popups.is_empty());
    }
}

//! End-to-end orchestrator scenarios.

use battle_core::{
    Ability, AbilityId, AbilityOracle, ActionEffect, Adjacency, AoeShape, BattleEngine,
    BattleEvent, BattleGrid, BattlePhase, BattleState, CombatStats, DamageType, DiceRng, DiceSpec,
    Entity, EntityId, Position, ResourceMeter, Side, StatusApplication, StatusEffect, StatusKind,
    TurnBudget, TurnOrder, WeaponProfile,
};

struct Registry(Vec<Ability>);

impl AbilityOracle for Registry {
    fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.0.iter().find(|a| a.id == id)
    }
}

fn longsword() -> WeaponProfile {
    WeaponProfile {
        name: "Longsword".into(),
        dice: DiceSpec::new(1, 8, 0),
        damage_type: DamageType::Physical,
        finesse: false,
        ranged: false,
        range: 1,
    }
}

fn fighter(id: u32, side: Side) -> Entity {
    let stats = CombatStats {
        scores: battle_core::AbilityScores::new(15, 10, 12, 10, 10, 10),
        hp: ResourceMeter::full(24),
        ..CombatStats::default()
    };
    Entity::new(EntityId(id), format!("fighter-{id}"), side, stats).with_weapon(longsword())
}

/// Hand-built mid-battle state: initiative pre-rolled, given actor active.
fn staged(entities: Vec<Entity>, order: Vec<u32>, seed: u64) -> BattleState {
    let mut state = BattleState::new(BattleGrid::open(8, 8, Adjacency::Eight), entities, seed);
    let first_is_player = state
        .entity(EntityId(order[0]))
        .map(|e| e.side == Side::Player)
        .unwrap_or(false);
    state.turn_order = TurnOrder {
        order: order.into_iter().map(EntityId).collect(),
        index: 0,
    };
    state.round = 1;
    state.phase = if first_is_player {
        BattlePhase::AwaitingInput
    } else {
        BattlePhase::EnemyTurn
    };
    state.budget = TurnBudget {
        has_moved: false,
        actions_remaining: 1,
    };
    state
}

/// Level-1 fighter (STR 15, proficiency +2) rolling a natural 15 against
/// AC 12: total 19 hits, and the longsword deals 1d8+2.
#[test]
fn level_one_fighter_hits_ac_twelve() {
    // The attack roll is the first rng draw after staging, so pick a seed
    // whose first d20 shows 15.
    let seed = (0..10_000u64)
        .find(|s| DiceRng::seed(*s).roll_die(20) == 15)
        .expect("some seed rolls a natural 15 first");

    let attacker = fighter(0, Side::Player).at(Position::new(1, 1));
    let mut target = fighter(1, Side::Enemy).at(Position::new(2, 1));
    target.stats.base_armor = 12; // DEX 10 keeps AC at 12
    let before = target.stats.hp.current;

    let mut state = staged(vec![attacker, target], vec![0, 1], seed);
    let mut engine = BattleEngine::new(&mut state);
    let events = engine.perform_attack(EntityId(0), Position::new(2, 1));

    let resolved = events.iter().find_map(|e| match e {
        BattleEvent::ActionResolved { hit, hp_delta, .. } => Some((*hit, *hp_delta)),
        _ => None,
    });
    let (hit, hp_delta) = resolved.expect("attack resolves");
    assert!(hit, "natural 15 + 4 beats AC 12");
    assert!(
        (3..=10).contains(&(-hp_delta)),
        "1d8+2 damage, got {hp_delta}"
    );
    let after = state.entity(EntityId(1)).unwrap().stats.hp.current;
    assert_eq!(after, before - (-hp_delta) as u32);
}

#[test]
fn killing_every_enemy_wins_and_halts_turns() {
    let hero = fighter(0, Side::Player).at(Position::new(1, 1));
    let mut goblin = fighter(1, Side::Enemy).at(Position::new(2, 1));
    goblin.stats.hp = ResourceMeter::new(1, 10);

    let mut state = staged(vec![hero, goblin], vec![0, 1], 3);
    // Batter the goblin until the 1 HP gives out; misses just retry.
    for attempt in 0..100 {
        let mut engine = BattleEngine::new(&mut state);
        engine.perform_attack(EntityId(0), Position::new(2, 1));
        state.budget.actions_remaining = 1;
        state.phase = BattlePhase::AwaitingInput;
        if state.entity(EntityId(1)).unwrap().is_defeated() {
            break;
        }
        assert!(attempt < 99, "goblin survived 100 swings");
    }

    let mut engine = BattleEngine::new(&mut state);
    let events = engine.advance_turn();
    assert!(events.contains(&BattleEvent::BattleEnded { victory: true }));
    assert_eq!(state.phase, BattlePhase::Victory);

    // Terminal state: no further turn advancement.
    let mut engine = BattleEngine::new(&mut state);
    assert!(engine.advance_turn().is_empty());
    assert_eq!(state.phase, BattlePhase::Victory);
}

#[test]
fn wiping_the_party_is_defeat() {
    let mut hero = fighter(0, Side::Player).at(Position::new(1, 1));
    hero.stats.hp = ResourceMeter::new(0, 24);
    let goblin = fighter(1, Side::Enemy).at(Position::new(2, 1));

    let mut state = staged(vec![hero, goblin], vec![0, 1], 3);
    let mut engine = BattleEngine::new(&mut state);
    let events = engine.advance_turn();
    assert!(events.contains(&BattleEvent::BattleEnded { victory: false }));
    assert_eq!(state.phase, BattlePhase::Defeat);
}

#[test]
fn defeated_entities_are_skipped_not_removed() {
    let hero = fighter(0, Side::Player).at(Position::new(0, 0));
    let mut fallen = fighter(1, Side::Enemy).at(Position::new(3, 3));
    fallen.stats.hp = ResourceMeter::new(0, 24);
    let standing = fighter(2, Side::Enemy).at(Position::new(4, 4));

    let mut state = staged(vec![hero, fallen, standing], vec![0, 1, 2], 3);
    let mut engine = BattleEngine::new(&mut state);
    engine.advance_turn();

    // The dead goblin keeps its slot but never gets the turn.
    assert_eq!(state.turn_order.len(), 3);
    assert_eq!(state.turn_order.current(), Some(EntityId(2)));
    assert!(state.entity(EntityId(2)).unwrap().is_alive());
    assert_eq!(state.phase, BattlePhase::EnemyTurn);
}

#[test]
fn healing_never_exceeds_max_hp() {
    let healer = fighter(0, Side::Player).at(Position::new(1, 1));
    let ally = fighter(1, Side::Player).at(Position::new(2, 1));
    let goblin = fighter(2, Side::Enemy).at(Position::new(6, 6));

    let heal = Ability {
        id: AbilityId(9),
        name: "Healing Word".into(),
        effects: vec![ActionEffect::heal(DiceSpec::new(2, 4, 2))],
        range: 4,
        aoe: None,
        slot_cost: 0,
        stamina_cost: 0,
    };
    let registry = Registry(vec![heal.clone()]);

    let mut state = staged(vec![healer, ally, goblin], vec![0, 1, 2], 8);
    state
        .entity_mut(EntityId(0))
        .unwrap()
        .stats
        .abilities
        .push(AbilityId(9));

    let max = state.entity(EntityId(1)).unwrap().stats.hp.maximum;
    let mut engine = BattleEngine::new(&mut state);
    engine.select_action(battle_core::ActionSelection::Cast(AbilityId(9)));
    let events = engine.handle_tile_interaction(2, 1, &registry);
    assert!(!events.is_empty(), "heal resolves against a full-HP ally");
    assert_eq!(state.entity(EntityId(1)).unwrap().stats.hp.current, max);
}

#[test]
fn area_abilities_hit_both_sides() {
    let caster = fighter(0, Side::Player).at(Position::new(0, 0));
    let ally = fighter(1, Side::Player).at(Position::new(4, 4));
    let goblin = fighter(2, Side::Enemy).at(Position::new(5, 4));

    // Status-only area ability: applies without a hit roll, so the
    // footprint result is deterministic.
    let nova = Ability {
        id: AbilityId(4),
        name: "Frost Nova".into(),
        effects: vec![ActionEffect::status(StatusApplication::new(
            StatusKind::Freeze,
            2,
            1,
        ))],
        range: 7,
        aoe: Some(AoeShape::Circle { radius: 1 }),
        slot_cost: 0,
        stamina_cost: 0,
    };
    let registry = Registry(vec![nova]);

    let mut state = staged(vec![caster, ally, goblin], vec![0, 1, 2], 5);
    state
        .entity_mut(EntityId(0))
        .unwrap()
        .stats
        .abilities
        .push(AbilityId(4));

    let mut engine = BattleEngine::new(&mut state);
    engine.select_action(battle_core::ActionSelection::Cast(AbilityId(4)));
    engine.handle_tile_interaction(4, 4, &registry);

    // No friendly-fire filter: the ally inside the footprint freezes too.
    assert!(state
        .entity(EntityId(1))
        .unwrap()
        .stats
        .statuses
        .has(StatusKind::Freeze));
    assert!(state
        .entity(EntityId(2))
        .unwrap()
        .stats
        .statuses
        .has(StatusKind::Freeze));
}

#[test]
fn stunned_actor_has_no_budget() {
    let mut hero = fighter(0, Side::Player).at(Position::new(0, 0));
    hero.stats
        .statuses
        .apply(StatusEffect::new(StatusKind::Stun, 2, 1));
    let goblin = fighter(1, Side::Enemy).at(Position::new(5, 5));

    // Goblin acts first; ending its turn opens the stunned hero's turn.
    let mut state = staged(vec![hero, goblin], vec![1, 0], 6);

    let mut engine = BattleEngine::new(&mut state);
    // Goblin ends its turn; the stunned hero comes up with nothing to do.
    let events = engine.end_turn();
    assert!(events.contains(&BattleEvent::TurnStarted { entity: EntityId(0) }));
    let turn_exhausted = engine.turn_exhausted();
    assert_eq!(state.budget.actions_remaining, 0);
    assert!(state.budget.has_moved);
    assert!(turn_exhausted);

    // Attacks and moves are silently ignored while stunned.
    let mut engine = BattleEngine::new(&mut state);
    assert!(engine.perform_attack(EntityId(0), Position::new(5, 5)).is_empty());
    assert!(engine.perform_move(EntityId(0), Position::new(1, 0)).is_empty());
}

#[test]
fn invalid_input_is_silently_ignored() {
    let hero = fighter(0, Side::Player).at(Position::new(0, 0));
    let goblin = fighter(1, Side::Enemy).at(Position::new(7, 7));
    let mut state = staged(vec![hero, goblin], vec![0, 1], 9);
    let registry = Registry(vec![]);

    let mut engine = BattleEngine::new(&mut state);
    // No selection yet: clicks do nothing.
    assert!(engine.handle_tile_interaction(3, 3, &registry).is_empty());

    // Move selection, unreachable destination (movement is 4).
    engine.select_action(battle_core::ActionSelection::Move);
    assert!(engine.handle_tile_interaction(7, 0, &registry).is_empty());

    // Attack selection, empty tile and out-of-range target.
    engine.select_action(battle_core::ActionSelection::Attack);
    engine.select_action(battle_core::ActionSelection::Attack); // toggle off
    engine.select_action(battle_core::ActionSelection::Attack);
    assert!(engine.handle_tile_interaction(4, 4, &registry).is_empty());
    assert!(engine.handle_tile_interaction(7, 7, &registry).is_empty());

    // Unknown ability id: no-op.
    engine.select_action(battle_core::ActionSelection::Cast(AbilityId(99)));
    assert!(engine.handle_tile_interaction(7, 7, &registry).is_empty());

    // Nothing was consumed by any of it.
    assert_eq!(state.budget.actions_remaining, 1);
    assert!(!state.budget.has_moved);
    assert_eq!(state.phase, BattlePhase::AwaitingInput);
}

#[test]
fn move_then_attack_spends_both_flags() {
    let hero = fighter(0, Side::Player).at(Position::new(0, 0));
    let goblin = fighter(1, Side::Enemy).at(Position::new(2, 0));
    let mut state = staged(vec![hero, goblin], vec![0, 1], 11);
    let registry = Registry(vec![]);

    let mut engine = BattleEngine::new(&mut state);
    engine.select_action(battle_core::ActionSelection::Move);
    let events = engine.handle_tile_interaction(1, 0, &registry);
    assert!(matches!(events.first(), Some(BattleEvent::Moved { .. })));
    assert_eq!(state.phase, BattlePhase::Animating);

    let mut engine = BattleEngine::new(&mut state);
    engine.finish_animation();
    assert_eq!(state.phase, BattlePhase::AwaitingInput);
    assert!(state.budget.has_moved);

    let mut engine = BattleEngine::new(&mut state);
    engine.select_action(battle_core::ActionSelection::Attack);
    let events = engine.handle_tile_interaction(2, 0, &registry);
    assert!(!events.is_empty());
    assert_eq!(state.budget.actions_remaining, 0);

    // Budget exhausted: the animation window hands the turn over.
    let mut engine = BattleEngine::new(&mut state);
    let events = engine.finish_animation();
    assert!(events.contains(&BattleEvent::TurnStarted { entity: EntityId(1) }));
    assert_eq!(state.phase, BattlePhase::EnemyTurn);
}

#[test]
fn start_rolls_initiative_for_both_sides() {
    let hero = fighter(0, Side::Player).at(Position::new(0, 0));
    let goblin = fighter(1, Side::Enemy).at(Position::new(5, 5));
    let mut state = BattleState::new(
        BattleGrid::open(8, 8, Adjacency::Eight),
        vec![hero, goblin],
        13,
    );

    let mut engine = BattleEngine::new(&mut state);
    let events = engine.start().expect("two combatants schedule fine");
    assert!(events.contains(&BattleEvent::RoundStarted { round: 1 }));
    assert_eq!(state.turn_order.len(), 2);
    assert!(matches!(
        state.phase,
        BattlePhase::AwaitingInput | BattlePhase::EnemyTurn
    ));

    // Idempotent once running.
    let mut engine = BattleEngine::new(&mut state);
    assert!(engine.start().unwrap().is_empty());
}

#[test]
fn empty_roster_fails_setup() {
    let mut state = BattleState::new(BattleGrid::open(4, 4, Adjacency::Eight), vec![], 1);
    let mut engine = BattleEngine::new(&mut state);
    assert!(engine.start().is_err());
}

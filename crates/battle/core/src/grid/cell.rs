//! Arena tiles and terrain hazards.

/// Environmental effect attached to a cell rather than an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileEffectKind {
    /// Flat fire damage to whoever starts a turn here.
    Fire,
    /// Flat poison damage to whoever starts a turn here.
    PoisonCloud,
    /// Small heal to whoever starts a turn here; boosts heals cast from it.
    HolyGround,
    /// Extra movement cost to enter.
    Mud,
}

impl TileEffectKind {
    /// Signed HP change for an entity starting its turn on the tile.
    pub fn entry_hp_delta(self, magnitude: u32) -> i32 {
        match self {
            TileEffectKind::Fire | TileEffectKind::PoisonCloud => -(magnitude as i32),
            TileEffectKind::HolyGround => magnitude as i32,
            TileEffectKind::Mud => 0,
        }
    }

    /// Additional cost to step into the tile.
    pub fn extra_move_cost(self) -> u32 {
        match self {
            TileEffectKind::Mud => 1,
            _ => 0,
        }
    }
}

/// A timed hazard on one cell. Durations are whole rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileEffect {
    pub kind: TileEffectKind,
    pub remaining_rounds: u32,
    pub magnitude: u32,
}

impl TileEffect {
    pub fn new(kind: TileEffectKind, remaining_rounds: u32, magnitude: u32) -> Self {
        Self {
            kind,
            remaining_rounds,
            magnitude,
        }
    }
}

/// One tile of the battle arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    /// Elevation in height units; drives the tactical bonus.
    pub height: i32,
    /// Base cost to step into this cell.
    pub move_cost: u32,
    /// Obstacles are never valid move destinations.
    pub is_obstacle: bool,
    /// Blocks line of sight when true.
    pub blocks_sight: bool,
    pub effect: Option<TileEffect>,
}

impl GridCell {
    /// Open floor at ground level.
    pub fn floor() -> Self {
        Self {
            height: 0,
            move_cost: 1,
            is_obstacle: false,
            blocks_sight: false,
            effect: None,
        }
    }

    /// Solid wall: impassable and sight-blocking.
    pub fn wall() -> Self {
        Self {
            height: 0,
            move_cost: 1,
            is_obstacle: true,
            blocks_sight: true,
            effect: None,
        }
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn with_cost(mut self, move_cost: u32) -> Self {
        self.move_cost = move_cost;
        self
    }

    pub fn with_effect(mut self, effect: TileEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn is_passable(&self) -> bool {
        !self.is_obstacle
    }

    /// Movement cost including any active terrain effect.
    pub fn effective_move_cost(&self) -> u32 {
        self.move_cost
            + self
                .effect
                .map(|e| e.kind.extra_move_cost())
                .unwrap_or(0)
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::floor()
    }
}

//! Dice and probability primitives.
//!
//! Every random outcome in the battle engine flows through [`DiceRng`], a
//! small explicit-state generator threaded by value through the rules and
//! resolver layers. Seeding is the caller's responsibility: the runtime
//! seeds one generator per battle session, tests inject fixed seeds.

/// How a d20 roll is taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollMode {
    #[default]
    Normal,
    /// Roll twice, keep the higher die.
    Advantage,
    /// Roll twice, keep the lower die.
    Disadvantage,
}

impl RollMode {
    /// Combines two roll modes. Advantage and disadvantage cancel out.
    pub fn combine(self, other: RollMode) -> RollMode {
        use RollMode::*;
        match (self, other) {
            (Normal, m) | (m, Normal) => m,
            (Advantage, Advantage) => Advantage,
            (Disadvantage, Disadvantage) => Disadvantage,
            (Advantage, Disadvantage) | (Disadvantage, Advantage) => Normal,
        }
    }
}

/// Result of a d20 roll, keeping both raw dice for audit and animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct D20Roll {
    /// The die that counts under the roll mode.
    pub value: u32,
    /// Both raw dice, in roll order.
    pub rolls: [u32; 2],
    pub mode: RollMode,
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output permuted from 64-bit LCG state. Deterministic
/// and small enough to live inside a serialized battle snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRng {
    state: u64,
}

impl DiceRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from an explicit seed.
    pub fn seed(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        // Discard the first output so nearby seeds diverge immediately.
        rng.next_u32();
        rng
    }

    /// Advance the LCG state by one step.
    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output function: xorshift high bits, then a random rotate.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generate the next random u32.
    pub fn next_u32(&mut self) -> u32 {
        self.step();
        Self::output(self.state)
    }

    /// Roll one die with `sides` faces (1..=sides).
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        (self.next_u32() % sides) + 1
    }

    /// Roll `count` dice with `sides` faces and sum them.
    pub fn roll_dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll_die(sides)).sum()
    }

    /// Roll a d100 (1-100 inclusive), for percentage-based chances.
    pub fn percent(&mut self) -> u32 {
        self.roll_die(100)
    }

    /// Roll a d20 under the given mode.
    ///
    /// Always rolls two dice so the frontend can show both; normal mode
    /// keeps the first.
    pub fn roll_d20(&mut self, mode: RollMode) -> D20Roll {
        let rolls = [self.roll_die(20), self.roll_die(20)];
        let value = match mode {
            RollMode::Normal => rolls[0],
            RollMode::Advantage => rolls[0].max(rolls[1]),
            RollMode::Disadvantage => rolls[0].min(rolls[1]),
        };
        D20Roll { value, rolls, mode }
    }
}

/// Standard ability modifier: `floor((score - 10) / 2)`.
///
/// Floor division, so a score of 7 gives -2, not -1.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus by character level: `floor((level - 1) / 4) + 2`.
pub fn proficiency_bonus(level: i32) -> i32 {
    (level - 1).div_euclid(4) + 2
}

/// A dice expression: `count`d`sides` + `bonus`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DiceSpec {
    pub const fn new(count: u32, sides: u32, bonus: i32) -> Self {
        Self { count, sides, bonus }
    }

    pub fn roll(&self, rng: &mut DiceRng) -> i32 {
        rng.roll_dice(self.count, self.sides) as i32 + self.bonus
    }

    /// Critical roll: the dice count doubles, the flat bonus does not.
    pub fn roll_crit(&self, rng: &mut DiceRng) -> i32 {
        rng.roll_dice(self.count * 2, self.sides) as i32 + self.bonus
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus > 0 {
            write!(f, "+{}", self.bonus)?;
        } else if self.bonus < 0 {
            write!(f, "{}", self.bonus)?;
        }
        Ok(())
    }
}

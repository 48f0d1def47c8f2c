//! Persons
//!
//! One person occupies exactly one grid cell. Skepticism class and
//! position are fixed at creation; the spreading sub-state advances
//! through the tagged `SpreadState` machine.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Pos;

/// Skepticism class, fixed at population generation.
///
/// S1 is credulous and always re-transmits; S4 is the most resistant and
/// only re-transmits with corroboration from multiple neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skepticism {
    S1,
    S2,
    S3,
    S4,
}

/// All classes, in index order.
pub const CLASSES: [Skepticism; 4] = [
    Skepticism::S1,
    Skepticism::S2,
    Skepticism::S3,
    Skepticism::S4,
];

impl Skepticism {
    /// Quota-array index for this class.
    pub fn index(self) -> usize {
        match self {
            Skepticism::S1 => 0,
            Skepticism::S2 => 1,
            Skepticism::S3 => 2,
            Skepticism::S4 => 3,
        }
    }

    /// Whether a person of this class accepts a rumor transmission and
    /// becomes a next-generation spreader.
    ///
    /// `corroborations` is the person's transmission count for the current
    /// generation, *including* the transmission being evaluated. Higher
    /// classes need two corroborating transmissions before their
    /// acceptance probability rises. Branches that accept or reject
    /// unconditionally draw no randomness, which keeps the draw stream of
    /// a seeded run stable.
    pub fn accepts(self, corroborations: u32, rng: &mut SmallRng) -> bool {
        match self {
            Skepticism::S1 => true,
            Skepticism::S2 => corroborations >= 2 || rng.gen::<f64>() < 2.0 / 3.0,
            Skepticism::S3 => {
                if corroborations < 2 {
                    rng.gen::<f64>() < 1.0 / 3.0
                } else {
                    rng.gen::<f64>() < 2.0 / 3.0
                }
            }
            Skepticism::S4 => corroborations >= 2 && rng.gen::<f64>() < 1.0 / 3.0,
        }
    }
}

/// Spreading sub-state of a person.
///
/// `Spreading` carries the suspended cooldown counter when a still-cooling
/// person is re-nominated by a neighbor; `check_spread` then resumes the
/// countdown instead of granting an action, so a person can never both act
/// and serve its cooldown in the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpreadState {
    /// No pending action and no active cooldown.
    #[default]
    Idle,
    /// Scheduled to attempt a spread action this generation.
    Spreading { suspended: Option<u32> },
    /// Has spread; counting down `cooldown` generations before becoming
    /// eligible again.
    Cooling { elapsed: u32 },
}

/// One simulated individual.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub skepticism: Skepticism,
    pub has_rumor: bool,
    /// Distinct transmissions received this generation. Reset to zero at
    /// the end of every generation.
    pub received_rumor_from: u32,
    pub state: SpreadState,
    pub pos: Pos,
    /// Cooldown length `L` in generations, copied from configuration.
    pub cooldown: u32,
}

impl Person {
    pub fn new(skepticism: Skepticism, pos: Pos, cooldown: u32) -> Self {
        Self {
            skepticism,
            has_rumor: false,
            received_rumor_from: 0,
            state: SpreadState::Idle,
            pos,
            cooldown,
        }
    }

    pub fn is_spreading(&self) -> bool {
        matches!(self.state, SpreadState::Spreading { .. })
    }

    /// Nominates this person as a next-generation spreader.
    ///
    /// Idle persons become `Spreading`; cooling persons become `Spreading`
    /// with their countdown suspended, to be resumed by `check_spread`.
    /// Re-nominating a spreader is a no-op.
    pub fn nominate(&mut self) {
        match self.state {
            SpreadState::Idle => self.state = SpreadState::Spreading { suspended: None },
            SpreadState::Cooling { elapsed } => {
                self.state = SpreadState::Spreading {
                    suspended: Some(elapsed),
                }
            }
            SpreadState::Spreading { .. } => {}
        }
    }

    /// Cooldown gate, evaluated once per generation for spreading persons
    /// only.
    ///
    /// Returns whether the person may execute its spread action. A person
    /// resuming a cooldown that has not yet run for `cooldown` generations
    /// goes back to `Cooling` with the counter advanced; one whose
    /// countdown is complete is granted a single action. With `cooldown`
    /// of zero the gate never blocks.
    pub fn check_spread(&mut self) -> bool {
        match self.state {
            SpreadState::Spreading { suspended: None } => true,
            SpreadState::Spreading {
                suspended: Some(elapsed),
            } => {
                if elapsed < self.cooldown {
                    self.state = SpreadState::Cooling {
                        elapsed: elapsed + 1,
                    };
                    false
                } else {
                    self.state = SpreadState::Spreading { suspended: None };
                    true
                }
            }
            // Only spreading persons are evaluated.
            SpreadState::Idle | SpreadState::Cooling { .. } => false,
        }
    }

    /// Transition taken on executing a spread action.
    pub fn begin_cooling(&mut self) {
        self.state = SpreadState::Cooling { elapsed: 0 };
    }
}

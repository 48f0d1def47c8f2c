//! Population Generation
//!
//! The `Population` arena is the single owner of every person record; the
//! grid and all working lists refer to persons by id. Generation places
//! persons at uniformly drawn distinct positions, assigns skepticism
//! classes with one of three strategies, and bootstraps the run with a
//! single seed spreader.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use tracing::{debug, info};

use crate::config::{RunMode, SimConfig};
use crate::engine;
use crate::error::SimError;
use crate::grid::{Grid, PersonId};
use crate::person::{Person, Skepticism, CLASSES};

/// Quota-consumption priority for the slow strategy: the most resistant
/// class claims the best-connected persons first.
const SLOW_PRIORITY: [Skepticism; 4] = [
    Skepticism::S4,
    Skepticism::S3,
    Skepticism::S2,
    Skepticism::S1,
];

/// Rotating class priorities for the fast strategy, one entry per phase of
/// the 4-phase cycle. Each person is assigned the first class with
/// remaining quota in the current phase's list, then the phase advances.
const FAST_PHASES: [[Skepticism; 4]; 4] = [
    [Skepticism::S1, Skepticism::S4, Skepticism::S2, Skepticism::S3],
    [Skepticism::S4, Skepticism::S2, Skepticism::S3, Skepticism::S1],
    [Skepticism::S2, Skepticism::S3, Skepticism::S1, Skepticism::S4],
    [Skepticism::S3, Skepticism::S1, Skepticism::S4, Skepticism::S2],
];

/// Grid plus the person arena it indexes into.
#[derive(Debug, Clone, Default)]
pub struct Population {
    grid: Grid,
    people: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a person on the grid and returns its id.
    pub fn place_person(&mut self, person: Person) -> Result<PersonId, SimError> {
        let id = self.people.len();
        self.grid.place(person.pos, id)?;
        self.people.push(person);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn people_mut(&mut self) -> &mut [Person] {
        &mut self.people
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id]
    }

    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.people[id]
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Occupied Moore neighbors of a person, in the fixed scan order.
    pub fn neighbors_of(&self, id: PersonId) -> Vec<PersonId> {
        self.grid.neighbors_of(self.people[id].pos)
    }

    /// Persons that have heard the rumor.
    pub fn infected_count(&self) -> usize {
        self.people.iter().filter(|p| p.has_rumor).count()
    }

    /// Assigned count per class, indexed S1..S4.
    pub fn class_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for p in &self.people {
            counts[p.skepticism.index()] += 1;
        }
        counts
    }

    /// Builds the initial population for a run: placement, class
    /// assignment per the configured strategy, and the bootstrap spread.
    pub fn generate(config: &SimConfig, rng: &mut SmallRng) -> Result<Self, SimError> {
        let n_persons = config.n_persons();
        if n_persons == 0 {
            return Err(SimError::EmptyPopulation);
        }
        if n_persons > Grid::capacity() {
            return Err(SimError::CapacityExceeded {
                requested: n_persons,
                capacity: Grid::capacity(),
            });
        }

        // Distinct positions, uniform without replacement.
        let mut positions = Grid::all_positions();
        positions.shuffle(rng);
        positions.truncate(n_persons);

        let mut population = Population::new();
        for pos in positions {
            // S1 is the construction placeholder; quota-driven strategies
            // leave it on persons no remaining quota matches.
            population.place_person(Person::new(Skepticism::S1, pos, config.cooldown))?;
        }

        let seed = match config.mode {
            RunMode::Random => population.assign_random(config, rng)?,
            RunMode::Slow => population.assign_slow(config, rng)?,
            RunMode::Fast => population.assign_fast(config, rng)?,
        };

        debug!(
            n_persons,
            ?seed,
            counts = ?population.class_counts(),
            "population generated"
        );

        // Bootstrap: the seed hears the rumor and performs one spread
        // before the generation loop starts. Corroboration counters are
        // cleared afterwards so generation 1 starts from a clean slate.
        let seed_person = population.person_mut(seed);
        seed_person.has_rumor = true;
        engine::spread_rumor(&mut population, seed, rng);
        for p in population.people_mut() {
            p.received_rumor_from = 0;
        }

        info!(
            n_persons,
            mode = ?config.mode,
            infected = population.infected_count(),
            "bootstrap spread complete"
        );
        Ok(population)
    }

    /// Random strategy: weighted class draw per person; only the expected
    /// proportions are guaranteed, not exact counts. Seed spreader is
    /// uniform over the whole population.
    fn assign_random(
        &mut self,
        config: &SimConfig,
        rng: &mut SmallRng,
    ) -> Result<PersonId, SimError> {
        let dist = WeightedIndex::new(config.class_weights())
            .map_err(|_| SimError::InvalidProportions)?;
        for p in &mut self.people {
            p.skepticism = CLASSES[dist.sample(rng)];
        }
        self.choose_uniform_seed(rng)
    }

    /// Slow strategy: persons sorted by occupied-neighbor degree
    /// descending (ties broken by a pre-sort shuffle), quotas consumed in
    /// S4-first priority so resistant classes cluster at the hubs. Seed
    /// spreader is uniform over the persons actually assigned S1.
    fn assign_slow(
        &mut self,
        config: &SimConfig,
        rng: &mut SmallRng,
    ) -> Result<PersonId, SimError> {
        // Degrees reflect the finished placement, before any assignment.
        let degrees: Vec<usize> = (0..self.people.len())
            .map(|id| self.neighbors_of(id).len())
            .collect();

        let mut ids: Vec<PersonId> = (0..self.people.len()).collect();
        ids.shuffle(rng);
        ids.sort_by_key(|&id| Reverse(degrees[id]));

        let mut quotas = config.class_targets();
        let mut s1_ids = Vec::new();
        for &id in &ids {
            let Some(class) = SLOW_PRIORITY
                .into_iter()
                .find(|c| quotas[c.index()] > 0)
            else {
                continue;
            };
            quotas[class.index()] -= 1;
            self.people[id].skepticism = class;
            if class == Skepticism::S1 {
                s1_ids.push(id);
            }
        }

        s1_ids
            .choose(rng)
            .copied()
            .ok_or(SimError::NoEligibleSpreader)
    }

    /// Fast strategy: persons sorted by position in row-major order and
    /// walked through the 4-phase rotating priority cycle. Seed spreader
    /// is uniform over the whole population.
    fn assign_fast(
        &mut self,
        config: &SimConfig,
        rng: &mut SmallRng,
    ) -> Result<PersonId, SimError> {
        let mut ids: Vec<PersonId> = (0..self.people.len()).collect();
        ids.sort_by_key(|&id| {
            let pos = self.people[id].pos;
            (pos.row, pos.col)
        });

        let mut quotas = config.class_targets();
        let mut phase = 0usize;
        for &id in &ids {
            if let Some(class) = FAST_PHASES[phase]
                .into_iter()
                .find(|c| quotas[c.index()] > 0)
            {
                quotas[class.index()] -= 1;
                self.people[id].skepticism = class;
            }
            phase = (phase + 1) % FAST_PHASES.len();
        }

        self.choose_uniform_seed(rng)
    }

    fn choose_uniform_seed(&self, rng: &mut SmallRng) -> Result<PersonId, SimError> {
        let ids: Vec<PersonId> = (0..self.people.len()).collect();
        ids.choose(rng).copied().ok_or(SimError::EmptyPopulation)
    }
}

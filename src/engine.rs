//! Spread Engine
//!
//! One call to `advance_one_generation` is one generation. Persons
//! nominated during a generation act in the next one: the set of spreaders
//! is snapshotted before any action runs, so all spread actions are
//! logically simultaneous over the step-start state.

use rand::rngs::SmallRng;

use crate::grid::PersonId;
use crate::population::Population;

/// Advances the population by one generation and returns the infected
/// count measured before this generation's spread actions were applied
/// (a rumor received now shows up in the next generation's count).
pub fn advance_one_generation(population: &mut Population, rng: &mut SmallRng) -> usize {
    let infected = population.infected_count();

    let spreaders: Vec<PersonId> = (0..population.len())
        .filter(|&id| population.person(id).is_spreading())
        .collect();
    for id in spreaders {
        if population.person_mut(id).check_spread() {
            spread_rumor(population, id, rng);
        }
    }

    // Corroboration is per generation, not cumulative.
    for p in population.people_mut() {
        p.received_rumor_from = 0;
    }

    infected
}

/// Executes one spread action: every neighbor hears the rumor, and each is
/// evaluated against its skepticism class (on its corroboration count
/// including this transmission, with fresh randomness per neighbor) to
/// decide whether it becomes a next-generation spreader. The actor enters
/// its cooldown.
pub fn spread_rumor(population: &mut Population, actor: PersonId, rng: &mut SmallRng) {
    let neighbors = population.neighbors_of(actor);
    let mut accepted = Vec::new();
    for id in neighbors {
        let neighbor = population.person_mut(id);
        neighbor.has_rumor = true;
        neighbor.received_rumor_from += 1;
        let corroborations = neighbor.received_rumor_from;
        if neighbor.skepticism.accepts(corroborations, rng) {
            accepted.push(id);
        }
    }
    for id in accepted {
        population.person_mut(id).nominate();
    }
    population.person_mut(actor).begin_cooling();
}

//! Round generation - tiles, target and the list of valid equations
//!
//! The game machine only depends on the [`RoundGenerator`] trait. Production
//! uses [`RandomRoundGenerator`] (seeded, so a seed replays the same boards);
//! tests and the tutorial use [`ScriptedRoundGenerator`] and
//! [`tutorial_board`].

use std::collections::BTreeMap;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::evaluator::evaluate;
use crate::types::{
    tile_label, EquationKey, Operator, RoundPayload, Tile, ValidEquation, PREFERRED_SOLUTIONS,
    TILE_COUNT, TILE_NUMBER_MAX, TILE_NUMBER_MIN,
};

/// Source of round payloads.
///
/// Every payload must carry a target with at least one valid equation, and
/// `valid_equations` must list exactly the ordered triples that hit it.
pub trait RoundGenerator {
    fn generate(&mut self) -> RoundPayload;
}

impl<G: RoundGenerator + ?Sized> RoundGenerator for Box<G> {
    fn generate(&mut self) -> RoundPayload {
        (**self).generate()
    }
}

/// Every integral result reachable on `tiles`, with the ordered triples that
/// produce it.
pub fn solutions(tiles: &[Tile; TILE_COUNT]) -> BTreeMap<i64, Vec<EquationKey>> {
    let mut by_result: BTreeMap<i64, Vec<EquationKey>> = BTreeMap::new();
    for i in 0..TILE_COUNT {
        for j in 0..TILE_COUNT {
            if j == i {
                continue;
            }
            for k in 0..TILE_COUNT {
                if k == i || k == j {
                    continue;
                }
                if let Ok(value) = evaluate(&[tiles[i], tiles[j], tiles[k]]).value {
                    by_result
                        .entry(value)
                        .or_default()
                        .push(EquationKey::new([i, j, k]));
                }
            }
        }
    }
    by_result
}

/// Ordered triples on `tiles` that evaluate to `target`.
pub fn valid_equations(tiles: &[Tile; TILE_COUNT], target: i64) -> Vec<ValidEquation> {
    solutions(tiles)
        .remove(&target)
        .unwrap_or_default()
        .into_iter()
        .map(|key| ValidEquation { key, result: target })
        .collect()
}

fn payload(tiles: [Tile; TILE_COUNT], target: i64, keys: Vec<EquationKey>) -> RoundPayload {
    RoundPayload {
        tiles,
        target,
        valid_equations: keys
            .into_iter()
            .map(|key| ValidEquation { key, result: target })
            .collect(),
    }
}

fn labelled(specs: [(Operator, i32); TILE_COUNT]) -> [Tile; TILE_COUNT] {
    std::array::from_fn(|i| {
        let (operator, number) = specs[i];
        Tile::new(operator, number, tile_label(i).unwrap_or('?'))
    })
}

const MAX_DEAL_ATTEMPTS: usize = 64;

/// Seeded random generator.
///
/// Deals random operators and numbers in `TILE_NUMBER_MIN..=TILE_NUMBER_MAX`,
/// then picks a target reached by between `PREFERRED_SOLUTIONS.0` and
/// `PREFERRED_SOLUTIONS.1` ordered triples. If no deal offers such a target
/// within `MAX_DEAL_ATTEMPTS`, the rarest reachable value is used instead.
#[derive(Debug, Clone)]
pub struct RandomRoundGenerator {
    rng: SmallRng,
    seed: u64,
}

impl RandomRoundGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn deal(&mut self) -> [Tile; TILE_COUNT] {
        let mut faces = [(Operator::Add, 0); TILE_COUNT];
        for face in faces.iter_mut() {
            let operator = Operator::ALL[self.rng.random_range(0..Operator::ALL.len())];
            let number = self.rng.random_range(TILE_NUMBER_MIN..=TILE_NUMBER_MAX);
            *face = (operator, number);
        }
        labelled(faces)
    }
}

impl RoundGenerator for RandomRoundGenerator {
    fn generate(&mut self) -> RoundPayload {
        let (min, max) = PREFERRED_SOLUTIONS;
        let mut fallback: Option<RoundPayload> = None;

        for attempt in 0..MAX_DEAL_ATTEMPTS {
            let tiles = self.deal();
            let mut by_result = solutions(&tiles);

            let preferred: Vec<i64> = by_result
                .iter()
                .filter(|(_, keys)| (min..=max).contains(&keys.len()))
                .map(|(value, _)| *value)
                .collect();

            if !preferred.is_empty() {
                let target = preferred[self.rng.random_range(0..preferred.len())];
                let keys = by_result.remove(&target).unwrap_or_default();
                debug!(
                    "dealt round on attempt {}: target {} with {} solutions",
                    attempt + 1,
                    target,
                    keys.len()
                );
                return payload(tiles, target, keys);
            }

            if fallback.is_none() {
                fallback = by_result
                    .into_iter()
                    .min_by_key(|(_, keys)| keys.len())
                    .map(|(target, keys)| payload(tiles, target, keys));
            }
        }

        warn!(
            "no target with {}..={} solutions after {} deals; using fallback",
            min, max, MAX_DEAL_ATTEMPTS
        );
        fallback.unwrap_or_else(|| {
            // all-addition boards always have integral results
            let tiles = self.deal().map(|t| Tile::new(Operator::Add, t.number, t.label));
            let mut by_result = solutions(&tiles);
            let target = by_result.keys().next().copied().unwrap_or_default();
            let keys = by_result.remove(&target).unwrap_or_default();
            payload(tiles, target, keys)
        })
    }
}

/// Replays a fixed list of payloads, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRoundGenerator {
    rounds: Vec<RoundPayload>,
    next: usize,
}

impl ScriptedRoundGenerator {
    pub fn new(rounds: Vec<RoundPayload>) -> Self {
        assert!(!rounds.is_empty(), "scripted generator needs at least one round");
        Self { rounds, next: 0 }
    }

    pub fn repeat(round: RoundPayload) -> Self {
        Self::new(vec![round])
    }

    /// Payloads handed out so far.
    pub fn dealt(&self) -> usize {
        self.next
    }
}

impl RoundGenerator for ScriptedRoundGenerator {
    fn generate(&mut self) -> RoundPayload {
        let round = self.rounds[self.next % self.rounds.len()].clone();
        self.next += 1;
        round
    }
}

/// The fixed board used by the tutorial: `A` is `+1`, `I` is `+2`, `J` is
/// `×5`, and the target is 11 (`1 + 2 × 5`).
pub fn tutorial_board() -> RoundPayload {
    use Operator::*;
    let tiles = labelled([
        (Add, 1),
        (Mul, 3),
        (Sub, 4),
        (Add, 6),
        (Div, 2),
        (Mul, 4),
        (Sub, 7),
        (Add, 8),
        (Add, 2),
        (Mul, 5),
    ]);
    let target = 11;
    RoundPayload {
        valid_equations: valid_equations(&tiles, target),
        tiles,
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_board_contains_the_worked_example() {
        let board = tutorial_board();
        assert_eq!(board.target, 11);
        assert_eq!(board.tiles[0].label, 'A');
        assert_eq!(board.tiles[9].label, 'J');
        let key = EquationKey::new([0, 8, 9]);
        assert!(board.valid_equations.iter().any(|v| v.key == key));
        assert!(board.valid_equations.iter().all(|v| v.result == 11));
    }

    #[test]
    fn solutions_respect_selection_order() {
        use Operator::*;
        let tiles = labelled([
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 1),
            (Add, 2),
            (Add, 3),
        ]);
        // 1 + 2 + 3 = 6 from A, I, J in every order, and from each of B..H
        // in place of A
        let keys = valid_equations(&tiles, 6);
        assert_eq!(keys.len(), 8 * 6);
        assert!(keys.iter().any(|v| v.key == EquationKey::new([0, 8, 9])));
        assert!(keys.iter().any(|v| v.key == EquationKey::new([9, 8, 0])));
    }

    #[test]
    fn solutions_never_repeat_a_tile() {
        let board = tutorial_board();
        for keys in solutions(&board.tiles).values() {
            for key in keys {
                let [i, j, k] = key.indices();
                assert!(i != j && j != k && i != k);
            }
        }
    }

    #[test]
    fn random_generator_is_deterministic_per_seed() {
        let mut a = RandomRoundGenerator::new(42);
        let mut b = RandomRoundGenerator::new(42);
        for _ in 0..3 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn random_rounds_are_solvable_and_consistent() {
        let mut generator = RandomRoundGenerator::new(7);
        for _ in 0..20 {
            let round = generator.generate();
            assert!(!round.valid_equations.is_empty());
            for tile in &round.tiles {
                assert!((TILE_NUMBER_MIN..=TILE_NUMBER_MAX).contains(&tile.number));
            }
            let expected = valid_equations(&round.tiles, round.target);
            assert_eq!(round.valid_equations, expected);
        }
    }

    #[test]
    fn scripted_generator_cycles() {
        let board = tutorial_board();
        let mut other = board.clone();
        other.target = 12;
        let mut generator = ScriptedRoundGenerator::new(vec![board.clone(), other.clone()]);
        assert_eq!(generator.generate(), board);
        assert_eq!(generator.generate(), other);
        assert_eq!(generator.generate(), board);
        assert_eq!(generator.dealt(), 3);
    }
}

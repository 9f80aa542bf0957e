//! Monte Carlo estimation of dice pool success probabilities.
//!
//! For every pool size up to a limit and every obstacle up to a limit,
//! repeated trials roll the pool, count dice at or above the success
//! threshold, apply the signed modifier, and record whether the result
//! met the obstacle. The estimates converge statistically with the
//! sample size; nothing beyond that is deterministic across runs.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{FormulaError, FormulaResult};

/// Parameters for one probability simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Faces per die.
    pub die_faces: u32,
    /// A die at or above this value is a success.
    pub success_threshold: u32,
    /// Largest pool size to tabulate.
    pub dice_limit: u32,
    /// Largest obstacle to tabulate.
    pub obstacle_limit: u32,
    /// Trials per table cell.
    pub sample_size: u32,
    /// Automatic successes (positive) or penalties (negative) added to
    /// every trial's success count.
    pub modifier: i32,
}

impl SimulationParameters {
    fn validate(&self) -> FormulaResult<()> {
        if self.die_faces == 0
            || self.dice_limit == 0
            || self.obstacle_limit == 0
            || self.sample_size == 0
        {
            return Err(FormulaError::InvalidSimulation(
                "die faces, dice limit, obstacle limit, and sample size must be positive"
                    .to_string(),
            ));
        }
        if self.success_threshold < 1 || self.success_threshold > self.die_faces {
            return Err(FormulaError::InvalidSimulation(format!(
                "success threshold {} outside 1..={}",
                self.success_threshold, self.die_faces
            )));
        }
        Ok(())
    }
}

/// Estimated success probabilities, in whole percent, for every
/// `(pool size, obstacle)` combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    // rows[pool_size - 1][obstacle - 1]
    rows: Vec<Vec<u32>>,
}

impl ProbabilityTable {
    /// The estimated probability (0..=100) that a pool of `pool_size`
    /// dice meets `obstacle`, or `None` outside the tabulated range.
    pub fn percent(&self, pool_size: u32, obstacle: u32) -> Option<u32> {
        let row = self.rows.get(pool_size.checked_sub(1)? as usize)?;
        row.get(obstacle.checked_sub(1)? as usize).copied()
    }

    /// Largest tabulated pool size.
    pub fn dice_limit(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Largest tabulated obstacle.
    pub fn obstacle_limit(&self) -> u32 {
        self.rows.first().map_or(0, |row| row.len() as u32)
    }
}

impl std::fmt::Display for ProbabilityTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dice")?;
        for obstacle in 1..=self.obstacle_limit() {
            write!(f, " Ob{obstacle:>2}")?;
        }
        writeln!(f)?;
        for (i, row) in self.rows.iter().enumerate() {
            write!(f, "{:>4}", i + 1)?;
            for percent in row {
                write!(f, " {percent:>4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Run the simulation with the caller's RNG.
pub fn simulate(
    params: &SimulationParameters,
    rng: &mut StdRng,
) -> FormulaResult<ProbabilityTable> {
    params.validate()?;
    let mut rows = Vec::with_capacity(params.dice_limit as usize);
    for pool_size in 1..=params.dice_limit {
        let mut row = Vec::with_capacity(params.obstacle_limit as usize);
        for obstacle in 1..=params.obstacle_limit {
            let mut hits: u32 = 0;
            for _ in 0..params.sample_size {
                let mut successes: i64 = 0;
                for _ in 0..pool_size {
                    if rng.random_range(1..=params.die_faces) >= params.success_threshold {
                        successes += 1;
                    }
                }
                if successes + i64::from(params.modifier) >= i64::from(obstacle) {
                    hits += 1;
                }
            }
            let percent = (100.0 * f64::from(hits) / f64::from(params.sample_size)).round();
            row.push(percent as u32);
        }
        rows.push(row);
    }
    Ok(ProbabilityTable { rows })
}

/// Run the simulation with a freshly seeded RNG, for reproducible
/// tables.
pub fn simulate_seeded(
    params: &SimulationParameters,
    seed: u64,
) -> FormulaResult<ProbabilityTable> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(params, &mut rng)
}

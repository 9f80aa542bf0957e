//! Symbolic formula engine for tabletop character sheets.
//!
//! Resolves `@`-prefixed references in free text against an entity
//! graph (via `glyph-core`), normalizes informal dice notation into
//! canonical `NdM` form, analyzes damage formulas deterministically
//! (min/mean/max), and estimates dice pool success probabilities by
//! Monte Carlo simulation. All of it is synchronous, single-threaded,
//! and bounded: one call processes one text or one parameter set over
//! an in-memory snapshot.

pub mod damage;
pub mod dice;
pub mod error;
pub mod eval;
pub mod normalize;
pub mod reference;
pub mod simulate;
pub mod token;

pub use damage::{DamageFinding, DamageFormula};
pub use dice::{DEFAULT_FACES, DiceTermMatch, scan_dice_terms};
pub use error::{FormulaError, FormulaResult};
pub use eval::evaluate;
pub use normalize::{normalize_roll_formula, strip_references};
pub use reference::{ResolutionMap, ResolveScope};
pub use simulate::{ProbabilityTable, SimulationParameters, simulate, simulate_seeded};
pub use token::{RefToken, scan_references};

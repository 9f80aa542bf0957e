//! Damage formula aggregation and analysis.
//!
//! A [`DamageFinding`] collects the damage formulas of one skill,
//! ability, or expertise, together with the context entity its
//! `@`-references resolve against. Queries substitute resolved values
//! and dice stand-ins into the text and evaluate the remaining
//! arithmetic, yielding a lower bound, central estimate, and upper
//! bound for the damage.

use glyph_core::{EntityId, Value};
use tracing::warn;

use crate::dice::scan_dice_terms;
use crate::eval;
use crate::reference::ResolveScope;
use crate::token::scan_references;

/// One damage component: a formula string typed by the kind of damage
/// it deals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageFormula {
    /// The formula text, possibly containing `@`-references and dice
    /// terms.
    pub formula: String,
    /// The kind of damage (cut, bash, burn, ...).
    pub damage_type: String,
}

impl DamageFormula {
    /// Create a damage component.
    pub fn new(formula: impl Into<String>, damage_type: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            damage_type: damage_type.into(),
        }
    }
}

/// Which deterministic stand-in replaces a dice term during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiceBound {
    /// Every die shows a one: the term contributes `count`.
    Min,
    /// Conventional midpoint: the term contributes `count * faces / 2`.
    Mean,
    /// Every die shows its maximum: the term contributes
    /// `count * faces`.
    Max,
}

/// The damage sources of one sheet item, assembled for display or
/// analysis.
///
/// Findings are built fresh for each analysis pass and borrow their
/// resolution scope; they are never persisted.
#[derive(Debug, Clone)]
pub struct DamageFinding<'a> {
    /// Display name of the owning item.
    pub name: String,
    /// ID of the owning item.
    pub id: EntityId,
    /// This item's own damage components.
    pub formulas: Vec<DamageFormula>,
    /// Findings for sub-components (abilities attached to a skill).
    pub children: Vec<DamageFinding<'a>>,
    /// Scope that `@`-references resolve in, if the item has one.
    pub scope: Option<ResolveScope<'a>>,
}

impl<'a> DamageFinding<'a> {
    /// Create an empty finding for the named item.
    pub fn new(name: impl Into<String>, id: EntityId) -> Self {
        Self {
            name: name.into(),
            id,
            formulas: Vec::new(),
            children: Vec::new(),
            scope: None,
        }
    }

    /// Set the resolution scope.
    pub fn with_scope(mut self, scope: ResolveScope<'a>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Add a damage component.
    pub fn with_formula(mut self, formula: DamageFormula) -> Self {
        self.formulas.push(formula);
        self
    }

    /// Add a child finding.
    pub fn with_child(mut self, child: DamageFinding<'a>) -> Self {
        self.children.push(child);
        self
    }

    /// This item's own formulas joined with `" + "`.
    pub fn full_formula(&self) -> String {
        let parts: Vec<&str> = self.formulas.iter().map(|f| f.formula.as_str()).collect();
        parts.join(" + ")
    }

    /// All damage components of this finding and its children,
    /// depth-first.
    pub fn all_formulas(&self) -> Vec<&DamageFormula> {
        let mut out: Vec<&DamageFormula> = self.formulas.iter().collect();
        for child in &self.children {
            out.extend(child.all_formulas());
        }
        out
    }

    /// The full formula with every `@`-reference replaced by its
    /// resolved numeric value.
    ///
    /// Resolved leveled entities substitute their modified level (or
    /// base level); plain numbers substitute themselves; anything else,
    /// including unresolved references, substitutes `0`. Substitution
    /// works on recorded token spans in a single left-to-right pass, so
    /// one resolved name being a substring of another cannot corrupt
    /// its neighbors.
    pub fn resolved_formula(&self) -> String {
        let source = self.full_formula();
        let tokens = scan_references(&source);
        if tokens.is_empty() {
            return source;
        }
        let resolved = self.scope.map(|scope| scope.resolve_references(&source));
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for token in &tokens {
            out.push_str(&source[cursor..token.span.start]);
            let value = resolved
                .as_ref()
                .and_then(|map| map.get(&token.dedup_key()))
                .and_then(|entry| entry.as_ref());
            out.push_str(&substitution_text(value));
            cursor = token.span.end;
        }
        out.push_str(&source[cursor..]);
        out
    }

    /// Lower damage bound: every die contributes one.
    pub fn min_damage(&self) -> f64 {
        self.analyze(DiceBound::Min)
    }

    /// Central damage estimate, using the `count * faces / 2`
    /// convention for each dice term.
    pub fn mean_damage(&self) -> f64 {
        self.analyze(DiceBound::Mean)
    }

    /// Upper damage bound: every die contributes its face count.
    pub fn max_damage(&self) -> f64 {
        self.analyze(DiceBound::Max)
    }

    fn analyze(&self, bound: DiceBound) -> f64 {
        if self.formulas.is_empty() {
            return 0.0;
        }
        let resolved = self.resolved_formula();
        let substituted = substitute_dice(&resolved, bound);
        match eval::evaluate(&substituted) {
            Ok(value) => value,
            Err(error) => {
                warn!(
                    finding = %self.name,
                    formula = %substituted,
                    %error,
                    "damage formula did not evaluate"
                );
                0.0
            }
        }
    }
}

/// The text substituted for one resolved reference.
fn substitution_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Entity(entity)) => entity
            .effective_level()
            .map(|level| level.to_string())
            .unwrap_or_else(|| "0".to_string()),
        Some(other) => other
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| "0".to_string()),
        None => "0".to_string(),
    }
}

/// Replace every well-formed dice term with its deterministic stand-in.
///
/// Terms without an explicit face count are malformed in an existing
/// damage formula (faces are only defaulted when *normalizing* a roll
/// formula) and are left as literal text, which makes the later
/// arithmetic evaluation fail and the query fold to zero.
fn substitute_dice(formula: &str, bound: DiceBound) -> String {
    let terms = scan_dice_terms(formula);
    let mut out = String::with_capacity(formula.len());
    let mut cursor = 0;
    for term in terms {
        let Some(faces) = term.faces else {
            continue;
        };
        let stand_in = match bound {
            DiceBound::Min => f64::from(term.count),
            DiceBound::Mean => f64::from(term.count) * f64::from(faces) / 2.0,
            DiceBound::Max => f64::from(term.count) * f64::from(faces),
        };
        out.push_str(&formula[cursor..term.span.start]);
        out.push_str(&format_number(stand_in));
        cursor = term.span.end;
    }
    out.push_str(&formula[cursor..]);
    out
}

/// Format a number without a trailing `.0` when it is integral.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

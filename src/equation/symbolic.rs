use crate::enumeration::{EnumerationResult, Organism};
use crate::equation::BooleanEquation;
use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Symbolic encoding of community families over the key species of one enumeration.
///
/// Every key species is a BDD variable and a community is the valuation where exactly
/// its members are `true`. This allows comparing the family described by a
/// [`BooleanEquation`] with the enumerated family exactly, not just by their sizes.
pub struct SymbolicFamily {
    variables: BddVariableSet,
    organisms: BTreeMap<Organism, BddVariable>,
}

impl SymbolicFamily {
    /// Create an encoding for the key species of `result`, or `None` when there are
    /// too many key species for the BDD variable set.
    pub fn new(result: &EnumerationResult) -> Option<SymbolicFamily> {
        let count = u16::try_from(result.union().len()).ok()?;
        let variables = BddVariableSet::new_anonymous(count);
        let organisms = result
            .union()
            .iter()
            .cloned()
            .zip(variables.variables())
            .collect();
        Some(SymbolicFamily {
            variables,
            organisms,
        })
    }

    /// The singleton family containing exactly `community`.
    ///
    /// Organisms outside the key species are ignored.
    pub fn community(&self, community: &BTreeSet<Organism>) -> Bdd {
        self.organisms
            .iter()
            .fold(self.variables.mk_true(), |acc, (organism, var)| {
                if community.contains(organism) {
                    acc.and(&self.variables.mk_var(*var))
                } else {
                    acc.and(&self.variables.mk_not_var(*var))
                }
            })
    }

    /// The family of all enumerated solutions of `result`.
    pub fn enumeration(&self, result: &EnumerationResult) -> Bdd {
        result
            .solutions()
            .fold(self.variables.mk_false(), |acc, solution| {
                acc.or(&self.community(solution))
            })
    }

    /// The family of communities picking exactly one organism of every group, and no
    /// organism outside the groups.
    ///
    /// Returns `None` if a group member is not a key species.
    pub fn exactly_one_of_each(&self, groups: &[Vec<Organism>]) -> Option<Bdd> {
        let mut result = self.variables.mk_true();
        let mut grouped = BTreeSet::new();
        for group in groups {
            // `none`: no member picked so far, `one`: exactly one member picked so far.
            let mut none = self.variables.mk_true();
            let mut one = self.variables.mk_false();
            for organism in group {
                let var = *self.organisms.get(organism)?;
                let picked = self.variables.mk_var(var);
                let skipped = self.variables.mk_not_var(var);
                one = one.and(&skipped).or(&none.and(&picked));
                none = none.and(&skipped);
                grouped.insert(organism);
            }
            result = result.and(&one);
        }
        for (organism, var) in &self.organisms {
            if !grouped.contains(organism) {
                result = result.and(&self.variables.mk_not_var(*var));
            }
        }
        Some(result)
    }
}

/// Check that `equation` describes exactly the enumerated solutions of `result`.
///
/// Returns `None` when the check cannot be performed (too many key species, or an
/// equation over organisms that are not key species).
pub fn matches_enumeration(equation: &BooleanEquation, result: &EnumerationResult) -> Option<bool> {
    let family = SymbolicFamily::new(result)?;
    let expected = family.enumeration(result);
    let actual = family.exactly_one_of_each(&equation.groups)?;
    debug!(
        "Symbolic check: enumeration has {} communities (BDD nodes={}), equation has {} (BDD nodes={}).",
        expected.cardinality(),
        expected.size(),
        actual.cardinality(),
        actual.size()
    );
    Some(expected == actual)
}

use crate::competitors::{CompetitorGroup, competitors_of};
use crate::enumeration::{EnumerationResult, Organism};
use cancel_this::is_cancelled;
use computation_process::Incomplete::Suspended;
use computation_process::{Completable, GeneratorStep};
use log::{debug, trace};
use std::collections::BTreeSet;

/// Internal state of the [`CompetitorGroups`](crate::competitors::CompetitorGroups) generator.
pub struct CompetitorState {
    /// Organisms that still need to be processed (processed from the back).
    pending: Vec<Organism>,
    /// Groups that were already produced.
    emitted: BTreeSet<CompetitorGroup>,
}

/// Step implementation of the competitor group extraction.
///
/// Each step processes one organism and produces its group, unless an identical group
/// was already produced.
pub struct CompetitorStep;

impl From<&EnumerationResult> for CompetitorState {
    fn from(value: &EnumerationResult) -> Self {
        CompetitorState {
            pending: value.union().iter().rev().cloned().collect(),
            emitted: BTreeSet::new(),
        }
    }
}

impl GeneratorStep<EnumerationResult, CompetitorState, CompetitorGroup> for CompetitorStep {
    fn step(
        context: &EnumerationResult,
        state: &mut CompetitorState,
    ) -> Completable<Option<CompetitorGroup>> {
        let Some(organism) = state.pending.pop() else {
            return Ok(None);
        };
        is_cancelled!()?;

        let mut group = competitors_of(context, &organism);
        if group.is_empty() {
            trace!("`{organism}` has no competitors.");
        } else {
            debug!(
                "`{}` competes with ({}).",
                organism,
                crate::log_organisms(&group)
            );
        }
        group.insert(organism);

        if state.emitted.contains(&group) {
            Err(Suspended)
        } else {
            state.emitted.insert(group.clone());
            Ok(Some(group))
        }
    }
}

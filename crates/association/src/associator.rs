//! Associator: one-to-one nearest-distance matching of updated previous
//! objects against the objects reported in the current cycle.

use std::collections::BTreeMap;

use contracts::{MatchingStrategy, ReferencePoint};
use tracing::instrument;

use crate::located::{distance, Located};

/// One committed previous/current pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub previous: usize,
    pub current: usize,
    /// Reference-point distance (meters)
    pub distance: f64,
}

/// Partial bijection from previous-object index to current-object index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationMap {
    by_previous: BTreeMap<usize, Match>,
    by_current: BTreeMap<usize, usize>,
}

impl AssociationMap {
    /// Commit a pair; refused if either side is already matched
    fn insert(&mut self, m: Match) -> bool {
        if self.by_previous.contains_key(&m.previous) || self.by_current.contains_key(&m.current)
        {
            return false;
        }
        self.by_current.insert(m.current, m.previous);
        self.by_previous.insert(m.previous, m);
        true
    }

    pub fn get(&self, previous: usize) -> Option<&Match> {
        self.by_previous.get(&previous)
    }

    /// Current index matched to `previous`
    pub fn current_for(&self, previous: usize) -> Option<usize> {
        self.by_previous.get(&previous).map(|m| m.current)
    }

    /// Previous index matched to `current`
    pub fn previous_for(&self, current: usize) -> Option<usize> {
        self.by_current.get(&current).copied()
    }

    /// Matches ordered by previous index
    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.by_previous.values()
    }

    /// `(previous, current)` index pairs ordered by previous index
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.iter().map(|m| (m.previous, m.current)).collect()
    }

    pub fn len(&self) -> usize {
        self.by_previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_previous.is_empty()
    }
}

/// All `(prev, cur, distance)` triples within `radius`
fn gated_pairs<C, P>(
    current: &[C],
    updated_prev: &[P],
    radius: f64,
    reference: ReferencePoint,
) -> Vec<Match>
where
    C: Located,
    P: Located,
{
    let mut pairs = Vec::new();
    for (previous, p) in updated_prev.iter().enumerate() {
        for (cur_idx, c) in current.iter().enumerate() {
            if let Some(d) = distance(p, c, reference) {
                if d <= radius {
                    pairs.push(Match {
                        previous,
                        current: cur_idx,
                        distance: d,
                    });
                }
            }
        }
    }
    pairs
}

/// Global greedy nearest-distance association
///
/// Every pair within `radius` is ranked by `(distance, previous, current)`
/// and committed in that order unless one of its sides is already taken.
/// Objects with nothing in range stay unmatched.
#[instrument(
    name = "association_associate",
    level = "trace",
    skip(current, updated_prev),
    fields(current = current.len(), previous = updated_prev.len())
)]
pub fn associate<C, P>(
    current: &[C],
    updated_prev: &[P],
    radius: f64,
    reference: ReferencePoint,
) -> AssociationMap
where
    C: Located,
    P: Located,
{
    let mut pairs = gated_pairs(current, updated_prev, radius, reference);
    pairs.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.previous.cmp(&b.previous))
            .then(a.current.cmp(&b.current))
    });

    let mut map = AssociationMap::default();
    for pair in pairs {
        map.insert(pair);
    }
    map
}

/// Per-object scan association
///
/// Previous objects are visited in index order; each takes the first
/// still-unclaimed current object within `radius`.
pub fn associate_first_within_radius<C, P>(
    current: &[C],
    updated_prev: &[P],
    radius: f64,
    reference: ReferencePoint,
) -> AssociationMap
where
    C: Located,
    P: Located,
{
    let mut map = AssociationMap::default();
    for (previous, p) in updated_prev.iter().enumerate() {
        let found = current.iter().enumerate().find_map(|(cur_idx, c)| {
            if map.previous_for(cur_idx).is_some() {
                return None;
            }
            let d = distance(p, c, reference)?;
            (d <= radius).then_some(Match {
                previous,
                current: cur_idx,
                distance: d,
            })
        });
        if let Some(m) = found {
            map.insert(m);
        }
    }
    map
}

/// Dispatch on the configured [`MatchingStrategy`]
pub fn associate_with_strategy<C, P>(
    strategy: MatchingStrategy,
    current: &[C],
    updated_prev: &[P],
    radius: f64,
    reference: ReferencePoint,
) -> AssociationMap
where
    C: Located,
    P: Located,
{
    match strategy {
        MatchingStrategy::GlobalGreedy => associate(current, updated_prev, radius, reference),
        MatchingStrategy::FirstWithinRadius => {
            associate_first_within_radius(current, updated_prev, radius, reference)
        }
    }
}

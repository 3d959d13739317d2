//! Dependency-graph walks
//!
//! The graph itself lives on the cells as symmetric `influence_from` /
//! `influence_on` sets; this module holds the two traversals the write path
//! needs: cycle detection before a write commits, and the re-evaluation
//! order for the written cell's dependents.

use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeSet, VecDeque};
use vellum_core::Coordinate;

use crate::cell::Cell;

pub(crate) type CellMap = AHashMap<Coordinate, Cell>;

/// Check whether writing `target` with `new_references` would close a cycle
///
/// Walks `influence_from` edges breadth-first from every coordinate in the
/// new reference set; if `target` is reachable, the write would make it a
/// member of a cycle. Returns the closing chain (seed reference through to
/// `target`) for error reporting, or `None` when the write is safe.
pub(crate) fn find_cycle(
    cells: &CellMap,
    target: Coordinate,
    new_references: &BTreeSet<Coordinate>,
) -> Option<Vec<Coordinate>> {
    if new_references.contains(&target) {
        // Direct self-reference
        return Some(vec![target]);
    }

    let mut parents: AHashMap<Coordinate, Option<Coordinate>> = AHashMap::default();
    let mut queue: VecDeque<Coordinate> = VecDeque::new();
    for &seed in new_references {
        parents.insert(seed, None);
        queue.push_back(seed);
    }

    while let Some(current) = queue.pop_front() {
        let Some(cell) = cells.get(&current) else {
            continue;
        };
        for &next in cell.influence_from() {
            if next == target {
                // Reconstruct seed -> ... -> current -> target
                let mut chain = vec![target, current];
                let mut walk = current;
                while let Some(Some(parent)) = parents.get(&walk) {
                    chain.push(*parent);
                    walk = *parent;
                }
                chain.reverse();
                return Some(chain);
            }
            if !parents.contains_key(&next) {
                parents.insert(next, Some(current));
                queue.push_back(next);
            }
        }
    }

    None
}

/// Re-evaluation order for a write at `seed`
///
/// The seed first, then every transitive dependent over `influence_on`
/// edges, each cell appearing only after all of its precedents within the
/// affected set (reverse DFS post-order; valid because the graph is kept
/// acyclic).
pub(crate) fn propagation_order(cells: &CellMap, seed: Coordinate) -> Vec<Coordinate> {
    let mut order = Vec::new();
    let mut visited = AHashSet::default();
    visit(cells, seed, &mut visited, &mut order);
    order.reverse();
    order
}

fn visit(
    cells: &CellMap,
    current: Coordinate,
    visited: &mut AHashSet<Coordinate>,
    order: &mut Vec<Coordinate>,
) {
    if !visited.insert(current) {
        return;
    }
    if let Some(cell) = cells.get(&current) {
        for &dependent in cell.influence_on() {
            visit(cells, dependent, visited, order);
        }
    }
    order.push(current);
}

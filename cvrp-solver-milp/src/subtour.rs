//! Detection of customer cycles that never visit the depot.

use std::collections::{BTreeMap, BTreeSet};

use cvrp_core::{Assignment, DEPOT};

use crate::formulation::ArcIndex;

/// Customer sets forming a selected cycle that avoids the depot.
///
/// Each vehicle's selected arcs are followed from the depot; every selected
/// arc the walk never reaches belongs to a detached cycle. Cycles are
/// reported as sorted node lists, deduplicated across vehicles, in ascending
/// order. An empty result means the selection is free of subtours.
#[must_use]
pub fn find_subtours(arcs: &ArcIndex, assignment: &Assignment) -> Vec<Vec<usize>> {
    let mut cycles = BTreeSet::new();
    for vehicle in 0..arcs.vehicles() {
        let successors = selected_successors(arcs, assignment, vehicle);
        let mut reached = walk(&successors, DEPOT);
        for &origin in successors.keys() {
            if reached.contains(&origin) {
                continue;
            }
            let path = walk_path(&successors, origin);
            reached.extend(path.iter().copied());
            if let Some(cycle) = closing_cycle(&successors, &path)
                && !cycle.contains(&DEPOT)
            {
                cycles.insert(cycle);
            }
        }
    }
    cycles.into_iter().collect()
}

/// First selected successor of every origin for `vehicle`.
fn selected_successors(
    arcs: &ArcIndex,
    assignment: &Assignment,
    vehicle: usize,
) -> BTreeMap<usize, usize> {
    let mut successors = BTreeMap::new();
    for arc in arcs.vehicle_arcs(vehicle) {
        if assignment.is_selected(arc.var) {
            successors.entry(arc.from).or_insert(arc.to);
        }
    }
    successors
}

fn walk(successors: &BTreeMap<usize, usize>, start: usize) -> BTreeSet<usize> {
    walk_path(successors, start).into_iter().collect()
}

/// Nodes reached from `start` until a node repeats or has no successor.
fn walk_path(successors: &BTreeMap<usize, usize>, start: usize) -> Vec<usize> {
    let mut path = vec![start];
    let mut seen = BTreeSet::from([start]);
    let mut current = start;
    while let Some(&next) = successors.get(&current) {
        if !seen.insert(next) {
            break;
        }
        path.push(next);
        current = next;
    }
    path
}

/// The cycle the path ends in, if its last node points back into it.
fn closing_cycle(successors: &BTreeMap<usize, usize>, path: &[usize]) -> Option<Vec<usize>> {
    let last = path.last()?;
    let target = successors.get(last)?;
    let start = path.iter().position(|node| node == target)?;
    let mut cycle = path.get(start..)?.to_vec();
    cycle.sort_unstable();
    Some(cycle)
}

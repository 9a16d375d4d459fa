//! Three-index vehicle flow formulation of the CVRP.
//!
//! For a trial vehicle count `K` the model carries one binary variable
//! `x[i][j][k]` per ordered node pair `i != j` and vehicle `k`. It minimises
//! the total cost of selected arcs subject to coverage, depot boundary, flow
//! conservation, capacity and subtour elimination constraints.

use cvrp_core::{CostMatrix, DEPOT, LinearConstraint, LinearExpr, MilpModel, VarId};

/// How subtour elimination constraints enter the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubtourMode {
    /// Start without subtour cuts. After each optimal solve, add a cut for
    /// every customer cycle that avoids the depot and solve again.
    #[default]
    Lazy,
    /// Add a cut for every customer subset of size two or more before the
    /// first solve.
    ///
    /// The number of cuts grows as `2^n` in the customer count, so this mode
    /// only suits small instances.
    Exhaustive,
}

/// One arc variable: vehicle `vehicle` travelling from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcVar {
    /// Origin node.
    pub from: usize,
    /// Destination node.
    pub to: usize,
    /// Vehicle index in `0..K`.
    pub vehicle: usize,
    /// Model variable.
    pub var: VarId,
}

/// Mapping between `(from, to, vehicle)` triples and model variables.
///
/// Variables are declared vehicle by vehicle, then origin by origin, with
/// destinations in ascending order and the diagonal skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcIndex {
    node_count: usize,
    vehicles: usize,
    arcs: Vec<ArcVar>,
}

impl ArcIndex {
    /// Declare `node_count * (node_count - 1) * vehicles` binaries in `model`.
    pub fn declare(model: &mut MilpModel, node_count: usize, vehicles: usize) -> Self {
        let mut arcs = Vec::with_capacity(
            node_count
                .saturating_mul(node_count.saturating_sub(1))
                .saturating_mul(vehicles),
        );
        for vehicle in 0..vehicles {
            for from in 0..node_count {
                for to in (0..node_count).filter(|&to| to != from) {
                    arcs.push(ArcVar {
                        from,
                        to,
                        vehicle,
                        var: model.add_binary(),
                    });
                }
            }
        }
        Self {
            node_count,
            vehicles,
            arcs,
        }
    }

    /// Variable for `from -> to` on `vehicle`, or `None` for the diagonal or
    /// out-of-range indices.
    #[must_use]
    pub fn var(&self, from: usize, to: usize, vehicle: usize) -> Option<VarId> {
        if from == to || from >= self.node_count || to >= self.node_count {
            return None;
        }
        let per_node = self.node_count - 1;
        let column = if to < from { to } else { to - 1 };
        let position = vehicle
            .checked_mul(self.node_count * per_node)?
            .checked_add(from * per_node + column)?;
        self.arcs.get(position).map(|arc| arc.var)
    }

    /// Every arc variable in declaration order.
    #[must_use]
    pub fn arcs(&self) -> &[ArcVar] {
        &self.arcs
    }

    /// Arc variables belonging to `vehicle`.
    pub fn vehicle_arcs(&self, vehicle: usize) -> impl Iterator<Item = &ArcVar> + '_ {
        self.arcs.iter().filter(move |arc| arc.vehicle == vehicle)
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of vehicles `K`.
    #[must_use]
    pub const fn vehicles(&self) -> usize {
        self.vehicles
    }
}

/// The model for one trial vehicle count plus its arc mapping.
///
/// # Examples
/// ```
/// use cvrp_core::CostMatrix;
/// use cvrp_solver_milp::{CvrpFormulation, SubtourMode};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0.0, 4.0, 6.0],
///     vec![4.0, 0.0, 3.0],
///     vec![6.0, 3.0, 0.0],
/// ])
/// .ok_or("matrix is square")?;
/// let formulation =
///     CvrpFormulation::build(&matrix, &[0.0, 1.0, 1.0], 2.0, 1, SubtourMode::Exhaustive);
///
/// assert_eq!(formulation.model().variable_count(), 6);
/// assert_eq!(formulation.cut_count(), 1);
/// # Ok::<(), &str>(())
/// ```
#[derive(Debug, Clone)]
pub struct CvrpFormulation {
    model: MilpModel,
    arcs: ArcIndex,
    cuts: usize,
}

impl CvrpFormulation {
    /// Build the model for `vehicles` vehicles.
    ///
    /// `demands` is indexed like the matrix; the depot entry is ignored.
    #[must_use]
    pub fn build(
        matrix: &CostMatrix,
        demands: &[f64],
        capacity: f64,
        vehicles: usize,
        mode: SubtourMode,
    ) -> Self {
        let node_count = matrix.size();
        let mut model = MilpModel::new();
        let arcs = ArcIndex::declare(&mut model, node_count, vehicles);

        model.set_objective(
            arcs.arcs()
                .iter()
                .map(|arc| (arc.var, matrix.get(arc.from, arc.to)))
                .collect(),
        );

        let mut formulation = Self {
            model,
            arcs,
            cuts: 0,
        };
        formulation.add_coverage();
        formulation.add_depot_boundary();
        formulation.add_flow_conservation();
        formulation.add_capacity(demands, capacity);

        if mode == SubtourMode::Exhaustive {
            let customers: Vec<usize> = (1..node_count).collect();
            for_each_subset(&customers, &mut Vec::new(), &mut |subset| {
                formulation.add_subtour_cut(subset);
            });
        }
        formulation
    }

    /// Every customer is entered exactly once across all vehicles.
    fn add_coverage(&mut self) {
        for customer in 1..self.arcs.node_count() {
            let expr = self
                .arcs
                .arcs()
                .iter()
                .filter(|arc| arc.to == customer)
                .map(|arc| (arc.var, 1.0))
                .collect();
            self.model
                .add_constraint(LinearConstraint::equal(format!("cover[{customer}]"), expr, 1.0));
        }
    }

    fn add_depot_boundary(&mut self) {
        for vehicle in 0..self.arcs.vehicles() {
            let leave = self.unit_terms(vehicle, |arc| arc.from == DEPOT);
            let enter = self.unit_terms(vehicle, |arc| arc.to == DEPOT);
            self.model
                .add_constraint(LinearConstraint::equal(format!("leave_depot[{vehicle}]"), leave, 1.0));
            self.model
                .add_constraint(LinearConstraint::equal(format!("enter_depot[{vehicle}]"), enter, 1.0));
        }
    }

    /// Per node and vehicle, outgoing arcs balance incoming arcs.
    fn add_flow_conservation(&mut self) {
        for vehicle in 0..self.arcs.vehicles() {
            for node in 0..self.arcs.node_count() {
                let expr = self
                    .arcs
                    .vehicle_arcs(vehicle)
                    .filter_map(|arc| {
                        if arc.from == node {
                            Some((arc.var, 1.0))
                        } else if arc.to == node {
                            Some((arc.var, -1.0))
                        } else {
                            None
                        }
                    })
                    .collect();
                self.model.add_constraint(LinearConstraint::equal(
                    format!("flow[{node},{vehicle}]"),
                    expr,
                    0.0,
                ));
            }
        }
    }

    fn add_capacity(&mut self, demands: &[f64], capacity: f64) {
        for vehicle in 0..self.arcs.vehicles() {
            let expr = self
                .arcs
                .vehicle_arcs(vehicle)
                .filter(|arc| arc.to != DEPOT)
                .map(|arc| (arc.var, demands.get(arc.to).copied().unwrap_or_default()))
                .collect();
            self.model.add_constraint(LinearConstraint::at_most(
                format!("capacity[{vehicle}]"),
                expr,
                capacity,
            ));
        }
    }

    fn unit_terms(&self, vehicle: usize, keep: impl Fn(&ArcVar) -> bool) -> LinearExpr {
        self.arcs
            .vehicle_arcs(vehicle)
            .filter(|arc| keep(arc))
            .map(|arc| (arc.var, 1.0))
            .collect()
    }

    /// Forbid `subset` from holding as many arcs as nodes, across all
    /// vehicles: `sum x[i][j][k] <= |S| - 1` for `i != j` in `subset`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "subset sizes are tiny compared to f64 mantissa precision"
    )]
    pub fn add_subtour_cut(&mut self, subset: &[usize]) {
        let expr = self
            .arcs
            .arcs()
            .iter()
            .filter(|arc| subset.contains(&arc.from) && subset.contains(&arc.to))
            .map(|arc| (arc.var, 1.0))
            .collect();
        let name = format!("subtour{subset:?}");
        self.model.add_constraint(LinearConstraint::at_most(
            name,
            expr,
            subset.len() as f64 - 1.0,
        ));
        self.cuts += 1;
    }

    /// The declarative model.
    #[must_use]
    pub const fn model(&self) -> &MilpModel {
        &self.model
    }

    /// The arc mapping.
    #[must_use]
    pub const fn arcs(&self) -> &ArcIndex {
        &self.arcs
    }

    /// Number of vehicles `K`.
    #[must_use]
    pub const fn vehicles(&self) -> usize {
        self.arcs.vehicles()
    }

    /// Subtour cuts added so far, upfront or lazily.
    #[must_use]
    pub const fn cut_count(&self) -> usize {
        self.cuts
    }
}

/// Visit every subset of `items` with at least two members, in
/// lexicographic order of positions.
fn for_each_subset(items: &[usize], current: &mut Vec<usize>, visit: &mut impl FnMut(&[usize])) {
    for (offset, &item) in items.iter().enumerate() {
        current.push(item);
        if current.len() >= 2 {
            visit(current);
        }
        if let Some(rest) = items.get(offset + 1..) {
            for_each_subset(rest, current, visit);
        }
        current.pop();
    }
}

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};
use transport_solver::{ConstraintOp, LpProblem};

use crate::data::{DemandNode, NodeKind, SupplyNode, TransportData};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model needs at least one supply node and one demand node")]
    Empty,
    #[error("Duplicate {kind} node id: {id}")]
    DuplicateNode { kind: NodeKind, id: String },
    #[error("Cost matrix has {found} rows but there are {expected} supply nodes")]
    CostRows { expected: usize, found: usize },
    #[error("Cost row {row} has {found} entries but there are {expected} demand nodes")]
    CostColumns { row: usize, expected: usize, found: usize },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
    #[error("Supply node {id} has negative capacity {value}")]
    NegativeCapacity { id: String, value: f64 },
    #[error("Demand node {id} has negative requirement {value}")]
    NegativeRequirement { id: String, value: f64 },
    #[error("Route {supply} -> {demand} has negative cost {value}")]
    NegativeCost { supply: String, demand: String, value: f64 },
}

/// A (supply, demand) pair and its unit transportation cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub supply: usize,
    pub demand: usize,
    pub unit_cost: f64,
}

/// A validated transportation problem together with its LP form.
///
/// Route `r` corresponds to LP variable `r`; routes are laid out row-major,
/// so route `s * n_demand + d` ships from supply `s` to demand `d`.
#[derive(Debug, Clone)]
pub struct TransportModel {
    data: TransportData,
    routes: Vec<Route>,
    lp: LpProblem,
}

impl TransportModel {
    /// Validate the data and build the LP: one non-negative variable per
    /// route, a `<=` capacity row per supply node, a `>=` requirement row per
    /// demand node, and a cost-minimizing objective.
    pub fn build(data: TransportData) -> Result<Self, ModelError> {
        validate(&data)?;

        let n_supply = data.supply.len();
        let n_demand = data.demand.len();

        let routes: Vec<Route> = (0..n_supply)
            .flat_map(|s| (0..n_demand).map(move |d| (s, d)))
            .map(|(s, d)| Route {
                supply: s,
                demand: d,
                unit_cost: data.costs[s][d],
            })
            .collect();

        let variables = routes
            .iter()
            .map(|r| variable_name(&data.supply[r.supply], &data.demand[r.demand]))
            .collect();
        let mut lp = LpProblem::new(variables);
        lp.set_objective(routes.iter().map(|r| r.unit_cost).collect(), true);

        for (s, node) in data.supply.iter().enumerate() {
            let coefficients = routes
                .iter()
                .map(|r| if r.supply == s { 1.0 } else { 0.0 })
                .collect();
            lp.add_constraint(capacity_name(node), coefficients, ConstraintOp::Le, node.capacity);
        }
        for (d, node) in data.demand.iter().enumerate() {
            let coefficients = routes
                .iter()
                .map(|r| if r.demand == d { 1.0 } else { 0.0 })
                .collect();
            lp.add_constraint(demand_name(node), coefficients, ConstraintOp::Ge, node.requirement);
        }

        let (supply, demand) = (data.total_supply(), data.total_demand());
        if supply < demand {
            warn!(supply, demand, "total supply is below total demand; the model will be infeasible");
        }
        debug!(
            variables = lp.num_variables(),
            constraints = lp.num_constraints(),
            "built transportation model"
        );

        Ok(Self { data, routes, lp })
    }

    pub fn supply(&self) -> &[SupplyNode] {
        &self.data.supply
    }

    pub fn demand(&self) -> &[DemandNode] {
        &self.data.demand
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn lp(&self) -> &LpProblem {
        &self.lp
    }

    pub fn total_supply(&self) -> f64 {
        self.data.total_supply()
    }

    pub fn total_demand(&self) -> f64 {
        self.data.total_demand()
    }

    pub fn is_balanced(&self) -> bool {
        (self.total_supply() - self.total_demand()).abs() < 1e-9
    }
}

fn variable_name(supply: &SupplyNode, demand: &DemandNode) -> String {
    format!("x[{},{}]", supply.id, demand.id)
}

fn capacity_name(node: &SupplyNode) -> String {
    format!("capacity[{}]", node.id)
}

fn demand_name(node: &DemandNode) -> String {
    format!("demand[{}]", node.id)
}

fn validate(data: &TransportData) -> Result<(), ModelError> {
    if data.supply.is_empty() || data.demand.is_empty() {
        return Err(ModelError::Empty);
    }

    let mut seen = HashSet::new();
    for node in &data.supply {
        if !seen.insert(node.id.as_str()) {
            return Err(ModelError::DuplicateNode { kind: NodeKind::Supply, id: node.id.clone() });
        }
    }
    seen.clear();
    for node in &data.demand {
        if !seen.insert(node.id.as_str()) {
            return Err(ModelError::DuplicateNode { kind: NodeKind::Demand, id: node.id.clone() });
        }
    }

    if data.costs.len() != data.supply.len() {
        return Err(ModelError::CostRows {
            expected: data.supply.len(),
            found: data.costs.len(),
        });
    }
    for (row, costs) in data.costs.iter().enumerate() {
        if costs.len() != data.demand.len() {
            return Err(ModelError::CostColumns {
                row,
                expected: data.demand.len(),
                found: costs.len(),
            });
        }
    }

    for node in &data.supply {
        if !node.capacity.is_finite() {
            return Err(ModelError::NonFinite(capacity_name(node)));
        }
        if node.capacity < 0.0 {
            return Err(ModelError::NegativeCapacity { id: node.id.clone(), value: node.capacity });
        }
    }
    for node in &data.demand {
        if !node.requirement.is_finite() {
            return Err(ModelError::NonFinite(demand_name(node)));
        }
        if node.requirement < 0.0 {
            return Err(ModelError::NegativeRequirement { id: node.id.clone(), value: node.requirement });
        }
    }
    for (s, row) in data.costs.iter().enumerate() {
        for (d, &cost) in row.iter().enumerate() {
            if !cost.is_finite() {
                return Err(ModelError::NonFinite(format!(
                    "cost[{},{}]",
                    data.supply[s].id, data.demand[d].id
                )));
            }
            if cost < 0.0 {
                return Err(ModelError::NegativeCost {
                    supply: data.supply[s].id.clone(),
                    demand: data.demand[d].id.clone(),
                    value: cost,
                });
            }
        }
    }

    Ok(())
}

use thiserror::Error;
use tracing::{debug, warn};
use transport_solver::{ConstraintOp, ConstraintViolation, LpProblem, Solution, SolutionStatus, Solver};

use crate::model::TransportModel;

/// Absolute slack allowed when re-checking a plan against its constraints
const CHECK_ABSOLUTE: f64 = 1e-6;
/// Additional slack per unit of right-hand side
const CHECK_RELATIVE: f64 = 1e-12;

/// Something that can solve an [`LpProblem`].
///
/// The transportation model owns no algorithm; it hands its LP to a backend
/// and interprets the returned status.
pub trait LpBackend {
    fn name(&self) -> &'static str;
    fn solve(&self, problem: &LpProblem) -> Solution;
}

impl LpBackend for Solver {
    fn name(&self) -> &'static str {
        "simplex"
    }

    fn solve(&self, problem: &LpProblem) -> Solution {
        Solver::solve(self, problem)
    }
}

#[derive(Error, Debug, Clone)]
pub enum SolveError {
    #[error("Model is infeasible ({} constraint(s) violated)", .violations.len())]
    Infeasible { violations: Vec<ConstraintViolation> },
    #[error("Model is unbounded")]
    Unbounded,
    #[error("Solver {backend} failed: {message}")]
    Solver { backend: &'static str, message: String },
}

/// Amount shipped along one route
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub supply_index: usize,
    pub demand_index: usize,
    pub supply: String,
    pub demand: String,
    pub quantity: f64,
    pub unit_cost: f64,
}

impl Shipment {
    pub fn cost(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

/// An optimal shipping plan
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct TransportPlan {
    /// One entry per route, row-major
    pub shipments: Vec<Shipment>,
    /// Total cost as reported by the backend
    pub objective_value: f64,
    /// Marginal cost per extra unit of capacity, per supply node
    /// (empty if the backend reports no duals)
    pub capacity_duals: Vec<f64>,
    /// Marginal cost per extra unit of requirement, per demand node
    /// (empty if the backend reports no duals)
    pub demand_duals: Vec<f64>,
    /// Constraints that hold with equality
    pub binding: Vec<String>,
}

impl TransportPlan {
    /// Total cost recomputed from the individual shipments
    pub fn recomputed_cost(&self) -> f64 {
        self.shipments.iter().map(Shipment::cost).sum()
    }

    pub fn quantity(&self, supply: &str, demand: &str) -> Option<f64> {
        self.shipments
            .iter()
            .find(|s| s.supply == supply && s.demand == demand)
            .map(|s| s.quantity)
    }

    pub fn shipped_from(&self, supply: &str) -> f64 {
        self.shipments
            .iter()
            .filter(|s| s.supply == supply)
            .map(|s| s.quantity)
            .sum()
    }

    pub fn received_by(&self, demand: &str) -> f64 {
        self.shipments
            .iter()
            .filter(|s| s.demand == demand)
            .map(|s| s.quantity)
            .sum()
    }

    /// Shipment quantities as a `supply x demand` matrix
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        let rows = self.shipments.iter().map(|s| s.supply_index + 1).max().unwrap_or(0);
        let cols = self.shipments.iter().map(|s| s.demand_index + 1).max().unwrap_or(0);
        let mut matrix = vec![vec![0.0; cols]; rows];
        for s in &self.shipments {
            matrix[s.supply_index][s.demand_index] = s.quantity;
        }
        matrix
    }
}

impl TransportModel {
    /// Solve with the built-in simplex solver
    pub fn solve(&self) -> Result<TransportPlan, SolveError> {
        self.solve_with(&Solver::new())
    }

    pub fn solve_with<B: LpBackend + ?Sized>(&self, backend: &B) -> Result<TransportPlan, SolveError> {
        debug!(
            backend = backend.name(),
            variables = self.lp().num_variables(),
            "invoking LP backend"
        );
        let solution = backend.solve(self.lp());
        debug!(backend = backend.name(), status = ?solution.status, "LP backend returned");

        match solution.status {
            SolutionStatus::Optimal => self.plan_from(solution, backend.name()),
            SolutionStatus::Infeasible => Err(SolveError::Infeasible {
                violations: solution.violations,
            }),
            SolutionStatus::Unbounded => Err(SolveError::Unbounded),
            SolutionStatus::IterationLimit | SolutionStatus::Error => Err(SolveError::Solver {
                backend: backend.name(),
                message: solution
                    .message
                    .unwrap_or_else(|| format!("status {:?}", solution.status)),
            }),
        }
    }

    fn plan_from(&self, solution: Solution, backend: &'static str) -> Result<TransportPlan, SolveError> {
        if solution.values.len() != self.routes().len() {
            return Err(SolveError::Solver {
                backend,
                message: format!(
                    "expected {} variable values, got {}",
                    self.routes().len(),
                    solution.values.len()
                ),
            });
        }

        let violations = self.unmet_constraints(&solution.values);
        if !violations.is_empty() {
            warn!(
                backend,
                violated = violations.len(),
                "backend reported optimal but the plan breaks constraints"
            );
            return Err(SolveError::Infeasible { violations });
        }

        let shipments = self
            .routes()
            .iter()
            .zip(&solution.values)
            .map(|(route, &quantity)| Shipment {
                supply_index: route.supply,
                demand_index: route.demand,
                supply: self.supply()[route.supply].id.clone(),
                demand: self.demand()[route.demand].id.clone(),
                quantity,
                unit_cost: route.unit_cost,
            })
            .collect();

        // Constraint rows are all capacities, then all demands
        let duals: Vec<f64> = solution.analysis.duals.iter().map(|d| d.value).collect();
        let (capacity_duals, demand_duals) = if duals.len() == self.lp().num_constraints() {
            let (cap, dem) = duals.split_at(self.supply().len());
            (cap.to_vec(), dem.to_vec())
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(TransportPlan {
            shipments,
            objective_value: solution.objective_value,
            capacity_duals,
            demand_duals,
            binding: solution.analysis.binding_constraints,
        })
    }

    /// Constraints of the LP that `values` does not satisfy
    fn unmet_constraints(&self, values: &[f64]) -> Vec<ConstraintViolation> {
        self.lp()
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, CHECK_ABSOLUTE + CHECK_RELATIVE * c.rhs.abs()))
            .map(|c| {
                let actual = c.lhs(values);
                let violation_amount = (actual - c.rhs).abs();
                let description = match c.op {
                    ConstraintOp::Le => {
                        format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, violation_amount)
                    }
                    ConstraintOp::Ge => {
                        format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, violation_amount)
                    }
                    ConstraintOp::Eq => format!("{} requires exactly {:.2} but got {:.2}", c.name, c.rhs, actual),
                };
                ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual,
                    violation_amount,
                    description,
                }
            })
            .collect()
    }
}

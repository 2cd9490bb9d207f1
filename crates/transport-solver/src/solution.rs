/// The result of solving an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Optimal values for each variable
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Dual and reduced-cost analysis (empty unless optimal)
    pub analysis: Analysis,
    /// Constraint violations (populated when infeasible)
    pub violations: Vec<ConstraintViolation>,
    /// Human-readable reason when the status is `Error`
    pub message: Option<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// The iteration limit was hit before the simplex terminated
    IterationLimit,
    /// Solver encountered an error
    Error,
}

/// Detailed analysis of the optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Dual value for each constraint, in constraint order
    pub duals: Vec<DualValue>,

    /// Reduced costs for each variable
    /// For non-basic variables, indicates how much cost must change to enter solution
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct DualValue {
    /// Constraint name
    pub constraint: String,
    /// Change in the optimal objective per unit increase of the RHS
    pub value: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Reduced cost
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    pub fn infeasible() -> Self {
        Self::infeasible_with_violations(Vec::new())
    }

    pub fn infeasible_with_violations(violations: Vec<ConstraintViolation>) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values: Vec::new(),
            objective_value: f64::INFINITY,
            analysis: Analysis::default(),
            violations,
            message: None,
        }
    }

    pub fn infeasible_with_relaxed(
        values: Vec<f64>,
        objective_value: f64,
        violations: Vec<ConstraintViolation>,
    ) -> Self {
        Self {
            status: SolutionStatus::Infeasible,
            values,
            objective_value,
            analysis: Analysis::default(),
            violations,
            message: None,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            status: SolutionStatus::Unbounded,
            values: Vec::new(),
            objective_value: f64::NEG_INFINITY,
            analysis: Analysis::default(),
            violations: Vec::new(),
            message: None,
        }
    }

    pub fn iteration_limit(limit: usize) -> Self {
        Self {
            status: SolutionStatus::IterationLimit,
            values: Vec::new(),
            objective_value: f64::NAN,
            analysis: Analysis::default(),
            violations: Vec::new(),
            message: Some(format!("simplex did not terminate within {} iterations", limit)),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SolutionStatus::Error,
            values: Vec::new(),
            objective_value: f64::NAN,
            analysis: Analysis::default(),
            violations: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Dual value of the named constraint, if the solution carries one
    pub fn dual(&self, constraint: &str) -> Option<f64> {
        self.analysis
            .duals
            .iter()
            .find(|d| d.constraint == constraint)
            .map(|d| d.value)
    }
}

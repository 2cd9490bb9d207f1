use std::collections::HashMap;

use crate::problem::{Constraint, ConstraintOp, LpProblem};
use crate::solution::{Analysis, ConstraintViolation, DualValue, ReducedCost, Solution, SolutionStatus};

/// Consecutive degenerate pivots tolerated before switching to Bland's rule
const DEGENERATE_STREAK: usize = 50;

/// Rounding headroom per unit of RHS magnitude when testing phase-1 residuals
const RELATIVE_RESIDUAL: f64 = 1e3 * f64::EPSILON;

/// Largest tolerance the pivoting rules still behave sensibly with
pub const MAX_TOLERANCE: f64 = 1e-3;

/// Simplex solver for linear programming problems
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the LP problem using the two-phase simplex method.
    ///
    /// All variables are implicitly non-negative.
    pub fn solve(&self, problem: &LpProblem) -> Solution {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance <= MAX_TOLERANCE) {
            return Solution::error(format!(
                "tolerance must be in (0, {}], got {}",
                MAX_TOLERANCE, self.tolerance
            ));
        }
        if let Err(e) = problem.validate() {
            return Solution::error(e.to_string());
        }

        match self.run(problem) {
            Outcome::Optimal(tableau) => self.extract_solution(&tableau, problem),
            Outcome::Unbounded => Solution::unbounded(),
            Outcome::IterationLimit => Solution::iteration_limit(self.max_iterations),
            Outcome::Infeasible => self.solve_with_relaxation(problem),
        }
    }

    fn run(&self, problem: &LpProblem) -> Outcome {
        let mut tableau = self.build_tableau(problem);

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau) {
                SimplexResult::Optimal => {}
                SimplexResult::IterationLimit => return Outcome::IterationLimit,
                SimplexResult::Unbounded | SimplexResult::Infeasible => return Outcome::Infeasible,
            }
        }

        // Phase 2: Optimize
        match self.phase2(&mut tableau) {
            SimplexResult::Optimal => Outcome::Optimal(tableau),
            SimplexResult::Unbounded => Outcome::Unbounded,
            SimplexResult::IterationLimit => Outcome::IterationLimit,
            SimplexResult::Infeasible => Outcome::Infeasible,
        }
    }

    /// When the original problem is infeasible, find a "best effort" point by
    /// dropping the >= constraints and report which constraints it violates
    fn solve_with_relaxation(&self, problem: &LpProblem) -> Solution {
        let mut relaxed = LpProblem::new(problem.variables.clone());
        relaxed.set_objective(
            problem.objective.coefficients.clone(),
            problem.objective.minimize,
        );
        for c in problem.constraints.iter().filter(|c| c.op != ConstraintOp::Ge) {
            relaxed.add_constraint(c.name.clone(), c.coefficients.clone(), c.op, c.rhs);
        }

        let relaxed_solution = match self.run(&relaxed) {
            Outcome::Optimal(tableau) => self.extract_solution(&tableau, &relaxed),
            // Even the relaxed problem fails - analyze direct conflicts
            _ => return self.analyze_conflicts(problem),
        };

        let violations = self.find_violations(problem, &relaxed_solution.values);
        if violations.is_empty() {
            // Phase 1 gave up on a numerically borderline problem that the
            // relaxation solves without violations; report no diagnostics
            return Solution::infeasible();
        }

        Solution::infeasible_with_relaxed(
            relaxed_solution.values,
            relaxed_solution.objective_value,
            violations,
        )
    }

    /// Find which constraints are violated by a given point, worst first
    fn find_violations(&self, problem: &LpProblem, values: &[f64]) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = problem
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, self.tolerance))
            .map(|c| {
                let lhs = c.lhs(values);
                let amount = (lhs - c.rhs).abs();
                let description = match c.op {
                    ConstraintOp::Le => format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, amount),
                    ConstraintOp::Ge => format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, amount),
                    ConstraintOp::Eq => format!("{} requires exactly {:.2} but got {:.2}", c.name, c.rhs, lhs),
                };
                ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual: lhs,
                    violation_amount: amount,
                    description,
                }
            })
            .collect();

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        violations
    }

    /// Look for constraints over the same variables whose bounds contradict
    fn analyze_conflicts(&self, problem: &LpProblem) -> Solution {
        let mut groups: HashMap<Vec<i8>, Vec<&Constraint>> = HashMap::new();
        for c in &problem.constraints {
            let key: Vec<i8> = c
                .coefficients
                .iter()
                .map(|&x| {
                    if x.abs() < self.tolerance {
                        0
                    } else if x > 0.0 {
                        1
                    } else {
                        -1
                    }
                })
                .collect();
            groups.entry(key).or_default().push(c);
        }

        let mut violations = Vec::new();
        for constraints in groups.values() {
            let mut min_bound: Option<(f64, &str)> = None;
            let mut max_bound: Option<(f64, &str)> = None;

            for c in constraints {
                if matches!(c.op, ConstraintOp::Ge | ConstraintOp::Eq)
                    && min_bound.is_none_or(|(v, _)| c.rhs > v)
                {
                    min_bound = Some((c.rhs, c.name.as_str()));
                }
                if matches!(c.op, ConstraintOp::Le | ConstraintOp::Eq)
                    && max_bound.is_none_or(|(v, _)| c.rhs < v)
                {
                    max_bound = Some((c.rhs, c.name.as_str()));
                }
            }

            if let (Some((min_val, min_name)), Some((max_val, max_name))) = (min_bound, max_bound) {
                if min_val > max_val + self.tolerance {
                    violations.push(ConstraintViolation {
                        constraint: format!("{} vs {}", min_name, max_name),
                        required: min_val,
                        actual: max_val,
                        violation_amount: min_val - max_val,
                        description: format!(
                            "Conflict: {} requires >= {:.2} but {} requires <= {:.2}",
                            min_name, min_val, max_name, max_val
                        ),
                    });
                }
            }
        }

        violations.sort_by(|a, b| b.violation_amount.total_cmp(&a.violation_amount));
        Solution::infeasible_with_violations(violations)
    }

    fn build_tableau(&self, problem: &LpProblem) -> Tableau {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Rows are normalized to a non-negative RHS first, which may flip the operator
        let normalized: Vec<(ConstraintOp, bool)> = problem
            .constraints
            .iter()
            .map(|c| if c.rhs < 0.0 { (c.op.flipped(), true) } else { (c.op, false) })
            .collect();

        let mut n_slack = 0;
        let mut n_artificial = 0;
        for (op, _) in &normalized {
            match op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; total_rows],
            basic_vars: vec![0; n_constraints],
            n_vars,
            n_slack,
            n_artificial,
            rows: Vec::with_capacity(n_constraints),
            artificial_rhs: Vec::with_capacity(n_artificial),
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, (c, &(op, flipped))) in problem.constraints.iter().zip(&normalized).enumerate() {
            let sign = if flipped { -1.0 } else { 1.0 };
            for (j, &coef) in c.coefficients.iter().enumerate() {
                tableau.data[i][j] = sign * coef;
            }
            tableau.data[i][total_cols - 1] = sign * c.rhs;

            let row = match op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    slack_idx += 1;
                    RowInfo { unit_col: slack_idx - 1, unit_sign: 1.0, flipped }
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.artificial_rhs.push(c.rhs.abs());
                    slack_idx += 1;
                    artificial_idx += 1;
                    RowInfo { unit_col: slack_idx - 1, unit_sign: -1.0, flipped }
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    tableau.artificial_rhs.push(c.rhs.abs());
                    artificial_idx += 1;
                    RowInfo { unit_col: artificial_idx - 1, unit_sign: 1.0, flipped }
                }
            };
            tableau.rows.push(row);
        }

        // Objective row (last row)
        // Simplex maximizes, so for minimization we negate the coefficients
        let obj_row = n_constraints;
        for (j, &coef) in problem.objective.coefficients.iter().enumerate() {
            tableau.data[obj_row][j] = if problem.objective.minimize { -coef } else { coef };
        }

        tableau
    }

    fn phase1(&self, tableau: &mut Tableau) -> SimplexResult {
        let n_constraints = tableau.n_constraints();
        let n_cols = tableau.n_cols();
        let art_start = tableau.artificial_start();
        let rhs_col = n_cols - 1;

        let orig_obj = tableau.data[n_constraints].clone();

        // Maximize -sum(artificials), priced out against the initial basis
        tableau.data[n_constraints] = vec![0.0; n_cols];
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_constraints][j] = -1.0;
        }
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] += tableau.data[i][j];
                }
            }
        }

        match self.iterate(tableau, rhs_col) {
            SimplexResult::Optimal => {}
            // Bounded by zero, so this only happens on numerical trouble
            SimplexResult::Unbounded => return SimplexResult::Infeasible,
            other => return other,
        }

        // Each leftover artificial is judged against its own row: a shortfall
        // of one unit must stay visible next to a right-hand side of 1e9
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            if basic >= art_start {
                let threshold = self.feasibility_threshold(tableau.artificial_rhs[basic - art_start]);
                if tableau.data[i][rhs_col].abs() > threshold {
                    return SimplexResult::Infeasible;
                }
            }
        }

        // Drive zero-level artificials out of the basis where possible; rows
        // where that fails are redundant and stay inert
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                if let Some(j) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                    self.pivot(tableau, i, j);
                }
            }
        }

        // Restore original objective and price out basic variables
        tableau.data[n_constraints] = orig_obj;
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[n_constraints][basic];
            if ratio.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        SimplexResult::Optimal
    }

    /// Largest residual accepted as zero for a row with the given RHS
    fn feasibility_threshold(&self, rhs: f64) -> f64 {
        self.tolerance + RELATIVE_RESIDUAL * rhs
    }

    fn phase2(&self, tableau: &mut Tableau) -> SimplexResult {
        // Artificial columns never re-enter
        let exclude_from = tableau.artificial_start();
        self.iterate(tableau, exclude_from)
    }

    /// Pivot until no column below `col_limit` can improve the objective
    fn iterate(&self, tableau: &mut Tableau, col_limit: usize) -> SimplexResult {
        let mut iterations = 0;
        let mut degenerate = 0;

        loop {
            let bland = degenerate >= DEGENERATE_STREAK;
            let Some(pivot_col) = self.find_pivot_column(tableau, col_limit, bland) else {
                return SimplexResult::Optimal;
            };
            if iterations == self.max_iterations {
                return SimplexResult::IterationLimit;
            }
            let Some((pivot_row, ratio)) = self.find_pivot_row(tableau, pivot_col, bland) else {
                return SimplexResult::Unbounded;
            };
            if ratio <= self.tolerance {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            self.pivot(tableau, pivot_row, pivot_col);
            iterations += 1;
        }
    }

    /// Most positive reduced cost (Dantzig), or the lowest improving index
    /// under Bland's rule
    fn find_pivot_column(&self, tableau: &Tableau, col_limit: usize, bland: bool) -> Option<usize> {
        let obj = &tableau.data[tableau.n_constraints()];
        if bland {
            return (0..col_limit).find(|&j| obj[j] > self.tolerance);
        }

        let mut max_val = self.tolerance;
        let mut max_col = None;
        for (j, &v) in obj.iter().enumerate().take(col_limit) {
            if v > max_val {
                max_val = v;
                max_col = Some(j);
            }
        }
        max_col
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize, bland: bool) -> Option<(usize, f64)> {
        let rhs_col = tableau.n_cols() - 1;

        let mut best: Option<(usize, f64)> = None;
        for i in 0..tableau.n_constraints() {
            let val = tableau.data[i][col];
            if val <= self.tolerance {
                continue;
            }
            let ratio = (tableau.data[i][rhs_col] / val).max(0.0);
            best = match best {
                None => Some((i, ratio)),
                Some((_, r)) if ratio < r - self.tolerance => Some((i, ratio)),
                Some((b, r)) if bland && ratio <= r + self.tolerance && tableau.basic_vars[i] < tableau.basic_vars[b] => {
                    Some((i, ratio))
                }
                keep => keep,
            };
        }
        best
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_rows = tableau.data.len();
        let n_cols = tableau.n_cols();

        tableau.basic_vars[row] = col;

        let pivot_val = tableau.data[row][col];
        for j in 0..n_cols {
            tableau.data[row][j] /= pivot_val;
        }

        let pivot_row = tableau.data[row].clone();
        for i in 0..n_rows {
            if i != row {
                let factor = tableau.data[i][col];
                if factor != 0.0 {
                    for j in 0..n_cols {
                        tableau.data[i][j] -= factor * pivot_row[j];
                    }
                }
            }
        }
    }

    fn extract_solution(&self, tableau: &Tableau, problem: &LpProblem) -> Solution {
        let n_vars = problem.num_variables();
        let rhs_col = tableau.n_cols() - 1;

        let mut values = vec![0.0; n_vars];
        for (i, &basic) in tableau.basic_vars.iter().enumerate() {
            if basic < n_vars {
                values[basic] = clean(tableau.data[i][rhs_col], self.tolerance).max(0.0);
            }
        }

        let objective_value = problem.objective_value(&values);
        let analysis = self.analyze(tableau, problem, &values);

        Solution {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            analysis,
            violations: Vec::new(),
            message: None,
        }
    }

    fn analyze(&self, tableau: &Tableau, problem: &LpProblem, values: &[f64]) -> Analysis {
        let obj = &tableau.data[tableau.n_constraints()];
        let minimize = problem.objective.minimize;

        // The objective row holds f_j - y.A_j for the maximized objective f;
        // the unit column of each row exposes its dual y_i.
        let duals = problem
            .constraints
            .iter()
            .zip(&tableau.rows)
            .map(|(c, row)| {
                let mut y = -obj[row.unit_col] * row.unit_sign;
                if row.flipped {
                    y = -y;
                }
                let value = if minimize { -y } else { y };
                DualValue {
                    constraint: c.name.clone(),
                    value: clean(value, self.tolerance),
                }
            })
            .collect();

        let reduced_costs = problem
            .variables
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let is_basic = tableau.basic_vars.contains(&j);
                let rc = if is_basic {
                    0.0
                } else if minimize {
                    -obj[j]
                } else {
                    obj[j]
                };
                ReducedCost {
                    variable: name.clone(),
                    value: values[j],
                    reduced_cost: clean(rc, self.tolerance),
                    is_basic,
                }
            })
            .collect();

        let binding_constraints = problem
            .constraints
            .iter()
            .filter(|c| (c.lhs(values) - c.rhs).abs() <= self.tolerance * (1.0 + c.rhs.abs()))
            .map(|c| c.name.clone())
            .collect();

        Analysis {
            duals,
            reduced_costs,
            binding_constraints,
        }
    }
}

/// Snap values within tolerance of zero to exactly zero
fn clean(value: f64, tolerance: f64) -> f64 {
    if value.abs() <= tolerance { 0.0 } else { value }
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
    rows: Vec<RowInfo>,
    /// Absolute original RHS of the row behind each artificial column
    artificial_rhs: Vec<f64>,
}

impl Tableau {
    fn n_constraints(&self) -> usize {
        self.data.len() - 1
    }

    fn n_cols(&self) -> usize {
        self.data[0].len()
    }

    fn artificial_start(&self) -> usize {
        self.n_vars + self.n_slack
    }
}

/// Where to read a constraint's dual from after the solve
struct RowInfo {
    /// Column holding +/- the unit vector of this row
    unit_col: usize,
    unit_sign: f64,
    /// Row was negated to make its RHS non-negative
    flipped: bool,
}

enum SimplexResult {
    Optimal,
    Unbounded,
    Infeasible,
    IterationLimit,
}

enum Outcome {
    Optimal(Tableau),
    Unbounded,
    Infeasible,
    IterationLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);

        // One more unit of `sum` buys one more y: +2
        assert!((solution.dual("sum").unwrap() - 2.0).abs() < 1e-6);
        assert!((solution.dual("x_max").unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(solution.dual("y_max"), Some(0.0));
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![1.0, 0.0], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![0.0, 1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);

        // Demanding one more unit costs one more y
        assert!((solution.dual("sum").unwrap() - 3.0).abs() < 1e-6);
        // One more unit of x capacity replaces a y with an x
        assert!((solution.dual("x_max").unwrap() + 1.0).abs() < 1e-6);
        assert_eq!(solution.dual("y_max"), Some(0.0));

        let binding = &solution.analysis.binding_constraints;
        assert!(binding.contains(&"sum".to_string()));
        assert!(binding.contains(&"x_max".to_string()));
        assert!(!binding.contains(&"y_max".to_string()));
    }

    #[test]
    fn test_equality_constraint() {
        // Minimize: x + 2y
        // Subject to: x + y = 2, y >= 0.5
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("total", vec![1.0, 1.0], ConstraintOp::Eq, 2.0);
        problem.add_constraint("y_min", vec![0.0, 1.0], ConstraintOp::Ge, 0.5);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 1.5).abs() < 1e-6);
        assert!((solution.values[1] - 0.5).abs() < 1e-6);
        assert!((solution.objective_value - 2.5).abs() < 1e-6);
        assert!((solution.dual("total").unwrap() - 1.0).abs() < 1e-6);
        assert!((solution.dual("y_min").unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_rhs() {
        // Minimize: y
        // Subject to: x - y <= -1  (y >= x + 1)
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![0.0, 1.0], true);
        problem.add_constraint("gap", vec![1.0, -1.0], ConstraintOp::Le, -1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!(solution.values[0].abs() < 1e-6);
        assert!((solution.values[1] - 1.0).abs() < 1e-6);
        // Raising the RHS toward zero relaxes the gap and lowers y
        assert!((solution.dual("gap").unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unbounded() {
        // Maximize: x + y
        // Subject to: x - y <= 1
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0, 1.0], false);
        problem.add_constraint("diff", vec![1.0, -1.0], ConstraintOp::Le, 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Unbounded);
        assert_eq!(solution.objective_value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vars(&["x"]));
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![1.0], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![1.0], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.violations.len(), 1);
        assert_eq!(solution.violations[0].constraint, "lower");
        assert!((solution.violations[0].violation_amount - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_conflicting_equalities() {
        let mut problem = LpProblem::new(vars(&["x"]));
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("one", vec![1.0], ConstraintOp::Eq, 1.0);
        problem.add_constraint("two", vec![1.0], ConstraintOp::Eq, 2.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.violations.len(), 1);
        assert_eq!(solution.violations[0].constraint, "two vs one");
    }

    #[test]
    fn test_iteration_limit() {
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![1.0, 1.0], ConstraintOp::Le, 4.0);

        let solution = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::IterationLimit);
        assert!(solution.message.is_some());
    }

    #[test]
    fn test_already_optimal_needs_no_iterations() {
        let mut problem = LpProblem::new(vars(&["x"]));
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("cap", vec![1.0], ConstraintOp::Le, 4.0);

        let solution = Solver::new().with_max_iterations(0).solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.values, vec![0.0]);
    }

    #[test]
    fn test_malformed_problem_is_an_error() {
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0], true);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Error);
        assert!(solution.message.unwrap().contains("Objective"));
    }

    #[test]
    fn test_one_unit_short_at_large_scale() {
        // x + y <= 1e9, x + y >= 1e9 + 1
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("cap", vec![1.0, 1.0], ConstraintOp::Le, 1e9);
        problem.add_constraint("need", vec![1.0, 1.0], ConstraintOp::Ge, 1e9 + 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert_eq!(solution.violations[0].constraint, "need");
    }

    #[test]
    fn test_large_scale_feasible() {
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0, 2.0], true);
        problem.add_constraint("cap", vec![1.0, 0.0], ConstraintOp::Le, 1e9);
        problem.add_constraint("need", vec![1.0, 1.0], ConstraintOp::Ge, 1e9 + 1.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.values[0] - 1e9).abs() < 1e-3);
        assert!((solution.values[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        let mut problem = LpProblem::new(vars(&["x"]));
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("need", vec![1.0], ConstraintOp::Ge, 2.0);

        for tol in [f64::NAN, f64::INFINITY, 0.0, -1e-9, 5.0] {
            let solution = Solver::new().with_tolerance(tol).solve(&problem);
            assert_eq!(solution.status, SolutionStatus::Error, "tolerance {}", tol);
            assert!(solution.message.unwrap().contains("tolerance"));
        }

        let solver = Solver::new().with_tolerance(MAX_TOLERANCE).with_max_iterations(50);
        assert_eq!(solver.tolerance(), MAX_TOLERANCE);
        assert_eq!(solver.max_iterations(), 50);
        assert!(solver.solve(&problem).is_optimal());
    }

    #[test]
    fn test_reduced_costs() {
        // Minimize: x + 5y subject to x + y >= 2; y stays out at a reduced cost of 4
        let mut problem = LpProblem::new(vars(&["x", "y"]));
        problem.set_objective(vec![1.0, 5.0], true);
        problem.add_constraint("need", vec![1.0, 1.0], ConstraintOp::Ge, 2.0);

        let solution = Solver::new().solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        let y = &solution.analysis.reduced_costs[1];
        assert!(!y.is_basic);
        assert!((y.reduced_cost - 4.0).abs() < 1e-6);
        assert!(solution.analysis.reduced_costs[0].is_basic);
    }
}

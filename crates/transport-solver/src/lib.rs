mod problem;
mod simplex;
mod solution;

pub use problem::{Constraint, ConstraintOp, LpProblem, Objective, ProblemError};
pub use simplex::{MAX_TOLERANCE, Solver};
pub use solution::{Analysis, ConstraintViolation, DualValue, ReducedCost, Solution, SolutionStatus};

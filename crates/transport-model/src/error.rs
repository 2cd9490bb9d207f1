use thiserror::Error;

use crate::model::ModelError;
use crate::solve::SolveError;

/// Any failure of the build-then-solve pipeline
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

pub type Result<T> = std::result::Result<T, Error>;

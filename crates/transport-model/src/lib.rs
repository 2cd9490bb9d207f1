pub mod data;
pub mod datasets;
pub mod error;
pub mod model;
pub mod report;
pub mod solve;

pub use data::{DemandNode, NodeKind, SupplyNode, TransportData};
pub use error::{Error, Result};
pub use model::{ModelError, Route, TransportModel};
pub use report::{ReportOptions, write_failure, write_model, write_plan};
pub use solve::{LpBackend, Shipment, SolveError, TransportPlan};

/// Build a model from `data` and solve it with the built-in solver
pub fn solve(data: TransportData) -> Result<(TransportModel, TransportPlan)> {
    let model = TransportModel::build(data)?;
    let plan = model.solve()?;
    Ok((model, plan))
}

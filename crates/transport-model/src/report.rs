//! Human-readable output for models, plans and failed solves.

use std::io::{self, Write};

use crate::model::TransportModel;
use crate::solve::{SolveError, TransportPlan};

/// Shipments smaller than this are treated as zero in reports
const DISPLAY_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print the dual value of every constraint
    pub show_duals: bool,
    /// Also list routes that carry nothing
    pub show_zero_routes: bool,
}

/// Format a number without trailing zeros: `4`, `2.5`, `0.3333`
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 1e4).round() / 1e4;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

pub fn write_plan<W: Write>(
    model: &TransportModel,
    plan: &TransportPlan,
    options: &ReportOptions,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Status: OPTIMAL")?;
    writeln!(out)?;

    for shipment in &plan.shipments {
        if shipment.quantity.abs() > DISPLAY_EPSILON || options.show_zero_routes {
            writeln!(
                out,
                "Transport {} units from facility {} to warehouse {}",
                format_amount(shipment.quantity),
                shipment.supply,
                shipment.demand
            )?;
        }
    }

    if options.show_duals {
        writeln!(out)?;
        if plan.capacity_duals.is_empty() && plan.demand_duals.is_empty() {
            writeln!(out, "Duals: not reported by the solver")?;
        } else {
            writeln!(out, "Duals:")?;
            let rows = model
                .lp()
                .constraints
                .iter()
                .zip(plan.capacity_duals.iter().chain(&plan.demand_duals));
            for (constraint, dual) in rows {
                let binding = if plan.binding.contains(&constraint.name) { " (binding)" } else { "" };
                writeln!(out, "  {:20} {:>10}{}", constraint.name, format_amount(*dual), binding)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Objective function value: {}", format_amount(plan.objective_value))?;
    Ok(())
}

pub fn write_failure<W: Write>(error: &SolveError, out: &mut W) -> io::Result<()> {
    match error {
        SolveError::Infeasible { violations } => {
            writeln!(out, "Status: INFEASIBLE")?;
            writeln!(out, "No shipping plan satisfies all constraints.")?;
            for v in violations {
                writeln!(out, "  - {}", v.description)?;
            }
        }
        SolveError::Unbounded => {
            writeln!(out, "Status: UNBOUNDED")?;
            writeln!(out, "The problem has no finite optimal solution.")?;
        }
        SolveError::Solver { .. } => {
            writeln!(out, "Status: ERROR")?;
            writeln!(out, "{}", error)?;
        }
    }
    Ok(())
}

/// Print sets, parameters, constraints and the objective of a model
pub fn write_model<W: Write>(model: &TransportModel, out: &mut W) -> io::Result<()> {
    let supply_ids: Vec<&str> = model.supply().iter().map(|n| n.id.as_str()).collect();
    let demand_ids: Vec<&str> = model.demand().iter().map(|n| n.id.as_str()).collect();

    writeln!(out, "Sets:")?;
    writeln!(out, "  facilities : {{{}}}", supply_ids.join(", "))?;
    writeln!(out, "  warehouses : {{{}}}", demand_ids.join(", "))?;
    writeln!(out)?;

    writeln!(out, "Parameters:")?;
    writeln!(out, "  capacity")?;
    for node in model.supply() {
        writeln!(out, "    {:10} {:>10}", node.id, format_amount(node.capacity))?;
    }
    writeln!(out, "  demand")?;
    for node in model.demand() {
        writeln!(out, "    {:10} {:>10}", node.id, format_amount(node.requirement))?;
    }
    writeln!(out, "  cost")?;
    for route in model.routes() {
        let key = format!("({}, {})", supply_ids[route.supply], demand_ids[route.demand]);
        writeln!(out, "    {:16} {:>10}", key, format_amount(route.unit_cost))?;
    }
    writeln!(out)?;

    let lp = model.lp();
    writeln!(out, "Constraints:")?;
    for c in &lp.constraints {
        writeln!(
            out,
            "  {} : {} {} {}",
            c.name,
            linear_expression(&c.coefficients, &lp.variables),
            c.op,
            format_amount(c.rhs)
        )?;
    }
    writeln!(out)?;

    let sense = if lp.objective.minimize { "minimize" } else { "maximize" };
    writeln!(out, "Objective:")?;
    writeln!(out, "  {} {}", sense, linear_expression(&lp.objective.coefficients, &lp.variables))?;
    Ok(())
}

fn linear_expression(coefficients: &[f64], variables: &[String]) -> String {
    let terms: Vec<String> = coefficients
        .iter()
        .zip(variables)
        .filter(|(c, _)| **c != 0.0)
        .map(|(&c, name)| {
            if c == 1.0 {
                name.clone()
            } else {
                format!("{}*{}", format_amount(c), name)
            }
        })
        .collect();

    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

use std::fmt;

/// A facility that ships goods, limited by its capacity
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyNode {
    pub id: String,
    pub capacity: f64,
}

/// A warehouse that must receive at least its requirement
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DemandNode {
    pub id: String,
    pub requirement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Supply,
    Demand,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Supply => f.write_str("supply"),
            NodeKind::Demand => f.write_str("demand"),
        }
    }
}

/// Raw problem data: nodes plus a `supply x demand` unit cost matrix
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TransportData {
    pub supply: Vec<SupplyNode>,
    pub demand: Vec<DemandNode>,
    /// `costs[s][d]` is the unit cost from supply node `s` to demand node `d`
    pub costs: Vec<Vec<f64>>,
}

impl TransportData {
    /// Build data from plain numbers, naming facilities `f0, f1, ...` and
    /// warehouses `w0, w1, ...`
    pub fn from_numbers(capacities: &[f64], requirements: &[f64], costs: Vec<Vec<f64>>) -> Self {
        Self {
            supply: capacities
                .iter()
                .enumerate()
                .map(|(i, &capacity)| SupplyNode { id: format!("f{}", i), capacity })
                .collect(),
            demand: requirements
                .iter()
                .enumerate()
                .map(|(i, &requirement)| DemandNode { id: format!("w{}", i), requirement })
                .collect(),
            costs,
        }
    }

    pub fn total_supply(&self) -> f64 {
        self.supply.iter().map(|s| s.capacity).sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.iter().map(|d| d.requirement).sum()
    }

    /// Returns a copy with one route's unit cost replaced
    pub fn with_cost(mut self, supply: usize, demand: usize, cost: f64) -> Self {
        if let Some(c) = self.costs.get_mut(supply).and_then(|row| row.get_mut(demand)) {
            *c = cost;
        }
        self
    }
}

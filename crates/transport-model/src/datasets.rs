//! Small built-in problems. The numbers are illustrative only.

use crate::data::TransportData;

/// Names accepted by [`by_name`]
pub const NAMES: &[&str] = &["tutorial", "two-by-two"];

/// Three facilities, two warehouses, balanced at 8 units.
/// The optimum (cost 15) is not unique.
pub fn tutorial() -> TransportData {
    TransportData::from_numbers(
        &[2.0, 3.0, 3.0],
        &[4.0, 4.0],
        vec![vec![1.0, 2.0], vec![2.0, 2.0], vec![2.0, 3.0]],
    )
}

/// Two facilities, two warehouses, balanced at 250 units.
/// Unique optimum: ship [[80, 20], [0, 150]] for a cost of 890.
pub fn two_by_two() -> TransportData {
    TransportData::from_numbers(
        &[100.0, 150.0],
        &[80.0, 170.0],
        vec![vec![4.0, 6.0], vec![5.0, 3.0]],
    )
}

pub fn by_name(name: &str) -> Option<TransportData> {
    match name {
        "tutorial" => Some(tutorial()),
        "two-by-two" => Some(two_by_two()),
        _ => None,
    }
}

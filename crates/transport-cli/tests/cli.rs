use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn transport() -> Command {
    Command::cargo_bin("transport").expect("binary builds")
}

fn data_file(name: &str) -> String {
    format!("{}/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn solve_tutorial_by_default() {
    transport()
        .arg("solve")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Status: OPTIMAL"))
        .stdout(predicate::str::contains("Objective function value: 15"));
}

#[test]
fn solve_two_by_two_with_duals() {
    transport()
        .args(["solve", "--dataset", "two-by-two", "--duals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transport 80 units from facility f0 to warehouse w0"))
        .stdout(predicate::str::contains("Duals:"))
        .stdout(predicate::str::contains("Objective function value: 890"));
}

#[test]
fn solve_file_as_json() {
    let output = transport()
        .args(["solve", "--format", "json"])
        .arg(data_file("unbalanced.json"))
        .output()
        .expect("run transport");

    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let objective = plan["objective_value"].as_f64().expect("objective");
    assert!((objective - 320.0).abs() < 1e-6);
    assert_eq!(plan["shipments"].as_array().map(Vec::len), Some(4));
}

#[test]
fn infeasible_problem_exits_with_failure() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"supply":[{{"id":"a","capacity":1}}],"demand":[{{"id":"b","requirement":5}}],"costs":[[1]]}}"#
    )
    .expect("write data");

    transport()
        .arg("solve")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Status: INFEASIBLE"))
        .stdout(predicate::str::contains("demand[b] is below minimum"));
}

#[test]
fn malformed_costs_fail_before_solving() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"supply":[{{"id":"a","capacity":1}}],"demand":[{{"id":"b","requirement":1}}],"costs":[[1, 2]]}}"#
    )
    .expect("write data");

    transport()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cost row 0 has 2 entries but there are 1 demand nodes"));
}

#[test]
fn check_reports_counts() {
    transport()
        .arg("check")
        .arg(data_file("unbalanced.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 facilities"))
        .stdout(predicate::str::contains("4 routes"))
        .stdout(predicate::str::contains("total supply 200"));
}

#[test]
fn show_prints_the_model() {
    transport()
        .args(["show", "--dataset", "tutorial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("capacity[f1] : x[f1,w0] + x[f1,w1] <= 3"))
        .stdout(predicate::str::contains("minimize"));
}

#[test]
fn unknown_dataset_is_rejected() {
    transport()
        .args(["solve", "--dataset", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dataset 'nope'"));
}

#[test]
fn out_of_range_tolerance_is_rejected() {
    for tolerance in ["NaN", "5"] {
        transport()
            .args(["solve", "--tolerance", tolerance])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("--tolerance"));
    }
}

#[test]
fn one_unit_short_in_billions_is_infeasible() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"supply":[{{"id":"a","capacity":1e9}},{{"id":"b","capacity":1e9}}],
            "demand":[{{"id":"c","requirement":1e9}},{{"id":"d","requirement":1000000001}}],
            "costs":[[1,2],[3,1]]}}"#
    )
    .expect("write data");

    transport()
        .arg("solve")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("INFEASIBLE"));
}

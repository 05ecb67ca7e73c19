//! Tests for the CLI surface, exercised against the real binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn ontap_rest_cli() -> Command {
    Command::cargo_bin("ontap-rest-cli").unwrap()
}

#[test]
fn prints_help() {
    ontap_rest_cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CLI passthrough"));
}

#[test]
fn rejects_operations_outside_the_enumerated_set() {
    ontap_rest_cli()
        .args(["--cluster", "cluster1", "--password", "secret", "PUT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("possible values"));
}

#[test]
fn requires_a_cluster() {
    ontap_rest_cli()
        .env_remove("ONTAP_CLUSTER")
        .args(["--password", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--cluster"));
}

//! End-to-end step scenarios driven through a scripted command runner:
//! which commands get issued, in what order, and how the outcome maps
//! to the scripted exit verdicts.

mod common;

use common::{ScriptedRunner, TestEnv};
use taurus_step::{BuildOutcome, PerformanceTestStep};

#[test]
fn global_tool_success_runs_the_test_directly() {
    let env = TestEnv::new();
    // Global probe answers, test command exits 0.
    let runner = ScriptedRunner::new(&[true, true]);
    let step = PerformanceTestStep::new("");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Success);
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ["bzt", "--help"]);
    assert_eq!(calls[1][0], "bzt");
    // No provisioning command was ever issued.
    assert!(
        calls
            .iter()
            .all(|argv| !argv[0].contains("virtualenv") && !argv[0].contains("pip"))
    );
}

#[test]
fn outcome_follows_the_test_exit_code_when_global() {
    let env = TestEnv::new();
    // Global probe answers, test command fails.
    let runner = ScriptedRunner::new(&[true, false]);
    let step = PerformanceTestStep::new("");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Failure);
    assert_eq!(runner.call_count(), 2);
}

#[test]
fn missing_tool_and_missing_virtualenv_fail_after_two_probes() {
    let env = TestEnv::new();
    let runner = ScriptedRunner::new(&[false, false]);
    let step = PerformanceTestStep::new("");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Failure);
    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], ["bzt", "--help"]);
    assert_eq!(calls[1], ["virtualenv", "--help"]);
}

#[test]
fn failed_environment_creation_fails_after_three_commands() {
    let env = TestEnv::new();
    let runner = ScriptedRunner::new(&[false, true, false]);
    let step = PerformanceTestStep::new("");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Failure);
    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[2],
        ["virtualenv", "--clear", "--system-site-packages", "taurus-venv"]
    );
}

#[test]
fn full_provisioning_chain_runs_the_venv_tool() {
    let env = TestEnv::new();
    // Chain: global probe fails, then virtualenv probe, venv creation,
    // pip install and local probe all succeed, then the test command.
    let runner = ScriptedRunner::new(&[false, true, true, true, true, true]);
    let step = PerformanceTestStep::new("-o modules.console.disable=true");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Success);
    let calls = runner.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[3], ["taurus-venv/bin/pip", "--no-cache-dir", "install", "bzt"]);
    assert_eq!(calls[4], ["taurus-venv/bin/bzt", "--help"]);
    assert_eq!(
        calls[5],
        [
            "taurus-venv/bin/bzt".to_owned(),
            "-o".to_owned(),
            "modules.console.disable=true".to_owned(),
            format!("{}/defaultReport.yml", env.workdir().display()),
        ]
    );
}

#[test]
fn default_config_is_materialized_before_the_test_runs() {
    let env = TestEnv::new();
    let runner = ScriptedRunner::new(&[true, true]);
    let step = PerformanceTestStep::new("");

    step.perform(&runner, &env.context());

    let config = env.workdir().join("defaultReport.yml");
    assert!(config.is_file());
    assert!(
        std::fs::read_to_string(config)
            .unwrap()
            .contains("junit-xml")
    );
}

#[test]
fn stale_config_file_is_overwritten_on_every_run() {
    let env = TestEnv::new();
    let config = env.workdir().join("defaultReport.yml");
    std::fs::write(&config, "left over from a previous build").unwrap();

    let runner = ScriptedRunner::new(&[true, true]);
    PerformanceTestStep::new("").perform(&runner, &env.context());

    let contents = std::fs::read_to_string(config).unwrap();
    assert!(!contents.contains("left over"));
    assert!(contents.contains("reporting"));
}

#[test]
fn unavailable_tool_never_launches_the_test_command() {
    let env = TestEnv::new();
    // Full chain succeeds until the local probe, which fails.
    let runner = ScriptedRunner::new(&[false, true, true, true, false]);
    let step = PerformanceTestStep::new("-q");

    let outcome = step.perform(&runner, &env.context());

    assert_eq!(outcome, BuildOutcome::Failure);
    // Five chain commands, no sixth test invocation.
    assert_eq!(runner.call_count(), 5);
    // And no config file was materialized either.
    assert!(!env.workdir().join("defaultReport.yml").exists());
}

#[test]
fn progress_lines_reach_the_sink_before_failure() {
    let env = TestEnv::new();
    let runner = ScriptedRunner::new(&[false, false]);

    PerformanceTestStep::new("").perform(&runner, &env.context());

    let lines = env.log.lines();
    assert!(lines.iter().any(|l| l.contains("Checking for a bzt")));
    assert!(lines.iter().any(|l| l.contains("virtualenv")));
    assert!(lines.last().unwrap().contains("unavailable"));
}

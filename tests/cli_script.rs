mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use regex::Regex;
use serde_json::Value;
use study_wizard::cli::SCRIPT_ENV;

use common::{sample_form, setup_test_env, write_form, TestEnv};

fn run_script(env: &TestEnv, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("study_wizard")
        .expect("binary")
        .env(SCRIPT_ENV, "1")
        .env("STUDY_WIZARD_HOME", &env.home)
        .arg("run")
        .arg(&env.form)
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_completes_the_study() {
    let env = setup_test_env();
    let input = "\
next
check q_2138434720
set q_100 Ada Lovelace
next
other q_300 Designer
next
submit
choose q_501635 \"System B\"
choose q_502 4
submit
exit
";

    run_script(&env, input)
        .success()
        .stdout(contains("Page 1 of 3"))
        .stdout(contains("Please accept the privacy policy"))
        .stdout(contains("Page 2 of 3 | About you"))
        .stdout(contains("Please select a system on this page to continue."))
        .stdout(contains("Answering no (script mode)."))
        .stdout(contains("Submitted session study_"));

    let exported = env.exported_files();
    assert_eq!(exported.len(), 1, "one export expected: {exported:?}");
    let file_name = exported[0]
        .file_name()
        .and_then(|name| name.to_str())
        .expect("export file name");
    let pattern = Regex::new(r"^user_study_study_\d+_[0-9a-f]{9}\.json$").expect("regex");
    assert!(pattern.is_match(file_name), "unexpected name {file_name}");

    let document: Value =
        serde_json::from_str(&fs::read_to_string(&exported[0]).expect("read export"))
            .expect("parse export");
    let responses = &document["responses"];
    assert_eq!(responses["q_2138434720_Privacy policy"], Value::Bool(true));
    assert_eq!(responses["q_100_Participant name"], "Ada Lovelace");
    assert_eq!(responses["q_300_Role"], "Designer");
    assert_eq!(responses["q_300_Role (Other)"], "Designer");
    assert_eq!(responses["q_501635_Preferred system"], "System B");
    assert_eq!(responses["q_502_Ease of use"], "4");
    assert!(document["submissionTime"]
        .as_str()
        .is_some_and(|time| time.ends_with('Z')));

    assert!(env.completion_file().exists());
}

#[test]
fn progress_is_restored_on_the_next_run() {
    let env = setup_test_env();
    run_script(
        &env,
        "check q_2138434720\nset q_100 Grace\nnext\nchoose q_300 Engineer\nexit\n",
    )
    .success();
    assert!(env.progress_file().exists());

    run_script(&env, "status\nback\nexit\n")
        .success()
        .stdout(contains("Page 2 of 3"))
        .stdout(contains("(*) Engineer"))
        .stdout(contains("restored on page 2 with 3 saved answers"))
        .stdout(contains("Participant name [q_100]: Grace"));
}

#[test]
fn completed_study_starts_over() {
    let env = setup_test_env();
    run_script(
        &env,
        "check q_2138434720\nnext\nnext\nchoose q_501635 \"System A\"\nsubmit\nexit\n",
    )
    .success()
    .stdout(contains("Submitted session"));

    run_script(&env, "status\nexit\n")
        .success()
        .stdout(contains("new session (previous study was completed)"))
        .stdout(contains("Page 1 of 3"));
    assert!(!env.completion_file().exists());
}

#[test]
fn reset_clears_answers_and_saved_progress() {
    let env = setup_test_env();
    run_script(
        &env,
        "check q_2138434720\nset q_100 Ada\nnext\nreset\nstatus\nexit\n",
    )
    .success()
    .stdout(contains("Page 1 of 3"))
    .stdout(contains("[ ] q_2138434720"))
    .stdout(contains("Next control : disabled"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let env = setup_test_env();
    run_script(&env, "nxt\nexit\n")
        .success()
        .stdout(contains("Unknown command `nxt`"))
        .stdout(contains("Suggestion: `next`?"));
}

#[test]
fn edits_to_missing_elements_are_reported() {
    let env = setup_test_env();
    run_script(&env, "check q_999\nchoose q_300 Astronaut\nset q_100\nexit\n")
        .success()
        .stdout(contains("No checkbox `q_999` in this form."))
        .stdout(contains("Question `q_300` has no option `Astronaut`."))
        .stdout(contains("usage: set <id> <text>"));
}

#[test]
fn forms_with_page_gaps_are_refused() {
    let env = setup_test_env();
    let mut form = sample_form();
    form["pages"][1]["pageNumber"] = serde_json::json!(3);
    form["pages"][2]["pageNumber"] = serde_json::json!(4);
    write_form(&env.form, &form);

    run_script(&env, "next\nexit\n")
        .failure()
        .stderr(contains("page at position 2 is numbered 3"));
}

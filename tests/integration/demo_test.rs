//! Runs the demo binary as a subprocess.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Runs verbkit-demo with `args`, isolated from the user's config directory.
fn run_in(config_home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_verbkit-demo"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn run_demo(args: &[&str]) -> (i32, String, String) {
    let home = TempDir::new().unwrap();
    run_in(home.path(), args)
}

const CLEANUP: &str = "Tidying and Cleaning...\nAll done\n";

#[test]
fn test_show_knows_nothing_by_default() {
    let (code, stdout, _) = run_demo(&["show"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, format!("I know nothing\n{CLEANUP}"));
}

#[test]
fn test_show_everything() {
    let (code, stdout, _) = run_demo(&["show", "--all", "--sob", "boo hoo"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("OK I will tell you everything\nboo hoo\nYou're in: dev\n"));
    assert!(stdout.contains("The mystery man is Blake\n"));
    assert_eq!(stdout.matches("boo hoo").count(), 2);
}

#[test]
fn test_environment_choice_abbreviated() {
    let (code, stdout, _) = run_demo(&["-a", "-e", "pr", "sh"]);
    // "sh" is ambiguous between show and sheep.
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Sorry, What?\n"));

    let (_, stdout, _) = run_demo(&["-a", "--env", "pr", "sho"]);
    assert!(stdout.contains("You're in: prod\n"));
}

#[test]
fn test_ambiguous_environment() {
    let (code, stdout, _) = run_demo(&["-e", "de", "show"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "Error: You need to be clearer than that\n\
         I am not sure what argument you mean: --environment de\n"
    );
}

#[test]
fn test_invalid_option() {
    let (code, stdout, _) = run_demo(&["--bogus"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Error: Invalid Option\n"));
}

#[test]
fn test_about_takes_all_arguments() {
    let (_, stdout, _) = run_demo(&["about", "the", "weather"]);
    assert_eq!(stdout, format!("I know nothing about the weather\n{CLEANUP}"));

    let (_, stdout, _) = run_demo(&["ab"]);
    assert!(stdout.starts_with("Sorry, what do you want to know about?\n"));
}

#[test]
fn test_help_for_show() {
    let (code, stdout, _) = run_demo(&["-h", "show"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "Help for show\n\n\
         You can use this to find out what I know\n\
         If you persist with options I may tell you more\n\n"
    );
}

#[test]
fn test_help_for_unknown_action() {
    let (code, stdout, _) = run_demo(&["-h", "zzz"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Sorry, but I do not understand the action: zzz\n\n"));
    assert!(stdout.contains("Usage: verbkit-demo [options] action\n"));
    assert!(stdout.contains("-e, --environment TYPE"));
}

#[test]
fn test_general_help() {
    let (code, stdout, _) = run_demo(&[]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Usage: verbkit-demo [options] action\n"));
    assert!(stdout.contains("  question - Interrogate in more detail (+)\n"));
    assert!(stdout.contains("Actions marked (+) have further help: verbkit-demo -h <action>\n"));
}

#[test]
fn test_nested_help() {
    let (_, stdout, _) = run_demo(&["-h", "question"]);
    assert!(stdout.starts_with("Usage: verbkit-demo question aspect\n"));
    assert!(stdout.contains("verbkit-demo -h question <action>"));
    assert!(!stdout.contains("Options:"));

    let (_, stdout, _) = run_demo(&["question", "-h", "home"]);
    assert!(stdout.starts_with("Help for home\n"));
}

#[test]
fn test_manual() {
    let (code, stdout, _) = run_demo(&["--man"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Help for show\n"));
    assert!(stdout.contains("Usage: verbkit-demo question aspect\n"));
}

#[test]
fn test_nested_action_consumes_shared_arguments() {
    let (code, stdout, _) = run_demo(&["q", "home", "kitchen"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        format!("I don't do kitchen at home\nPutting the questions away\n{CLEANUP}")
    );

    let (_, stdout, _) = run_demo(&["question", "ho"]);
    assert!(stdout.starts_with("I don't do Cooking at home\n"));
}

#[test]
fn test_exit_from_nested_action() {
    let (code, stdout, _) = run_demo(&["--altogether", "question", "errors"]);
    assert_eq!(code, 1);
    assert_eq!(
        stdout,
        format!("Error: I know nothing about errors\nPutting the questions away\n{CLEANUP}")
    );

    let (code, stdout, _) = run_demo(&["question", "errors"]);
    assert_eq!(code, 1);
    assert_eq!(stdout, format!("Putting the questions away\n{CLEANUP}"));
}

#[test]
fn test_config_file_defaults() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("verbkit-demo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), "[options]\nall = true\nenv = \"test\"\n").unwrap();

    let (code, stdout, _) = run_in(home.path(), &["show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("You're in: test\n"));

    let (_, stdout, _) = run_in(home.path(), &["-e", "dec", "show"]);
    assert!(stdout.contains("You're in: dec\n"));
}

#[test]
fn test_missing_named_config_file() {
    let home = TempDir::new().unwrap();
    let missing = home.path().join("nowhere.toml");
    let (code, stdout, stderr) = run_in(home.path(), &["--config", missing.to_str().unwrap(), "show"]);
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Configuration error"));
}

#[test]
fn test_debug_switch_enables_logging() {
    let (code, _, stderr) = run_demo(&["-D", "sheep"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("dispatching"));

    let (_, _, stderr) = run_demo(&["sheep"]);
    assert!(!stderr.contains("dispatching"));
}

//! Full dispatch runs through the public API, captured in memory.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use verbkit::{ActionResult, Context, Parser, Program, Status, Switch, Switches};

type Log = Arc<Mutex<Vec<String>>>;

fn record(log: &Log, entry: &str) {
    log.lock().unwrap().push(entry.to_string());
}

fn leaf(log: &Log) -> Arc<Parser> {
    let cleanup = Arc::clone(log);
    Parser::builder()
        .usage("deep leaf")
        .action("boom", "Explode", |ctx: &mut Context<'_>| ctx.exit(Some("boom")))
        .action("quiet", "Leave quietly", |ctx: &mut Context<'_>| ctx.exit(None))
        .action("echo", "Echo the next argument", |ctx: &mut Context<'_>| {
            let word = ctx.next_argument_or_fail("echo what?")?;
            ctx.say(word)?;
            Ok(())
        })
        .after_actions(move |_| {
            record(&cleanup, "leaf");
            Ok(())
        })
        .build()
        .unwrap()
}

fn tree(log: &Log) -> Program {
    let middle_cleanup = Arc::clone(log);
    let middle = Parser::builder()
        .usage("deep")
        .nest("leaf", "The bottom", leaf(log))
        .after_actions(move |_| {
            record(&middle_cleanup, "middle");
            Ok(())
        })
        .build()
        .unwrap();

    let root_cleanup = Arc::clone(log);
    let root = Parser::builder()
        .usage("[options] action")
        .nest("deep", "Go deeper", middle)
        .action("top", "Stay at the top", |ctx: &mut Context<'_>| -> ActionResult {
            ctx.say("top")?;
            Ok(())
        })
        .after_actions(move |_| {
            record(&root_cleanup, "root");
            Ok(())
        })
        .build()
        .unwrap();

    let mut switches = Switches::new();
    switches.register_switch(Switch::flag(Some('v'), "verbose", "say more"));
    Program::new("tree", root).switches(switches)
}

fn run(args: &[&str]) -> (Status, String, Vec<String>) {
    let log = Log::default();
    let mut out = Vec::new();
    let status = tree(&log).run_with(args.iter().copied(), &mut out).unwrap();
    let cleanups = log.lock().unwrap().clone();
    (status, String::from_utf8(out).unwrap(), cleanups)
}

#[test]
fn test_exit_three_levels_deep() {
    let (status, out, cleanups) = run(&["deep", "leaf", "boom"]);
    assert_eq!(status, Status::Exited);
    assert_eq!(out, "boom\n");
    assert_eq!(cleanups, vec!["leaf", "middle", "root"]);
}

#[test]
fn test_silent_exit_three_levels_deep() {
    let (status, out, cleanups) = run(&["d", "l", "q"]);
    assert_eq!(status, Status::Exited);
    assert_eq!(out, "");
    assert_eq!(cleanups, vec!["leaf", "middle", "root"]);
}

#[test]
fn test_missing_argument_stays_at_its_level() {
    let (status, out, cleanups) = run(&["deep", "leaf", "echo"]);
    assert_eq!(status, Status::Completed);
    assert_eq!(out, "Error: Missing argument\necho what?\n");
    assert_eq!(cleanups, vec!["leaf", "middle", "root"]);
}

#[test]
fn test_options_interleave_with_nested_actions() {
    let (status, out, _) = run(&["deep", "-v", "leaf", "echo", "hello"]);
    assert_eq!(status, Status::Completed);
    assert_eq!(out, "hello\n");
}

#[test]
fn test_unknown_nested_action_shows_nested_help() {
    let (status, out, cleanups) = run(&["deep", "nope"]);
    assert_eq!(status, Status::Completed);
    assert!(out.starts_with("Sorry, What?\n\nUsage: tree deep\n"));
    assert!(!out.contains("Options:"));
    // Nothing ran at the middle level, so only the root cleans up.
    assert_eq!(cleanups, vec!["root"]);
}

#[test]
fn test_help_walks_the_tree() {
    let (_, out, cleanups) = run(&["-h", "deep", "leaf"]);
    assert!(out.starts_with("Usage: tree deep leaf\n"));
    assert!(out.contains("  boom  - Explode\n"));
    assert!(cleanups.is_empty());
}

#[test]
fn test_top_level_action() {
    let (status, out, cleanups) = run(&["top"]);
    assert_eq!(status, Status::Completed);
    assert_eq!(out, "top\n");
    assert_eq!(cleanups, vec!["root"]);
}

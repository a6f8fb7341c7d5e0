//! verbkit-demo - a small command tree built on verbkit.

use std::process;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, error};

use verbkit::config::Config;
use verbkit::logging::{self, LogHandle};
use verbkit::{ActionResult, Context, Parser, Program, Switch, Switches};

const PROGRAM: &str = "verbkit-demo";

const SECRETS: [&str; 3] = [
    "The answer to the universe is 42",
    "The mystery man is Blake",
    "The beginning of the Universe is the wrong question",
];

fn main() {
    let log = logging::init_stderr_logging();

    match run(log) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{e:#}");
            eprintln!("{PROGRAM}: {e:#}");
            process::exit(2);
        }
    }
}

fn run(log: LogHandle) -> Result<i32> {
    let program = Program::new(PROGRAM, root_parser()?)
        .switches(switches(log))
        .before_all(|options| options.set("env", "dev"))
        .config_file(Config::default_path(PROGRAM));

    let status = program
        .run(std::env::args().skip(1))
        .context("Failed to run command")?;
    Ok(status.exit_code())
}

fn switches(log: LogHandle) -> Switches {
    let mut switches = Switches::new();
    switches.register_switch(Switch::flag(Some('a'), "all", "show me everything"));
    switches.register_switch(Switch::flag(
        Some('A'),
        "altogether",
        "show me everything, really",
    ));
    switches.register_switch(
        Switch::choice(
            Some('e'),
            "environment",
            "TYPE",
            ["dev", "dec", "test", "prod"],
            "specify the environment",
        )
        .key("env"),
    );
    switches.register_switch(Switch::optional(
        Some('s'),
        "sob",
        "TEXT",
        "sob when telling truth",
    ));
    switches.config_option();
    switches.debug_option(log);
    switches
}

fn root_parser() -> Result<Arc<Parser>> {
    let parser = Parser::builder()
        .usage("[options] action")
        .description(["A simple test", "that tells you little"])
        .action("show", "Show me what you know", show)
        .help(
            "show",
            [
                "You can use this to find out what I know",
                "If you persist with options I may tell you more",
            ],
        )
        .action("about", "Tell me about something", about)
        .action("sheep", "All about sheep", |ctx| {
            ctx.say("Baaaa")?;
            Ok(())
        })
        .nest("question", "Interrogate in more detail", question_parser()?)
        .before_actions(|ctx| {
            debug!(action = ctx.action(), "preparing");
            Ok(())
        })
        .after_actions(|ctx| {
            ctx.say("Tidying and Cleaning...")?;
            ctx.say("All done")
        })
        .build()?;
    Ok(parser)
}

fn question_parser() -> Result<Arc<Parser>> {
    let parser = Parser::builder()
        .usage("question aspect")
        .description(["ask a question about a particular aspect"])
        .action("work", "Ask about work-related things", |ctx| {
            ctx.say("I am unemployed")?;
            Ok(())
        })
        .action("home", "Ask about home related things", |ctx| {
            let topic = ctx.next_argument_or("Cooking");
            ctx.say(format!("I don't do {topic} at home"))?;
            Ok(())
        })
        .help(
            "home",
            [
                "suggest something I might do at home, such as",
                "cleaning or painting",
            ],
        )
        .action("errors", "Ask me about errors", |ctx| {
            if ctx.option_true("altogether") {
                return ctx.exit(Some("Error: I know nothing about errors"));
            }
            ctx.exit(None)
        })
        .after_actions(|ctx| ctx.say("Putting the questions away"))
        .build()?;
    Ok(parser)
}

fn show(ctx: &mut Context<'_>) -> ActionResult {
    if !ctx.option_true("all") {
        ctx.say("I know nothing")?;
        return Ok(());
    }

    let sob = ctx
        .option_set("sob")
        .then(|| ctx.option_str("sob").unwrap_or_default().to_string());
    let env = ctx.option_str("env").unwrap_or("dev").to_string();

    ctx.say("OK I will tell you everything")?;
    if let Some(sob) = &sob {
        ctx.say(sob)?;
    }
    ctx.say(format!("You're in: {env}"))?;
    for secret in SECRETS {
        ctx.say(secret)?;
    }
    if let Some(sob) = &sob {
        ctx.say(sob)?;
    }
    Ok(())
}

fn about(ctx: &mut Context<'_>) -> ActionResult {
    let subject = ctx.all_arguments().join(" ");
    if subject.is_empty() {
        ctx.say("Sorry, what do you want to know about?")?;
    } else {
        ctx.say(format!("I know nothing about {subject}"))?;
    }
    Ok(())
}

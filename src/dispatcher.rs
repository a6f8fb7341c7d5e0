//! Dispatch: choose between help, an action and the fallback help, then run
//! the chosen action under the early-exit rules.
//!
//! Each level of a command tree runs its own [`Dispatcher`]. Levels share
//! one [`Invocation`]: the root owns it and nested levels reach it through a
//! [`NestedInvocation`].

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::bridge::{Invocation, NestedInvocation};
use crate::error::ParseError;
use crate::help::{self, HelpContext};
use crate::matcher::Resolution;
use crate::options::OptionValue;
use crate::parser::{Hook, Parser};
use crate::registry::{ActionRegistry, HelpBody};
use crate::signal::{Abort, ActionResult, ExitSignal};
use crate::switches::HelpRequest;

/// What a handler sees while it runs.
pub struct Context<'a> {
    invocation: &'a mut dyn Invocation,
    action: &'a str,
    help: &'a HelpContext<'a>,
}

impl<'a> Context<'a> {
    pub fn new(
        invocation: &'a mut dyn Invocation,
        action: &'a str,
        help: &'a HelpContext<'a>,
    ) -> Self {
        Self {
            invocation,
            action,
            help,
        }
    }

    /// Name of the action being run.
    pub fn action(&self) -> &str {
        self.action
    }

    pub fn next_argument(&mut self) -> Option<String> {
        self.invocation.cursor().next()
    }

    pub fn next_argument_or(&mut self, default: impl Into<String>) -> String {
        self.invocation.cursor().next_or(default)
    }

    /// Takes the next argument or fails with `message`, reported to the user
    /// by the dispatcher.
    pub fn next_argument_or_fail(&mut self, message: impl Into<String>) -> Result<String, ParseError> {
        self.invocation.cursor().next_or_fail(message)
    }

    pub fn all_arguments(&mut self) -> Vec<String> {
        self.invocation.cursor().take_all()
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.invocation.options().get(key)
    }

    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.invocation.options().get_str(key)
    }

    /// Whether `key` was given at all.
    pub fn option_set(&self, key: &str) -> bool {
        self.invocation.options().contains(key)
    }

    /// Whether `key` was given and is truthy.
    pub fn option_true(&self, key: &str) -> bool {
        self.invocation.options().is_true(key)
    }

    pub fn out(&mut self) -> &mut dyn Write {
        self.invocation.out()
    }

    /// Writes one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.invocation.out(), "{}", line.as_ref())
    }

    /// Stops the run. The message, if any, is shown once; cleanup hooks run
    /// at every level on the way out.
    pub fn exit(&self, message: Option<&str>) -> ActionResult {
        Err(Abort::exit(message.map(str::to_string)))
    }

    /// Dispatches into `nested`, which shares this run's arguments and
    /// options.
    pub fn nest(&mut self, nested: &Parser) -> ActionResult {
        let help = self.help.child(self.action);
        let mut bridge = NestedInvocation::new(&mut *self.invocation);
        Dispatcher::new(nested, &mut bridge, help).run()
    }
}

/// Dispatch states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Start,
    HelpRequested,
    Manual,
    ActionPending,
    /// Detailed help for a resolved action.
    ActionHelp(String),
    /// Run the handler for a resolved action.
    Dispatch(String),
    /// General help, optionally preceded by a notice.
    Fallback(Option<&'static str>),
    Done,
}

const NO_SPECIFIC_HELP: &str = "Sorry, there is no specific help for this action";
const NOT_UNDERSTOOD: &str = "Sorry, What?";

/// Runs one level of a command tree.
pub struct Dispatcher<'d> {
    parser: &'d Parser,
    invocation: &'d mut dyn Invocation,
    help: HelpContext<'d>,
}

impl<'d> Dispatcher<'d> {
    pub fn new(
        parser: &'d Parser,
        invocation: &'d mut dyn Invocation,
        help: HelpContext<'d>,
    ) -> Self {
        Self {
            parser,
            invocation,
            help,
        }
    }

    /// Runs the state machine to completion.
    ///
    /// Returns `Err` only for an [`ExitSignal`] escalating to the level above
    /// (already reported, message cleared) or for failed output.
    pub fn run(mut self) -> ActionResult {
        let depth = self.help.depth();
        let mut state = State::Start;
        loop {
            debug!(depth, ?state, "dispatch state");
            state = match state {
                State::Start => match self.invocation.help() {
                    HelpRequest::None => State::ActionPending,
                    HelpRequest::Help => State::HelpRequested,
                    HelpRequest::Manual => State::Manual,
                },
                State::HelpRequested => self.help_requested()?,
                State::Manual => {
                    let lines = help::manual(self.registry(), &self.help);
                    self.write_lines(&lines)?;
                    State::Done
                }
                State::ActionPending => self.action_pending(),
                State::ActionHelp(name) => {
                    let ctx = self.help.clone();
                    self.explain(self.registry(), &name, &ctx)?;
                    State::Done
                }
                State::Dispatch(name) => {
                    self.dispatch(&name)?;
                    State::Done
                }
                State::Fallback(notice) => {
                    if let Some(notice) = notice {
                        self.write_lines(&[notice.to_string(), String::new()])?;
                    }
                    let lines = help::general(self.registry(), &self.help);
                    self.write_lines(&lines)?;
                    State::Done
                }
                State::Done => return Ok(()),
            };
        }
    }

    fn registry(&self) -> &'d ActionRegistry {
        self.parser.registry()
    }

    fn help_requested(&mut self) -> io::Result<State> {
        let Some(token) = self.invocation.cursor().next() else {
            return Ok(State::Fallback(None));
        };
        let registry = self.registry();
        match registry.resolve(&token).name() {
            Some(name) => Ok(State::ActionHelp(name.to_string())),
            None => {
                self.write_lines(&[unknown_action(&token), String::new()])?;
                Ok(State::Fallback(None))
            }
        }
    }

    /// Renders help for `name` in `registry`, descending into nested
    /// registries while the cursor still names actions.
    fn explain(
        &mut self,
        registry: &ActionRegistry,
        name: &str,
        ctx: &HelpContext<'_>,
    ) -> io::Result<()> {
        let Some(entry) = registry.resolve_exact(name) else {
            return Ok(());
        };
        match entry.help {
            Some(HelpBody::Lines(body)) => self.write_lines(&help::action(entry.name, body)),
            Some(HelpBody::Nested(child)) => {
                let child_ctx = ctx.child(entry.name);
                let Some(token) = self.invocation.cursor().next() else {
                    return self.write_lines(&help::general(child, &child_ctx));
                };
                match child.resolve(&token).name() {
                    Some(next) => self.explain(child, next, &child_ctx),
                    None => {
                        self.write_lines(&[unknown_action(&token), String::new()])?;
                        self.write_lines(&help::general(child, &child_ctx))
                    }
                }
            }
            None => {
                self.write_lines(&[NO_SPECIFIC_HELP.to_string(), String::new()])?;
                self.write_lines(&help::general(registry, ctx))
            }
        }
    }

    fn action_pending(&mut self) -> State {
        let Some(token) = self.invocation.cursor().next() else {
            return State::Fallback(None);
        };
        match self.registry().resolve(&token) {
            Resolution::Exact(name) | Resolution::Abbreviated(name) => {
                State::Dispatch(name.to_string())
            }
            Resolution::Ambiguous(candidates) => {
                warn!(%token, ?candidates, "ambiguous action");
                State::Fallback(Some(NOT_UNDERSTOOD))
            }
            Resolution::Unknown => {
                warn!(%token, "unrecognized action");
                State::Fallback(Some(NOT_UNDERSTOOD))
            }
        }
    }

    /// Runs the handler for `name` between this level's hooks.
    ///
    /// `after_actions` runs exactly once whatever the handler returns. An
    /// exit signal's message is printed here and a silent signal goes up.
    fn dispatch(&mut self, name: &str) -> ActionResult {
        let parser = self.parser;
        let Some(handler) = parser.handler(name) else {
            unreachable!("every declared action has a handler once built: {name}");
        };
        info!(action = name, depth = self.help.depth(), "dispatching");

        let mut ctx = Context::new(&mut *self.invocation, name, &self.help);
        let outcome = match run_hook(parser.before_actions(), &mut ctx) {
            Ok(()) => handler(&mut ctx),
            Err(err) => Err(Abort::Io(err)),
        };

        let (report, result) = match outcome {
            Ok(()) => (Ok(()), Ok(())),
            Err(Abort::Parse(err)) => {
                debug!(action = name, %err, "required argument missing");
                let report = ctx.say(err.category()).and_then(|()| ctx.say(&err.message));
                (report, Ok(()))
            }
            Err(Abort::Exit(signal)) => {
                debug!(action = name, message = ?signal.message(), "exit signal");
                let report = match signal.message() {
                    Some(message) => ctx.say(message),
                    None => Ok(()),
                };
                (report, Err(Abort::Exit(ExitSignal::silent())))
            }
            Err(Abort::Io(err)) => (Ok(()), Err(Abort::Io(err))),
        };
        let cleanup = run_hook(parser.after_actions(), &mut ctx);

        report?;
        cleanup?;
        result
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        let out = self.invocation.out();
        for line in lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

fn run_hook(hook: Option<&Hook>, ctx: &mut Context<'_>) -> io::Result<()> {
    match hook {
        Some(hook) => hook(ctx),
        None => Ok(()),
    }
}

fn unknown_action(token: &str) -> String {
    format!("Sorry, but I do not understand the action: {token}")
}

//! Option-switch grammar.
//!
//! Switches are declared up front and parsed with clap. Options may appear
//! anywhere among the positionals, long options may be abbreviated to any
//! unambiguous prefix, and clap failures are folded into [`GrammarError`].

use std::fmt;
use std::sync::Arc;

use clap::builder::ValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches};

use crate::config::CONFIG_KEY;
use crate::error::GrammarError;
use crate::logging::LogHandle;
use crate::matcher::{self, Resolution};
use crate::options::OptionSet;

const HELP_ID: &str = "__help";
const MAN_ID: &str = "__man";
const POSITIONAL_ID: &str = "__positional";

/// Width of the switch column in rendered help.
const SUMMARY_WIDTH: usize = 32;

/// Callback run when a switch is present on the command line.
///
/// Receives the option set being built and the switch's value, if it takes
/// one and one was given. An error rejects the whole command line.
pub type OnParsed =
    Arc<dyn Fn(&mut OptionSet, Option<&str>) -> Result<(), GrammarError> + Send + Sync>;

/// What, if anything, follows a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// No value (`--all`).
    Flag,
    /// A mandatory value (`--config PATH`).
    Required(String),
    /// A value that may be omitted (`--sob [TEXT]`).
    Optional(String),
    /// One of a fixed set of values, abbreviations allowed.
    Choice { name: String, choices: Vec<String> },
}

/// One declared switch.
#[derive(Clone)]
pub struct Switch {
    short: Option<char>,
    long: String,
    kind: ValueKind,
    description: String,
    key: String,
    on_parsed: Option<OnParsed>,
}

impl fmt::Debug for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Switch")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Switch {
    /// Declares a switch. The option key defaults to the long form with
    /// dashes turned into underscores.
    pub fn new(
        short: Option<char>,
        long: impl Into<String>,
        kind: ValueKind,
        description: impl Into<String>,
    ) -> Self {
        let long = long.into();
        Self {
            short,
            key: long.replace('-', "_"),
            long,
            kind,
            description: description.into(),
            on_parsed: None,
        }
    }

    pub fn flag(short: Option<char>, long: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(short, long, ValueKind::Flag, description)
    }

    pub fn required(
        short: Option<char>,
        long: impl Into<String>,
        value_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(short, long, ValueKind::Required(value_name.into()), description)
    }

    pub fn optional(
        short: Option<char>,
        long: impl Into<String>,
        value_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(short, long, ValueKind::Optional(value_name.into()), description)
    }

    pub fn choice<I, S>(
        short: Option<char>,
        long: impl Into<String>,
        value_name: impl Into<String>,
        choices: I,
        description: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = ValueKind::Choice {
            name: value_name.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        };
        Self::new(short, long, kind, description)
    }

    /// Stores the parsed value under `key` instead of the default key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Replaces the default store-under-key behaviour.
    pub fn on_parsed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut OptionSet, Option<&str>) -> Result<(), GrammarError> + Send + Sync + 'static,
    {
        self.on_parsed = Some(Arc::new(callback));
        self
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.long.clone()).long(self.long.clone());
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        match &self.kind {
            ValueKind::Flag => arg.action(ArgAction::SetTrue),
            ValueKind::Required(name) | ValueKind::Choice { name, .. } => arg
                .action(ArgAction::Set)
                .num_args(1)
                .value_name(name.clone())
                .value_parser(ValueParser::string()),
            ValueKind::Optional(name) => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_missing_value("")
                .value_name(name.clone())
                .value_parser(ValueParser::string()),
        }
    }

    /// Reads this switch's outcome from the matches and applies it.
    fn apply(&self, matches: &ArgMatches, options: &mut OptionSet) -> Result<(), GrammarError> {
        let value = match &self.kind {
            ValueKind::Flag => {
                if !matches.get_flag(&self.long) {
                    return Ok(());
                }
                None
            }
            ValueKind::Required(_) => match matches.get_one::<String>(&self.long) {
                Some(value) => Some(value.clone()),
                None => return Ok(()),
            },
            ValueKind::Optional(_) => match matches.get_one::<String>(&self.long) {
                Some(value) if value.is_empty() => None,
                Some(value) => Some(value.clone()),
                None => return Ok(()),
            },
            ValueKind::Choice { choices, .. } => match matches.get_one::<String>(&self.long) {
                Some(value) => Some(self.resolve_choice(choices, value)?),
                None => return Ok(()),
            },
        };

        tracing::debug!(switch = %self.long, value = ?value, "switch parsed");
        match &self.on_parsed {
            Some(callback) => callback(options, value.as_deref()),
            None => {
                match value {
                    Some(value) => options.set(self.key.clone(), value),
                    None => options.set_flag(self.key.clone()),
                }
                Ok(())
            }
        }
    }

    fn resolve_choice(&self, choices: &[String], value: &str) -> Result<String, GrammarError> {
        let offending = || format!("--{} {}", self.long, value);
        match matcher::resolve(choices.iter().map(String::as_str), value) {
            Resolution::Exact(choice) | Resolution::Abbreviated(choice) => Ok(choice.to_string()),
            Resolution::Ambiguous(_) => Err(GrammarError::AmbiguousArgument(offending())),
            Resolution::Unknown => Err(GrammarError::InvalidArgument(offending())),
        }
    }

    /// Left-hand column of the help line, e.g. `-e, --environment TYPE`.
    fn summary(&self) -> String {
        let short = match self.short {
            Some(c) => format!("-{c}, "),
            None => "    ".to_string(),
        };
        let value = match &self.kind {
            ValueKind::Flag => String::new(),
            ValueKind::Required(name) | ValueKind::Choice { name, .. } => format!(" {name}"),
            ValueKind::Optional(name) => format!(" [{name}]"),
        };
        format!("{short}--{}{value}", self.long)
    }
}

/// Which kind of help, if any, the command line asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HelpRequest {
    #[default]
    None,
    /// `-h` / `--help`.
    Help,
    /// `--man`: the full manual.
    Manual,
}

/// Result of parsing the raw command line.
#[derive(Debug, Clone, Default)]
pub struct ParsedArgs {
    pub options: OptionSet,
    pub positionals: Vec<String>,
    pub help: HelpRequest,
}

/// The set of switches a root command accepts.
#[derive(Debug, Clone, Default)]
pub struct Switches {
    switches: Vec<Switch>,
}

impl Switches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_switch(&mut self, switch: Switch) {
        self.switches.push(switch);
    }

    /// Registers `-D` / `--debug`: stores `debug = true` and raises the
    /// log level through `log`.
    pub fn debug_option(&mut self, log: LogHandle) {
        self.register_switch(
            Switch::flag(Some('D'), "debug", "show debug information").on_parsed(
                move |options, _| {
                    log.enable_debug();
                    options.set_flag("debug");
                    Ok(())
                },
            ),
        );
    }

    /// Registers `-c` / `--config PATH`, naming a configuration file to use
    /// in place of the default one.
    pub fn config_option(&mut self) {
        self.register_switch(
            Switch::required(Some('c'), "config", "PATH", "use this configuration file")
                .key(CONFIG_KEY),
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = &Switch> {
        self.switches.iter()
    }

    /// Parses `raw` (without the program name) on top of `options`.
    pub fn parse<I, S>(&self, raw: I, mut options: OptionSet) -> Result<ParsedArgs, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = raw.into_iter().map(Into::into).collect();
        let matches = self
            .command()
            .try_get_matches_from(&raw)
            .map_err(|err| self.classify(&err))?;

        for switch in &self.switches {
            switch.apply(&matches, &mut options)?;
        }

        let help = if matches.get_flag(MAN_ID) {
            HelpRequest::Manual
        } else if matches.get_flag(HELP_ID) {
            HelpRequest::Help
        } else {
            HelpRequest::None
        };

        let positionals = matches
            .get_many::<String>(POSITIONAL_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(ParsedArgs {
            options,
            positionals,
            help,
        })
    }

    /// Help lines for the "Options:" section.
    ///
    /// `further_help` selects the wording of the help switch: whether any
    /// action has detailed help of its own.
    pub fn help_lines(&self, further_help: bool) -> Vec<String> {
        let help_description = if further_help {
            "use with an action for further help"
        } else {
            "you are looking at it"
        };

        let mut lines: Vec<String> = self
            .switches
            .iter()
            .map(|switch| summary_line(&switch.summary(), &switch.description))
            .collect();
        lines.push(summary_line("-h, --help", help_description));
        lines.push(summary_line("    --man", "print the full manual"));
        lines
    }

    fn command(&self) -> clap::Command {
        let mut cmd = clap::Command::new("verbkit")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .infer_long_args(true)
            .args_override_self(true)
            .arg(
                Arg::new(HELP_ID)
                    .short('h')
                    .long("help")
                    .action(ArgAction::SetTrue),
            )
            .arg(Arg::new(MAN_ID).long("man").action(ArgAction::SetTrue))
            .arg(
                Arg::new(POSITIONAL_ID)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .value_parser(ValueParser::string()),
            );
        for switch in &self.switches {
            cmd = cmd.arg(switch.to_arg());
        }
        cmd
    }

    fn classify(&self, err: &clap::Error) -> GrammarError {
        let arg = context(err, ContextKind::InvalidArg);
        let value = context(err, ContextKind::InvalidValue);
        tracing::debug!(kind = ?err.kind(), %arg, %value, "option grammar error");

        match err.kind() {
            ErrorKind::UnknownArgument if self.is_ambiguous_long(&arg) => {
                GrammarError::AmbiguousOption(arg)
            }
            ErrorKind::UnknownArgument => GrammarError::InvalidOption(arg),
            ErrorKind::InvalidValue if value.is_empty() => GrammarError::MissingArgument(arg),
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
                GrammarError::InvalidArgument(format!("{arg} {value}"))
            }
            ErrorKind::NoEquals | ErrorKind::TooFewValues | ErrorKind::WrongNumberOfValues => {
                GrammarError::MissingArgument(arg)
            }
            _ => GrammarError::Malformed(
                err.to_string()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string(),
            ),
        }
    }

    /// Whether `token` is a long option prefixing several declared names.
    fn is_ambiguous_long(&self, token: &str) -> bool {
        let Some(name) = token.strip_prefix("--") else {
            return false;
        };
        let name = name.split('=').next().unwrap_or_default();
        let longs = self
            .switches
            .iter()
            .map(Switch::long)
            .chain(["help", "man"]);
        matches!(matcher::resolve(longs, name), Resolution::Ambiguous(_))
    }
}

fn context(err: &clap::Error, kind: ContextKind) -> String {
    match err.get(kind) {
        Some(ContextValue::String(s)) => s.clone(),
        Some(ContextValue::Strings(values)) => values.join(" "),
        _ => String::new(),
    }
}

fn summary_line(summary: &str, description: &str) -> String {
    format!("    {summary:<SUMMARY_WIDTH$} {description}")
}

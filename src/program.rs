//! A runnable program: a root command definition plus the switches it
//! accepts.
//!
//! [`Program::run`] is the outermost dispatch boundary. Option-grammar
//! errors are reported here, and an exit signal that escalates this far
//! becomes [`Status::Exited`].

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::bridge::RootInvocation;
use crate::config::{Config, CONFIG_KEY};
use crate::cursor::ArgumentCursor;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::help::HelpContext;
use crate::options::OptionSet;
use crate::parser::Parser;
use crate::signal::Abort;
use crate::switches::Switches;

/// Root-only hook seeding option values before the command line is read.
pub type BeforeAll = Arc<dyn Fn(&mut OptionSet) + Send + Sync>;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Normal completion, including problems already reported to the user.
    Completed,
    /// A handler asked to exit and the signal reached the top.
    Exited,
}

impl Status {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::Exited => 1,
        }
    }
}

pub struct Program {
    name: String,
    parser: Arc<Parser>,
    switches: Switches,
    before_all: Option<BeforeAll>,
    config_path: Option<PathBuf>,
}

impl Program {
    pub fn new(name: impl Into<String>, parser: Arc<Parser>) -> Self {
        Self {
            name: name.into(),
            parser,
            switches: Switches::new(),
            before_all: None,
            config_path: None,
        }
    }

    pub fn switches(mut self, switches: Switches) -> Self {
        self.switches = switches;
        self
    }

    /// Seeds option values. Configuration and switches both override them.
    pub fn before_all<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut OptionSet) + Send + Sync + 'static,
    {
        self.before_all = Some(Arc::new(hook));
        self
    }

    /// Reads default option values from `path` if it exists. A `config`
    /// option given on the command line names a file to use instead.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs against `args` (without the program name), writing to stdout.
    pub fn run<I, S>(&self, args: I) -> Result<Status>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let status = self.run_with(args, &mut out)?;
        out.flush()?;
        Ok(status)
    }

    /// Runs against `args`, writing user-facing output to `out`.
    ///
    /// Returns `Err` only for configuration problems and failed output;
    /// everything the user got wrong is reported to `out`.
    pub fn run_with<I, S>(&self, args: I, out: &mut dyn Write) -> Result<Status>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seeded = OptionSet::new();
        if let Some(hook) = &self.before_all {
            hook(&mut seeded);
        }

        let parsed = match self.switches.parse(args, OptionSet::new()) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "command line rejected");
                writeln!(out, "{}", err.headline())?;
                writeln!(out, "{err}")?;
                return Ok(Status::Completed);
            }
        };

        let mut options = parsed.options;
        if let Some(config) = self.load_config(&options)? {
            config.apply_to(&mut options);
        }
        options.merge_defaults(&seeded);
        debug!(?options, positionals = ?parsed.positionals, "command line parsed");

        let help = HelpContext::root(&self.name, Some(&self.switches));
        let mut invocation = RootInvocation::new(
            ArgumentCursor::new(parsed.positionals),
            options,
            parsed.help,
            out,
        );

        match Dispatcher::new(&self.parser, &mut invocation, help).run() {
            Ok(()) => Ok(Status::Completed),
            Err(Abort::Exit(_)) => {
                info!(program = %self.name, "exited early");
                Ok(Status::Exited)
            }
            Err(Abort::Parse(err)) => {
                writeln!(out, "{}", err.category())?;
                writeln!(out, "{}", err.message)?;
                Ok(Status::Completed)
            }
            Err(Abort::Io(err)) => Err(err.into()),
        }
    }

    fn load_config(&self, options: &OptionSet) -> Result<Option<Config>> {
        if let Some(path) = options.get_str(CONFIG_KEY) {
            debug!(path, "loading named config file");
            return Ok(Some(Config::load_required(Path::new(path))?));
        }
        match &self.config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Ok(Some(Config::load_from_file(path)?))
            }
            None => Ok(None),
        }
    }
}

//! Early exit from a running handler.
//!
//! A handler stops early by returning `Err(Abort)`. The dispatcher that ran
//! it reacts, runs its cleanup hook, and, for an [`ExitSignal`], passes a
//! silent signal on to the dispatcher above it.

use std::io;

use crate::error::ParseError;

/// Deliberate exit requested by a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitSignal {
    message: Option<String>,
}

impl ExitSignal {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self::new(Some(message.into()))
    }

    /// A signal with nothing to show, used once the message has been printed.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Why a handler stopped before returning normally.
#[derive(Debug)]
pub enum Abort {
    /// Deliberate exit; escalates to the outermost dispatcher.
    Exit(ExitSignal),
    /// A required argument was missing; reported at the dispatch boundary.
    Parse(ParseError),
    /// Output could not be written.
    Io(io::Error),
}

impl Abort {
    pub fn exit(message: Option<String>) -> Self {
        Self::Exit(ExitSignal::new(message))
    }
}

impl From<ExitSignal> for Abort {
    fn from(signal: ExitSignal) -> Self {
        Self::Exit(signal)
    }
}

impl From<ParseError> for Abort {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<io::Error> for Abort {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result of running a handler or a whole dispatch level.
pub type ActionResult = Result<(), Abort>;

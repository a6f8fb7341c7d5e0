//! The argument stream and option set shared by every dispatch level.
//!
//! The root level owns the cursor, the options and the output sink. A nested
//! level owns nothing: each call forwards to the level that invoked it, so a
//! whole command tree consumes one token stream and reads one option set.

use std::io::Write;

use crate::cursor::ArgumentCursor;
use crate::options::OptionSet;
use crate::switches::HelpRequest;

/// Operations a dispatcher needs from the invocation it runs in.
pub trait Invocation {
    fn cursor(&mut self) -> &mut ArgumentCursor;

    fn options(&self) -> &OptionSet;

    /// Where user-facing output goes.
    fn out(&mut self) -> &mut dyn Write;

    /// Help mode requested on the command line.
    fn help(&self) -> HelpRequest;
}

/// The top-level invocation: sole owner of cursor and options.
pub struct RootInvocation<'w> {
    cursor: ArgumentCursor,
    options: OptionSet,
    help: HelpRequest,
    out: &'w mut dyn Write,
}

impl<'w> RootInvocation<'w> {
    pub fn new(
        cursor: ArgumentCursor,
        options: OptionSet,
        help: HelpRequest,
        out: &'w mut dyn Write,
    ) -> Self {
        Self {
            cursor,
            options,
            help,
            out,
        }
    }
}

impl Invocation for RootInvocation<'_> {
    fn cursor(&mut self) -> &mut ArgumentCursor {
        &mut self.cursor
    }

    fn options(&self) -> &OptionSet {
        &self.options
    }

    fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    fn help(&self) -> HelpRequest {
        self.help
    }
}

/// A nested level, forwarding everything to its parent.
pub struct NestedInvocation<'p> {
    parent: &'p mut dyn Invocation,
}

impl<'p> NestedInvocation<'p> {
    pub fn new(parent: &'p mut dyn Invocation) -> Self {
        Self { parent }
    }
}

impl Invocation for NestedInvocation<'_> {
    fn cursor(&mut self) -> &mut ArgumentCursor {
        self.parent.cursor()
    }

    fn options(&self) -> &OptionSet {
        self.parent.options()
    }

    fn out(&mut self) -> &mut dyn Write {
        self.parent.out()
    }

    fn help(&self) -> HelpRequest {
        self.parent.help()
    }
}

//! verbkit - action dispatch for command-line tools.
//!
//! A program declares named actions, each bound to a handler. The user's
//! action token is resolved exactly or by unambiguous abbreviation, the
//! handler runs, and help is produced at every level of a possibly nested
//! command tree.

pub mod bridge;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod help;
pub mod logging;
pub mod matcher;
pub mod options;
pub mod parser;
pub mod program;
pub mod registry;
pub mod signal;
pub mod switches;

pub use dispatcher::Context;
pub use error::{DefinitionError, GrammarError, ParseError, Result, VerbkitError};
pub use options::{OptionSet, OptionValue};
pub use parser::Parser;
pub use program::{Program, Status};
pub use signal::{Abort, ActionResult, ExitSignal};
pub use switches::{Switch, Switches};

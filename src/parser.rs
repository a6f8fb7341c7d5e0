//! Command definitions: a registry plus the handlers and hooks bound to it.
//!
//! A definition is assembled with [`ParserBuilder`] and frozen by
//! [`ParserBuilder::build`], which rejects definitions that could not be
//! dispatched safely. The result is shared behind an `Arc` by every run and
//! by any parent definition that nests it.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::dispatcher::Context;
use crate::error::DefinitionError;
use crate::registry::{ActionRegistry, HelpBody};
use crate::signal::ActionResult;

/// Routine bound to an action.
pub type Handler = Arc<dyn Fn(&mut Context<'_>) -> ActionResult + Send + Sync>;

/// Routine run around every dispatched action at one level.
pub type Hook = Arc<dyn Fn(&mut Context<'_>) -> io::Result<()> + Send + Sync>;

/// A frozen command definition.
pub struct Parser {
    registry: Arc<ActionRegistry>,
    handlers: HashMap<String, Handler>,
    before_actions: Option<Hook>,
    after_actions: Option<Hook>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("registry", &self.registry)
            .field("before_actions", &self.before_actions.is_some())
            .field("after_actions", &self.after_actions.is_some())
            .finish_non_exhaustive()
    }
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub(crate) fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub(crate) fn before_actions(&self) -> Option<&Hook> {
        self.before_actions.as_ref()
    }

    pub(crate) fn after_actions(&self) -> Option<&Hook> {
        self.after_actions.as_ref()
    }
}

/// Builder for [`Parser`].
///
/// Declaration errors are collected and reported by [`build`](Self::build),
/// so a definition reads as one chain of calls.
#[derive(Default)]
pub struct ParserBuilder {
    registry: ActionRegistry,
    handlers: HashMap<String, Handler>,
    before_actions: Option<Hook>,
    after_actions: Option<Hook>,
    errors: Vec<DefinitionError>,
}

impl ParserBuilder {
    /// Usage banner shown after the program name.
    pub fn usage(mut self, banner: impl Into<String>) -> Self {
        self.registry.set_banner(banner);
        self
    }

    /// Free-text description lines.
    pub fn description<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.set_description(lines);
        self
    }

    /// Declares an action without binding it; see [`handle`](Self::handle).
    pub fn describe(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        if let Err(err) = self.registry.declare(name, description) {
            self.errors.push(err);
        }
        self
    }

    /// Binds a handler to a declared action.
    pub fn handle<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> ActionResult + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Declares an action and binds its handler in one step.
    pub fn action<F>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut Context<'_>) -> ActionResult + Send + Sync + 'static,
    {
        let name = name.into();
        self.describe(name.clone(), description).handle(name, handler)
    }

    /// Attaches detailed help lines to an action.
    pub fn help<I, S>(mut self, name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.attach_help(name, HelpBody::lines(lines));
        self
    }

    /// Declares an action that dispatches into `nested`.
    ///
    /// The nested definition's registry doubles as the action's help.
    pub fn nest(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        nested: Arc<Parser>,
    ) -> Self {
        let name = name.into();
        self.registry
            .attach_help(name.clone(), HelpBody::Nested(Arc::clone(&nested.registry)));
        self.action(name, description, move |ctx| ctx.nest(&nested))
    }

    pub fn before_actions<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        self.before_actions = Some(Arc::new(hook));
        self
    }

    /// Cleanup run once after every dispatched action at this level,
    /// however the action ended.
    pub fn after_actions<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        self.after_actions = Some(Arc::new(hook));
        self
    }

    /// Validates and freezes the definition.
    pub fn build(self) -> Result<Arc<Parser>, DefinitionError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        self.registry.validate()?;

        if let Some(name) = self
            .registry
            .names()
            .find(|name| !self.handlers.contains_key(*name))
        {
            return Err(DefinitionError::MissingHandler(name.to_string()));
        }

        let mut unbound: Vec<&String> = self
            .handlers
            .keys()
            .filter(|name| self.registry.resolve_exact(name).is_none())
            .collect();
        unbound.sort();
        if let Some(name) = unbound.first() {
            return Err(DefinitionError::HandlerForUndeclaredAction((*name).clone()));
        }

        Ok(Arc::new(Parser {
            registry: Arc::new(self.registry),
            handlers: self.handlers,
            before_actions: self.before_actions,
            after_actions: self.after_actions,
        }))
    }
}

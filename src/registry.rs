//! Declared actions for one command definition.
//!
//! A registry is filled by `declare` and `attach_help` calls while a
//! definition is being built and is read-only afterwards. Declaration order
//! is kept for listing and for abbreviation matching.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DefinitionError;
use crate::matcher::{self, Resolution};

/// Detailed help for one action.
#[derive(Debug, Clone)]
pub enum HelpBody {
    /// Literal help lines.
    Lines(Vec<String>),
    /// The action is a nested command tree with its own registry.
    Nested(Arc<ActionRegistry>),
}

/// Borrowed view of one declared action.
#[derive(Debug, Clone, Copy)]
pub struct ActionEntry<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub help: Option<&'a HelpBody>,
}

/// Ordered table of action names, descriptions and help bodies.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    banner: String,
    description: Vec<String>,
    order: Vec<String>,
    descriptions: HashMap<String, String>,
    help: HashMap<String, HelpBody>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the usage banner printed after the program name.
    pub fn set_banner(&mut self, banner: impl Into<String>) {
        self.banner = banner.into();
    }

    /// Sets the free-text description lines.
    pub fn set_description<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = lines.into_iter().map(Into::into).collect();
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Declares a new action. Names must be unique.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), DefinitionError> {
        let name = name.into();
        if self.descriptions.contains_key(&name) {
            return Err(DefinitionError::DuplicateAction(name));
        }
        self.order.push(name.clone());
        self.descriptions.insert(name, description.into());
        Ok(())
    }

    /// Records detailed help for `name`.
    ///
    /// The action may be declared before or after its help; [`validate`]
    /// rejects help that never gets a matching declaration.
    ///
    /// [`validate`]: Self::validate
    pub fn attach_help(&mut self, name: impl Into<String>, body: HelpBody) {
        let name = name.into();
        if self.help.insert(name.clone(), body).is_some() {
            tracing::warn!(action = %name, "replacing previously attached help");
        }
    }

    /// Checks that every help body belongs to a declared action.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        // Report in a stable order.
        let mut orphans: Vec<&String> = self
            .help
            .keys()
            .filter(|name| !self.descriptions.contains_key(*name))
            .collect();
        orphans.sort();
        match orphans.first() {
            Some(name) => Err(DefinitionError::HelpForUndeclaredAction((*name).clone())),
            None => Ok(()),
        }
    }

    /// Direct lookup by full name.
    pub fn resolve_exact(&self, name: &str) -> Option<ActionEntry<'_>> {
        let (name, description) = self.descriptions.get_key_value(name)?;
        Some(ActionEntry {
            name,
            description,
            help: self.help.get(name),
        })
    }

    /// Resolves a possibly abbreviated token against the declared names.
    pub fn resolve(&self, token: &str) -> Resolution<'_> {
        matcher::resolve(self.names(), token)
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Declared actions in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = ActionEntry<'_>> {
        self.order.iter().filter_map(|name| self.resolve_exact(name))
    }

    /// Whether any declared action has detailed help.
    pub fn has_detailed_help(&self) -> bool {
        self.entries().any(|entry| entry.help.is_some())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl HelpBody {
    /// Builds literal help from lines.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }
}

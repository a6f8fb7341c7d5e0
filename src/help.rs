//! Help rendering for a registry: general help, per-action help and the
//! full manual.
//!
//! Everything here returns lines; the dispatcher decides where they go.

use crate::registry::{ActionEntry, ActionRegistry, HelpBody};
use crate::switches::Switches;

/// Appended to actions that have detailed help.
pub const HELP_MARKER: &str = "(+)";

/// Where a registry sits in the command tree, for usage and hint lines.
#[derive(Debug, Clone)]
pub struct HelpContext<'a> {
    program: &'a str,
    switches: Option<&'a Switches>,
    path: Vec<String>,
}

impl<'a> HelpContext<'a> {
    /// Context for the root registry, listing `switches` under "Options:".
    pub fn root(program: &'a str, switches: Option<&'a Switches>) -> Self {
        Self {
            program,
            switches,
            path: Vec::new(),
        }
    }

    /// Context for a registry reached through the actions in `path`.
    pub fn nested(program: &'a str, path: Vec<String>) -> Self {
        Self {
            program,
            switches: None,
            path,
        }
    }

    /// Context for the registry behind `action` at this level.
    pub fn child(&self, action: &str) -> Self {
        let mut path = self.path.clone();
        path.push(action.to_string());
        Self::nested(self.program, path)
    }

    /// Nesting depth; the root is 0.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn is_nested(&self) -> bool {
        !self.path.is_empty()
    }

    /// The command that asks for help at this level, e.g. `prog -h question`.
    fn help_command(&self) -> String {
        let mut command = format!("{} -h", self.program);
        for action in &self.path {
            command.push(' ');
            command.push_str(action);
        }
        command
    }
}

/// General help: usage, description, actions and (at the root) options.
pub fn general(registry: &ActionRegistry, ctx: &HelpContext<'_>) -> Vec<String> {
    let mut lines = vec![format!("Usage: {} {}", ctx.program, registry.banner()), String::new()];

    if !registry.description().is_empty() {
        lines.extend(registry.description().iter().map(|line| format!("  {line}")));
        lines.push(String::new());
    }

    if !ctx.is_nested() {
        lines.push("Actions:".to_string());
        lines.push(String::new());
    }
    lines.extend(action_list(registry));
    lines.push(String::new());

    if let Some(switches) = ctx.switches {
        lines.push("Options:".to_string());
        lines.push(String::new());
        lines.extend(switches.help_lines(registry.has_detailed_help()));
        lines.push(String::new());
    }

    if registry.has_detailed_help() {
        lines.push(format!(
            "Actions marked {HELP_MARKER} have further help: {} <action>",
            ctx.help_command()
        ));
    }

    if ctx.is_nested() {
        lines.push("For full details of options etc:".to_string());
        lines.push(format!("  {} -h", ctx.program));
    }

    lines
}

/// Detailed help for one action with literal help lines.
pub fn action(name: &str, body: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Help for {name}"), String::new()];
    lines.extend(body.iter().cloned());
    lines.push(String::new());
    lines
}

/// Help for a resolved entry: its lines, or the nested registry's general help.
pub fn entry(entry: &ActionEntry<'_>, ctx: &HelpContext<'_>) -> Option<Vec<String>> {
    match entry.help? {
        HelpBody::Lines(body) => Some(action(entry.name, body)),
        HelpBody::Nested(child) => Some(general(child, &ctx.child(entry.name))),
    }
}

/// The manual: general help followed by every action's detailed help.
///
/// Nested registries contribute their general help, one level deep.
pub fn manual(registry: &ActionRegistry, ctx: &HelpContext<'_>) -> Vec<String> {
    let mut lines = general(registry, ctx);
    for entry in registry.entries() {
        if let Some(help) = self::entry(&entry, ctx) {
            lines.push(String::new());
            lines.extend(help);
        }
    }
    lines
}

fn action_list(registry: &ActionRegistry) -> Vec<String> {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    registry
        .entries()
        .map(|entry| {
            let marker = if entry.help.is_some() {
                format!(" {HELP_MARKER}")
            } else {
                String::new()
            };
            format!(
                "  {:<width$} - {}{marker}",
                entry.name, entry.description
            )
        })
        .collect()
}

//! The queue of positional tokens left after option switches are stripped.

use std::collections::VecDeque;

use crate::error::ParseError;

/// Remaining positional tokens for one invocation, consumed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentCursor {
    tokens: VecDeque<String>,
}

impl ArgumentCursor {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Removes and returns the first remaining token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<String> {
        self.tokens.pop_front()
    }

    /// Like [`next`](Self::next), falling back to `default` when empty.
    pub fn next_or(&mut self, default: impl Into<String>) -> String {
        self.next().unwrap_or_else(|| default.into())
    }

    /// Like [`next`](Self::next), failing with `message` when empty.
    pub fn next_or_fail(&mut self, message: impl Into<String>) -> Result<String, ParseError> {
        self.next().ok_or_else(|| ParseError::new(message))
    }

    /// Returns every remaining token and leaves the cursor empty.
    pub fn take_all(&mut self) -> Vec<String> {
        self.tokens.drain(..).collect()
    }

    /// Looks at the first remaining token without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.tokens.front().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The tokens not yet consumed, in order.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_pops_in_order() {
        let mut cursor = ArgumentCursor::new(["a", "b", "c"]);
        assert_eq!(cursor.next().as_deref(), Some("a"));
        assert_eq!(cursor.remaining().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(cursor.next().as_deref(), Some("b"));
        assert_eq!(cursor.next().as_deref(), Some("c"));
        assert!(cursor.is_empty());
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_next_or_uses_default_only_when_empty() {
        let mut cursor = ArgumentCursor::new(["painting"]);
        assert_eq!(cursor.next_or("Cooking"), "painting");
        assert_eq!(cursor.next_or("Cooking"), "Cooking");
    }

    #[test]
    fn test_next_or_fail() {
        let mut cursor = ArgumentCursor::new(["file.txt"]);
        assert_eq!(cursor.next_or_fail("Which file?").unwrap(), "file.txt");

        let err = cursor.next_or_fail("Which file?").unwrap_err();
        assert_eq!(err.message, "Which file?");
    }

    #[test]
    fn test_take_all_clears() {
        let mut cursor = ArgumentCursor::new(["a", "b", "c"]);
        assert_eq!(cursor.take_all(), vec!["a", "b", "c"]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.next(), None);
        assert!(cursor.take_all().is_empty());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let cursor = ArgumentCursor::new(["show"]);
        assert_eq!(cursor.peek(), Some("show"));
        assert_eq!(cursor.len(), 1);
    }
}

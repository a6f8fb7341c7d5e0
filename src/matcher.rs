//! Abbreviation resolution for action names, long options and choice values.
//!
//! A token resolves when it names a declared entry exactly, or when it is a
//! prefix of exactly one declared entry. An exact match wins even if the
//! token is also a prefix of longer names. Matching is case-sensitive.

/// Outcome of matching a token against a set of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The token is a declared name.
    Exact(&'a str),
    /// The token is a prefix of exactly this one name.
    Abbreviated(&'a str),
    /// The token is a prefix of several names.
    Ambiguous(Vec<&'a str>),
    /// Nothing starts with the token.
    Unknown,
}

impl<'a> Resolution<'a> {
    /// The resolved name, if resolution succeeded.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Exact(name) | Self::Abbreviated(name) => Some(*name),
            Self::Ambiguous(_) | Self::Unknown => None,
        }
    }
}

/// Matches `token` against `names`.
pub fn resolve<'a, I>(names: I, token: &str) -> Resolution<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates = Vec::new();
    for name in names {
        if name == token {
            return Resolution::Exact(name);
        }
        if name.starts_with(token) {
            candidates.push(name);
        }
    }

    // An empty token prefixes everything; treat it as unknown.
    if token.is_empty() {
        return Resolution::Unknown;
    }

    match candidates.len() {
        0 => Resolution::Unknown,
        1 => Resolution::Abbreviated(candidates[0]),
        _ => Resolution::Ambiguous(candidates),
    }
}

//! Event kind tags.

use crate::error::InvalidKindError;
use std::{borrow::Cow, fmt, str::FromStr};

/// The tag identifying an event's trigger family (`http`, `cron`, ...).
///
/// Tags are non-empty and made of ASCII lowercase letters, digits, `-`, `_`
/// and `.`. Construction validates this, so every `Kind` in circulation is
/// well-formed; whether it is *registered* is a question for the registry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// The HTTP request trigger family.
    pub const HTTP: Kind = Kind(Cow::Borrowed("http"));

    /// The scheduled (cron) trigger family.
    pub const CRON: Kind = Kind(Cow::Borrowed("cron"));

    /// Create a kind from a tag, validating it.
    pub fn new(tag: impl Into<Cow<'static, str>>) -> Result<Self, InvalidKindError> {
        let tag = tag.into();
        validate(&tag)?;
        Ok(Self(tag))
    }

    /// Create a kind from a static tag.
    ///
    /// # Panics
    ///
    /// Panics if `tag` is not a valid kind tag. Intended for literals and
    /// generated code where the tag has already been checked.
    pub fn from_static(tag: &'static str) -> Self {
        match validate(tag) {
            Ok(()) => Self(Cow::Borrowed(tag)),
            Err(err) => panic!("{err}"),
        }
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a tag against the kind grammar.
fn validate(tag: &str) -> Result<(), InvalidKindError> {
    if tag.is_empty() {
        return Err(InvalidKindError::new(tag, "kind tag must not be empty"));
    }
    let valid = tag
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_' | b'.'));
    if !valid {
        return Err(InvalidKindError::new(
            tag,
            "kind tag may only contain lowercase ASCII letters, digits, '-', '_' and '.'",
        ));
    }
    Ok(())
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

impl FromStr for Kind {
    type Err = InvalidKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::new(s.to_owned())
    }
}

impl AsRef<str> for Kind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

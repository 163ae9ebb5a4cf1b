use std::fmt::{Debug, Display};

/// Prefix that distinguishes variables from constants in lifted atoms (e.g. `?x`).
pub const VARIABLE_SIGIL: char = '?';

/// Symbol of the lifted task: predicate names, object names, parameter names...
///
/// Equality, ordering and hashing are on the canonical text only.
/// The underlying type uses small string optimization to avoid heap allocation for short identifiers.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Sym {
    symbol: compact_str::CompactString,
}

impl Sym {
    pub fn new(s: impl AsRef<str>) -> Self {
        Sym {
            symbol: compact_str::CompactString::new(s.as_ref()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    /// True if the symbol denotes a variable (`?x`) rather than a constant.
    pub fn is_variable(&self) -> bool {
        self.symbol.starts_with(VARIABLE_SIGIL)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.symbol.starts_with(prefix)
    }
}

impl AsRef<str> for Sym {
    fn as_ref(&self) -> &str {
        &self.symbol
    }
}

impl std::borrow::Borrow<str> for Sym {
    fn borrow(&self) -> &str {
        &self.symbol
    }
}

impl From<&str> for Sym {
    fn from(value: &str) -> Self {
        Sym { symbol: value.into() }
    }
}

impl From<String> for Sym {
    fn from(value: String) -> Self {
        Sym { symbol: value.into() }
    }
}

impl From<&Sym> for Sym {
    fn from(value: &Sym) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Sym {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for Sym {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Debug for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

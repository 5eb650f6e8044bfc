//! The closed set of input languages this crate understands.

/// One of the three stylesheet dialects the parser can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Css,
    Scss,
    Less,
}

impl Dialect {
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "css" => Some(Dialect::Css),
            "scss" => Some(Dialect::Scss),
            "less" => Some(Dialect::Less),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_scss(&self) -> bool {
        matches!(self, Dialect::Scss)
    }

    #[must_use]
    pub fn is_less(&self) -> bool {
        matches!(self, Dialect::Less)
    }
}

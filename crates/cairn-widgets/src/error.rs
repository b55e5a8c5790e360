/// Errors produced when parsing widget configuration from attribute strings.
///
/// Controllers themselves never fail; these only come out of the `FromStr`
/// implementations for roles, placements, orientations and key shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The container role has no interaction profile.
    #[error("unknown container role: {0:?}")]
    UnknownRole(String),
    /// Not one of the eight placement values.
    #[error("unknown placement: {0:?}")]
    UnknownPlacement(String),
    /// `aria-orientation` must be `horizontal` or `vertical`.
    #[error("unknown orientation: {0:?}")]
    UnknownOrientation(String),
    /// A key shortcut that names no key, or an unknown key.
    #[error("invalid key shortcut: {0:?}")]
    InvalidShortcut(String),
}

/// Result alias for this crate's parsers.
pub type Result<T> = std::result::Result<T, Error>;

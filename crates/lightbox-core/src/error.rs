#![forbid(unsafe_code)]

//! Error type shared by the lightbox engine and its hosts.
//!
//! Runtime event handling never fails: gestures, key presses and decode
//! completions return outcome values instead. Errors are reserved for
//! construction-time problems (bad configuration, a page without the modal
//! host, a thumbnail without the attributes a descriptor needs).

/// Lightbox error type.
#[derive(Debug)]
pub enum LightboxError {
    /// A DOM element the lightbox cannot work without is absent.
    MissingElement(String),
    /// A thumbnail did not carry a usable attribute.
    InvalidDescriptor {
        attribute: &'static str,
        reason: &'static str,
    },
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// The configuration document could not be parsed.
    Config(serde_json::Error),
}

impl core::fmt::Display for LightboxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement(what) => write!(f, "missing element: {what}"),
            Self::InvalidDescriptor { attribute, reason } => {
                write!(f, "invalid descriptor attribute `{attribute}`: {reason}")
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Config(err) => write!(f, "config parse error: {err}"),
        }
    }
}

impl std::error::Error for LightboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LightboxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

/// Convenience alias.
pub type Result<T> = core::result::Result<T, LightboxError>;

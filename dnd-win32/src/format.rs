//! Clipboard format identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name under which applications register the PNG clipboard format.
pub const PNG_FORMAT_NAME: &str = "PNG";

/// A clipboard format identifier.
///
/// Predefined formats have fixed values. Registered formats are assigned by the OS at runtime and
/// are only meaningful within the current process.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatId(pub u16);

impl FormatId {
    /// `CF_DIB`: a packed `BITMAPINFO` followed by the pixels.
    pub const DIB: Self = Self(8);
    /// `CF_HDROP`: a `DROPFILES` list of paths.
    pub const HDROP: Self = Self(15);
    /// `CF_DIBV5`: a packed `BITMAPV5HEADER` followed by the pixels.
    pub const DIBV5: Self = Self(17);
}

impl fmt::Debug for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DIB => f.write_str("CF_DIB"),
            Self::HDROP => f.write_str("CF_HDROP"),
            Self::DIBV5 => f.write_str("CF_DIBV5"),
            Self(id) => f.debug_tuple("FormatId").field(&id).finish(),
        }
    }
}

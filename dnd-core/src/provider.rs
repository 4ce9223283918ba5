//! Lazy access to the data being dragged.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::surface::Surface;

/// Coarse classification of dragged content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DragDataItemType {
    /// One or more file-system paths.
    Paths,
    /// A bitmap image.
    Image,
}

/// Read-only, on-demand view of the data carried by a drag session.
///
/// Providers are attached to every [`DragEvent`] and are only queried when the window asks for
/// the content, so a window that merely checks [`contains`] never pays for decoding an image.
/// Absent content is never an error: [`paths`] returns an empty list and [`image`] returns
/// `None`.
///
/// [`DragEvent`]: crate::event::DragEvent
/// [`contains`]: Self::contains
/// [`paths`]: Self::paths
/// [`image`]: Self::image
pub trait DragDataProvider {
    /// The dragged file-system paths, in the order the source listed them.
    fn paths(&self) -> Vec<PathBuf>;

    /// The dragged image, if any format carrying one can be decoded.
    fn image(&self) -> Option<Surface>;

    /// Returns whether the dragged data advertises content of the given kind.
    fn contains(&self, item_type: DragDataItemType) -> bool;
}

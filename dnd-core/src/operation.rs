//! Operations a drop may perform.

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// The set of operations offered by a drag source or accepted by a drop target.
    ///
    /// While dragging, the source proposes a set of operations and the window answers with the
    /// subset it is willing to perform. An empty set means the drop is declined.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct DropOperation: u32 {
        /// The dragged data is copied to the target.
        const COPY = 0b001;
        /// The dragged data is moved to the target and removed from the source.
        const MOVE = 0b010;
        /// The target receives a link to the dragged data.
        const LINK = 0b100;
    }
}

impl DropOperation {
    /// No operation; the drop is declined.
    pub const NONE: Self = Self::empty();

    /// Returns whether the drop is declined.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.is_empty()
    }
}

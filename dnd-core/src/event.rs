//! The [`DragEvent`] handed to windows during a drag session.

use std::fmt;

use bitflags::bitflags;
use dpi::PhysicalPosition;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::operation::DropOperation;
use crate::provider::DragDataProvider;

bitflags! {
    /// Represents the keyboard modifiers held while dragging.
    ///
    /// Each flag represents a modifier and is set if this modifier is active. Sources commonly use
    /// them to pick between copy, move and link.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ModifiersState: u32 {
        /// The "shift" key.
        const SHIFT = 0b100;
        /// The "control" key.
        const CONTROL = 0b100 << 3;
        /// The "alt" key.
        const ALT = 0b100 << 6;
    }
}

impl ModifiersState {
    /// Returns whether the shift modifier is active.
    pub fn shift_key(&self) -> bool {
        self.intersects(Self::SHIFT)
    }

    /// Returns whether the control modifier is active.
    pub fn control_key(&self) -> bool {
        self.intersects(Self::CONTROL)
    }

    /// Returns whether the alt modifier is active.
    pub fn alt_key(&self) -> bool {
        self.intersects(Self::ALT)
    }
}

/// Describes one step of a drag session over a window.
///
/// The same type is used for every step (enter, progress, leave and drop). The window inspects
/// the proposed operations and the content, then reports what it is willing to do through
/// [`set_drop_result`]. Leaving the result untouched accepts every proposed operation;
/// declining is expressed with [`DropOperation::NONE`].
///
/// [`set_drop_result`]: Self::set_drop_result
pub struct DragEvent<'a> {
    position: PhysicalPosition<i32>,
    supported_operations: DropOperation,
    modifiers: ModifiersState,
    drop_result: DropOperation,
    data: &'a dyn DragDataProvider,
}

impl<'a> DragEvent<'a> {
    pub fn new(
        position: PhysicalPosition<i32>,
        supported_operations: DropOperation,
        modifiers: ModifiersState,
        data: &'a dyn DragDataProvider,
    ) -> Self {
        Self { position, supported_operations, modifiers, drop_result: supported_operations, data }
    }

    /// Pointer position in window-local coordinates.
    pub fn position(&self) -> PhysicalPosition<i32> {
        self.position
    }

    /// Operations the drag source offers.
    pub fn supported_operations(&self) -> DropOperation {
        self.supported_operations
    }

    /// Keyboard modifiers held at the time of the event.
    pub fn modifiers(&self) -> ModifiersState {
        self.modifiers
    }

    /// Operations the window accepted.
    pub fn drop_result(&self) -> DropOperation {
        self.drop_result
    }

    /// Report the operations the window accepts.
    pub fn set_drop_result(&mut self, operation: DropOperation) {
        self.drop_result = operation;
    }

    /// The content being dragged.
    pub fn data(&self) -> &'a dyn DragDataProvider {
        self.data
    }
}

impl fmt::Debug for DragEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEvent")
            .field("position", &self.position)
            .field("supported_operations", &self.supported_operations)
            .field("modifiers", &self.modifiers)
            .field("drop_result", &self.drop_result)
            .finish_non_exhaustive()
    }
}

//! Conversion between native drop effects and portable operations.

use bitflags::bitflags;
use dnd_core::event::ModifiersState;
use dnd_core::operation::DropOperation;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// The `DROPEFFECT` bitmask negotiated with the drag source.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct DropEffect: u32 {
        const COPY = 1;
        const MOVE = 2;
        const LINK = 4;
        const SCROLL = 0x8000_0000;
    }
}

impl DropEffect {
    /// `DROPEFFECT_NONE`.
    pub const NONE: Self = Self::empty();

    /// Decode the operations carried by this effect. Bits without a portable counterpart, such as
    /// [`DropEffect::SCROLL`], are ignored.
    pub fn to_operation(self) -> DropOperation {
        let mut operation = DropOperation::NONE;
        operation.set(DropOperation::COPY, self.contains(DropEffect::COPY));
        operation.set(DropOperation::MOVE, self.contains(DropEffect::MOVE));
        operation.set(DropOperation::LINK, self.contains(DropEffect::LINK));
        operation
    }

    /// Encode portable operations as a native effect.
    pub fn from_operation(operation: DropOperation) -> Self {
        let mut effect = DropEffect::NONE;
        effect.set(DropEffect::COPY, operation.contains(DropOperation::COPY));
        effect.set(DropEffect::MOVE, operation.contains(DropOperation::MOVE));
        effect.set(DropEffect::LINK, operation.contains(DropOperation::LINK));
        effect
    }
}

impl From<DropOperation> for DropEffect {
    fn from(operation: DropOperation) -> Self {
        Self::from_operation(operation)
    }
}

impl From<DropEffect> for DropOperation {
    fn from(effect: DropEffect) -> Self {
        effect.to_operation()
    }
}

bitflags! {
    /// The `grfKeyState` mouse and keyboard state passed along with drag callbacks.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct KeyState: u32 {
        const LBUTTON = 0x0001;
        const RBUTTON = 0x0002;
        const SHIFT = 0x0004;
        const CONTROL = 0x0008;
        const MBUTTON = 0x0010;
        const ALT = 0x0020;
    }
}

impl KeyState {
    pub fn modifiers(self) -> ModifiersState {
        let mut modifiers = ModifiersState::empty();
        modifiers.set(ModifiersState::SHIFT, self.contains(KeyState::SHIFT));
        modifiers.set(ModifiersState::CONTROL, self.contains(KeyState::CONTROL));
        modifiers.set(ModifiersState::ALT, self.contains(KeyState::ALT));
        modifiers
    }
}

//! Drag-and-drop targets over native drag protocols.
//!
//! `dnd` turns the drag protocol of the OS into a small portable event model. A window implements
//! [`DragTargetWindow`] and receives a [`DragEvent`] for every step of a drag session over it:
//! when the drag enters, while it moves, when it leaves and when it is dropped. Each event carries
//! the pointer position in window coordinates, the operations offered by the drag source, the
//! held modifiers, and a [`DragDataProvider`] through which the dragged paths and images are read
//! on demand. The window answers by narrowing the drop result with
//! [`DragEvent::set_drop_result`].
//!
//! ```no_run
//! use dnd::event::DragEvent;
//! use dnd::operation::DropOperation;
//! use dnd::provider::DragDataItemType;
//!
//! fn on_drag(event: &mut DragEvent<'_>) {
//!     if event.data().contains(DragDataItemType::Paths) {
//!         event.set_drop_result(event.supported_operations() & DropOperation::COPY);
//!     } else {
//!         event.set_drop_result(DropOperation::NONE);
//!     }
//! }
//! ```
//!
//! The backends live in [`platform`]. On Windows, a window is registered as an OLE drop target
//! with [`platform::windows::register_drop_target`].
//!
//! # Cargo Features
//!
//! - `image` (default): decode dragged PNG and bitmap payloads with the `image` crate.
//! - `serde`: implement `Serialize` and `Deserialize` for the plain data types.
//!
//! [`DragTargetWindow`]: window::DragTargetWindow
//! [`DragEvent`]: event::DragEvent
//! [`DragEvent::set_drop_result`]: event::DragEvent::set_drop_result
//! [`DragDataProvider`]: provider::DragDataProvider

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "image")]
pub use dnd_core::codec;
pub use dnd_core::{
    dpi, error, event, image, operation, provider, raw_window_handle, surface, window,
};

pub mod platform;

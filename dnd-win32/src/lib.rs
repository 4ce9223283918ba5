//! # OLE drop target backend
//!
//! Bridges the OLE `IDropTarget` protocol to the portable drag events of `dnd-core`.
//!
//! The protocol itself is implemented by [`DragSession`], which talks to the OS through the
//! traits in [`platform`]. On Windows those are implemented over OLE by [`Win32Platform`], and
//! [`register_drop_target`] exposes a session to the OS as an `IDropTarget`:
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn register(window: impl dnd_core::window::DragTargetWindow + 'static) {
//! use dnd_win32::{initialize_ole, register_drop_target, DragSession, Win32Platform};
//!
//! initialize_ole().unwrap();
//! let registration = register_drop_target(DragSession::new(Win32Platform, window)).unwrap();
//! // Drags over the window reach it until `registration` is dropped.
//! # drop(registration);
//! # }
//! ```
//!
//! Content is never read eagerly. Every event carries a [`DragContentProvider`] that fetches
//! paths and images from the data object only when the window asks for them.

pub mod buffer;
pub mod com;
pub mod content;
pub mod data_source;
#[cfg(test)]
mod drop_files;
pub mod drop_target;
pub mod effect;
pub mod format;
#[cfg(test)]
mod mock;
#[cfg(target_os = "windows")]
mod ole;
pub mod platform;
pub mod session;
mod util;

pub use self::buffer::ScopedNativeBuffer;
pub use self::com::Status;
pub use self::content::DragContentProvider;
pub use self::data_source::FormatDataSource;
pub use self::drop_target::{DropTarget, DropTargetData};
pub use self::effect::{DropEffect, KeyState};
pub use self::format::FormatId;
#[cfg(target_os = "windows")]
pub use self::ole::{
    initialize_ole, register_drop_target, register_window, ComDataObject, DropTargetRegistration,
    HGlobalMedium, Win32Platform,
};
pub use self::session::DragSession;

//! # Windows
//!
//! Drop targets are registered per window with OLE. OLE must be initialized on the thread that
//! owns the window, then the window's session is registered:
//!
//! ```no_run
//! # use dnd::error::RequestError;
//! # use dnd::window::DragTargetWindow;
//! # #[cfg(target_os = "windows")]
//! # fn run(window: impl DragTargetWindow + 'static) -> Result<(), RequestError> {
//! use dnd::platform::windows::{initialize_ole, register_drop_target, DragSession};
//! use dnd::platform::windows::Win32Platform;
//!
//! initialize_ole()?;
//! let _registration = register_drop_target(DragSession::new(Win32Platform, window))?;
//! # Ok(())
//! # }
//! ```
//!
//! Only Win32 windows can be registered; other handles are rejected with
//! [`RequestError::NotSupported`].
//!
//! [`RequestError::NotSupported`]: crate::error::RequestError::NotSupported

pub use dnd_win32::platform::{DataObject, GlobalMemory, Platform, QUERY_FILE_COUNT};
#[cfg(target_os = "windows")]
pub use dnd_win32::{
    initialize_ole, register_drop_target, register_window, ComDataObject, DropTargetRegistration,
    HGlobalMedium, Win32Platform,
};
pub use dnd_win32::{
    DragContentProvider, DragSession, DropEffect, DropTarget, DropTargetData,
    FormatDataSource, FormatId, KeyState, ScopedNativeBuffer, Status,
};

//! Base types for drag-and-drop targets.
//!
//! This crate contains the types, traits and basic functions of [`dnd`] that are platform
//! independent: the operations a drop may perform, the event handed to a window while something
//! is dragged over it, the lazy content façade attached to that event, and the image and surface
//! capabilities used to materialize dragged bitmaps. Backends such as `dnd-win32` translate their
//! native drag protocol into these types.
//!
//! [`dnd`]: https://docs.rs/dnd

#[cfg(feature = "image")]
pub mod codec;
pub mod error;
pub mod event;
pub mod image;
pub mod operation;
pub mod provider;
pub mod surface;
pub mod window;

pub use dpi;
pub use rwh_06 as raw_window_handle;

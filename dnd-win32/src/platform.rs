//! The native primitives the drop target is built on.
//!
//! The session logic only talks to the OS through these traits. On Windows they are implemented
//! over OLE; elsewhere they let the protocol be driven by in-memory
//! implementations.

use std::ffi::c_void;

use dpi::PhysicalPosition;
use rwh_06::RawWindowHandle;

use crate::format::FormatId;

/// Passed as the index to [`GlobalMemory::query_file`] to ask for the number of files.
pub const QUERY_FILE_COUNT: u32 = 0xffff_ffff;

/// A block of OS global memory, as delivered in a transfer medium.
pub trait GlobalMemory {
    /// Lock the block and return its address, or null if it cannot be locked.
    fn lock(&self) -> *mut c_void;

    /// Undo one [`lock`](Self::lock).
    fn unlock(&self);

    /// Size of the block in bytes.
    fn size(&self) -> usize;

    /// Query the block as a `CF_HDROP` file list, the way `DragQueryFileW` does.
    ///
    /// With [`QUERY_FILE_COUNT`] as `index`, returns the number of files. Otherwise, without a
    /// buffer, returns the length of the name at `index` excluding the terminating null; with a
    /// buffer, copies as much of the name as fits along with a terminating null and returns the
    /// number of characters copied. Out of range indices yield zero.
    fn query_file(&self, index: u32, buffer: Option<&mut [u16]>) -> u32;
}

/// The object describing the data being dragged (`IDataObject`).
///
/// Cloning takes a new reference to the same object and dropping releases it.
pub trait DataObject: Clone {
    /// A delivered payload. Dropping it releases the medium back to the OS.
    type Medium: GlobalMemory;

    /// Ask for `format` delivered in global memory. On failure the `HRESULT` is returned; an
    /// unsupported format is an ordinary failure.
    fn get_data(&self, format: FormatId) -> Result<Self::Medium, i32>;

    /// Every format the object advertises, or `None` if they cannot be enumerated.
    fn formats(&self) -> Option<Vec<FormatId>>;
}

/// Process-wide services the drop target needs besides the data object.
pub trait Platform {
    type DataObject: DataObject;

    /// Look up (registering if needed) the identifier of a named clipboard format.
    fn register_format(&self, name: &str) -> Option<FormatId>;

    /// The registered name of `format`, or `None` for predefined or unknown formats.
    fn format_name(&self, format: FormatId) -> Option<String>;

    /// Translate a point from screen coordinates to the client area of `window`.
    fn screen_to_client(
        &self,
        window: RawWindowHandle,
        point: PhysicalPosition<i32>,
    ) -> PhysicalPosition<i32>;
}

use std::ffi::c_void;
use std::fmt;
use std::ptr;

use crate::platform::GlobalMemory;

/// A locked view of a global memory block.
///
/// The block is locked when the buffer is created and unlocked when it is dropped, whichever way
/// the scope is left. A buffer may also be empty, standing in for a format query that produced no
/// data; its pointer is then null and it never touches any memory.
pub struct ScopedNativeBuffer<'a, M: GlobalMemory + ?Sized> {
    memory: Option<&'a M>,
    ptr: *mut c_void,
}

impl<'a, M: GlobalMemory + ?Sized> ScopedNativeBuffer<'a, M> {
    /// Lock `memory` for the lifetime of the buffer.
    pub fn lock(memory: &'a M) -> Self {
        let ptr = memory.lock();
        Self { memory: Some(memory), ptr }
    }

    /// A buffer without memory behind it.
    pub fn null() -> Self {
        Self { memory: None, ptr: ptr::null_mut() }
    }

    /// Whether there is no data, either because there is no block or locking it failed.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// The locked address, typed as the caller expects the payload to be.
    pub fn as_ptr<T>(&self) -> *const T {
        self.ptr.cast()
    }

    /// Size of the block in bytes, or zero when the buffer is null.
    pub fn len(&self) -> usize {
        match self.memory {
            Some(memory) if !self.is_null() => memory.size(),
            _ => 0,
        }
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Query the locked block as a file list, see [`GlobalMemory::query_file`]. A null buffer
    /// lists no files.
    pub fn query_file(&self, index: u32, buffer: Option<&mut [u16]>) -> u32 {
        match self.memory {
            Some(memory) if !self.is_null() => memory.query_file(index, buffer),
            _ => 0,
        }
    }

    /// The locked block as bytes, or `None` when the buffer is null.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if self.is_null() {
            return None;
        }
        // SAFETY: the block stays locked, and therefore mapped, for as long as `self` lives, and
        // the OS reports its size.
        Some(unsafe { std::slice::from_raw_parts(self.ptr.cast::<u8>(), self.len()) })
    }
}

impl<M: GlobalMemory + ?Sized> Drop for ScopedNativeBuffer<'_, M> {
    fn drop(&mut self) {
        if let Some(memory) = self.memory {
            memory.unlock();
        }
    }
}

impl<M: GlobalMemory + ?Sized> fmt::Debug for ScopedNativeBuffer<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedNativeBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len())
            .finish()
    }
}

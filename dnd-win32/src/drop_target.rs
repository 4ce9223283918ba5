use std::cell::{Ref, RefCell};
use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};
use std::sync::atomic::{fence, AtomicUsize, Ordering};

use dpi::PhysicalPosition;
use tracing::warn;

use crate::com::{Guid, Status, IID_IDROP_TARGET, IID_IUNKNOWN};
use crate::effect::{DropEffect, KeyState};
use crate::platform::Platform;
use crate::session::DragSession;

/// The object handed to the OS as an `IDropTarget`.
///
/// The first field is the interface's vtable pointer, so a pointer to this struct is a valid
/// interface pointer. Its lifetime is governed by the reference count alone: the object frees
/// itself when the last reference is released.
#[repr(C)]
pub struct DropTargetData<P: Platform> {
    pub interface: *const c_void,
    refcount: AtomicUsize,
    session: RefCell<DragSession<P>>,
}

impl<P: Platform> DropTargetData<P> {
    /// `IUnknown::AddRef`. Returns the new count.
    ///
    /// # Safety
    ///
    /// `this` must point to a live object.
    pub unsafe fn add_ref(this: *const Self) -> u32 {
        let data = unsafe { &*this };
        let count = data.refcount.fetch_add(1, Ordering::Relaxed) + 1;
        count as u32
    }

    /// `IUnknown::Release`. Returns the new count and frees the object once it reaches zero.
    ///
    /// # Safety
    ///
    /// `this` must point to a live object on which the caller holds a reference. The pointer
    /// must not be used again by the caller afterwards.
    pub unsafe fn release(this: *const Self) -> u32 {
        let count = unsafe { &*this }.refcount.fetch_sub(1, Ordering::Release) - 1;
        if count == 0 {
            fence(Ordering::Acquire);
            // Destroy the underlying data
            drop(unsafe { Box::from_raw(this as *mut Self) });
        }
        count as u32
    }

    /// `IUnknown::QueryInterface`.
    ///
    /// Only `IUnknown` and `IDropTarget` are answered. For any other interface `ppv` is set to
    /// null.
    ///
    /// # Safety
    ///
    /// `this` must point to a live object and `ppv`, if not null, must be writable.
    pub unsafe fn query_interface(
        this: *const Self,
        riid: Option<&Guid>,
        ppv: *mut *mut c_void,
    ) -> Status {
        if ppv.is_null() {
            return Status::InvalidArg;
        }

        match riid {
            Some(&IID_IUNKNOWN) | Some(&IID_IDROP_TARGET) => {
                unsafe {
                    *ppv = this as *mut c_void;
                    Self::add_ref(this);
                }
                Status::Ok
            },
            Some(_) => {
                // Interface not supported
                unsafe { *ppv = ptr::null_mut() };
                Status::NoInterface
            },
            None => {
                unsafe { *ppv = ptr::null_mut() };
                Status::InvalidArg
            },
        }
    }

    pub fn refcount(&self) -> usize {
        self.refcount.load(Ordering::Relaxed)
    }

    pub fn drag_enter(
        &self,
        data: Option<P::DataObject>,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        self.with_session(|session| session.drag_enter(data, keys, point, effect))
    }

    pub fn drag_over(
        &self,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        self.with_session(|session| session.drag_over(keys, point, effect))
    }

    pub fn drag_leave(&self) -> Status {
        self.with_session(DragSession::drag_leave)
    }

    pub fn drag_drop(
        &self,
        data: Option<P::DataObject>,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        self.with_session(|session| session.drag_drop(data, keys, point, effect))
    }

    fn with_session(&self, f: impl FnOnce(&mut DragSession<P>) -> Status) -> Status {
        match self.session.try_borrow_mut() {
            Ok(mut session) => f(&mut session),
            Err(_) => {
                warn!("drop target called back while it is dispatching a drag event");
                Status::Unexpected
            },
        }
    }
}

/// An owned reference to a [`DropTargetData`].
pub struct DropTarget<P: Platform> {
    data: NonNull<DropTargetData<P>>,
}

impl<P: Platform> DropTarget<P> {
    /// Wrap `session` in a new object with a reference count of one, owned by the returned value.
    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    pub(crate) fn with_vtable(session: DragSession<P>, vtable: *const c_void) -> Self {
        let data = Box::new(DropTargetData {
            interface: vtable,
            refcount: AtomicUsize::new(1),
            session: RefCell::new(session),
        });
        // SAFETY: `Box::into_raw` never returns null.
        Self { data: unsafe { NonNull::new_unchecked(Box::into_raw(data)) } }
    }

    /// The interface pointer, borrowed for as long as `self` lives.
    pub fn as_ptr(&self) -> *mut c_void {
        self.data.as_ptr().cast()
    }

    pub fn data(&self) -> &DropTargetData<P> {
        // SAFETY: `self` holds a reference, so the object is alive.
        unsafe { self.data.as_ref() }
    }

    /// Borrow the session, unless a callback is running.
    pub fn session(&self) -> Option<Ref<'_, DragSession<P>>> {
        self.data().session.try_borrow().ok()
    }

    pub fn refcount(&self) -> usize {
        self.data().refcount()
    }
}

impl<P: Platform> Drop for DropTarget<P> {
    fn drop(&mut self) {
        unsafe { DropTargetData::release(self.data.as_ptr()) };
    }
}

impl<P: Platform> fmt::Debug for DropTarget<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("ptr", &self.data)
            .field("refcount", &self.refcount())
            .finish_non_exhaustive()
    }
}

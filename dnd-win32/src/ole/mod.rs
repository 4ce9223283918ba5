//! The drop target exposed to OLE.
//!
//! Everything in here is a thin translation between COM calling conventions and the portable
//! [`DragSession`]: the data object, its media and the process-wide services are wrapped as
//! [`Platform`] implementations, and [`DropTargetData`] is exposed through a static
//! `IDropTarget` vtable.

mod definitions;

use std::ffi::c_void;
use std::{fmt, io, mem, ptr};

use dnd_core::error::{NotSupportedError, RequestError};
use dnd_core::os_error;
use dnd_core::window::DragTargetWindow;
use dpi::PhysicalPosition;
use rwh_06::RawWindowHandle;
use tracing::{debug, trace};
use windows_sys::core::{GUID, HRESULT};
use windows_sys::Win32::Foundation::{DV_E_TYMED, HWND, POINT, POINTL, S_OK};
use windows_sys::Win32::Graphics::Gdi::ScreenToClient;
use windows_sys::Win32::System::Com::{
    CoTaskMemFree, DATADIR_GET, DVASPECT_CONTENT, FORMATETC, STGMEDIUM, TYMED_HGLOBAL,
};
use windows_sys::Win32::System::DataExchange::{GetClipboardFormatNameW, RegisterClipboardFormatW};
use windows_sys::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
use windows_sys::Win32::System::Ole::{
    OleInitialize, RegisterDragDrop, ReleaseStgMedium, RevokeDragDrop,
};
use windows_sys::Win32::UI::Shell::{DragQueryFileW, HDROP};

use self::definitions::{
    vtable, IDataObjectVtbl, IDropTargetVtbl, IEnumFORMATETCVtbl, IUnknownVtbl,
};
use crate::com::{Guid, Status};
use crate::drop_target::{DropTarget, DropTargetData};
use crate::effect::{DropEffect, KeyState};
use crate::format::FormatId;
use crate::platform::{DataObject, GlobalMemory, Platform};
use crate::session::DragSession;
use crate::util;

/// Longest clipboard format name looked up.
const MAX_FORMAT_NAME: usize = 256;

/// A counted reference to a foreign `IDataObject`.
pub struct ComDataObject(ptr::NonNull<c_void>);

impl ComDataObject {
    /// Take a new reference to the object at `ptr`, or `None` if it is null.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live `IDataObject` pointer.
    pub unsafe fn from_borrowed(ptr: *mut c_void) -> Option<Self> {
        let ptr = ptr::NonNull::new(ptr)?;
        unsafe { (vtable::<IUnknownVtbl>(ptr.as_ptr()).AddRef)(ptr.as_ptr()) };
        Some(Self(ptr))
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    fn vtbl(&self) -> &IDataObjectVtbl {
        // SAFETY: we hold a reference to a live `IDataObject`.
        unsafe { vtable(self.as_ptr()) }
    }
}

impl Clone for ComDataObject {
    fn clone(&self) -> Self {
        unsafe { (self.vtbl().parent.AddRef)(self.as_ptr()) };
        Self(self.0)
    }
}

impl Drop for ComDataObject {
    fn drop(&mut self) {
        unsafe { (self.vtbl().parent.Release)(self.as_ptr()) };
    }
}

impl fmt::Debug for ComDataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComDataObject").field(&self.0).finish()
    }
}

impl DataObject for ComDataObject {
    type Medium = HGlobalMedium;

    fn get_data(&self, format: FormatId) -> Result<HGlobalMedium, i32> {
        let request = FORMATETC {
            cfFormat: format.0,
            ptd: ptr::null_mut(),
            dwAspect: DVASPECT_CONTENT,
            lindex: -1,
            tymed: TYMED_HGLOBAL as u32,
        };

        let mut medium: STGMEDIUM = unsafe { mem::zeroed() };
        let result = unsafe { (self.vtbl().GetData)(self.as_ptr(), &request, &mut medium) };
        if result < 0 {
            return Err(result);
        }

        let medium = HGlobalMedium(medium);
        if medium.0.tymed != TYMED_HGLOBAL as u32 {
            debug!(?format, tymed = medium.0.tymed, "medium not delivered in global memory");
            return Err(DV_E_TYMED);
        }
        Ok(medium)
    }

    fn formats(&self) -> Option<Vec<FormatId>> {
        let mut enumerator = ptr::null_mut();
        let result = unsafe {
            (self.vtbl().EnumFormatEtc)(self.as_ptr(), DATADIR_GET as u32, &mut enumerator)
        };
        if result < 0 || enumerator.is_null() {
            debug!("EnumFormatEtc failed: HRESULT {result:#010x}");
            return None;
        }

        let vtbl: &IEnumFORMATETCVtbl = unsafe { vtable(enumerator) };
        let mut formats = Vec::new();
        loop {
            let mut format: FORMATETC = unsafe { mem::zeroed() };
            let mut fetched = 0;
            let result = unsafe { (vtbl.Next)(enumerator, 1, &mut format, &mut fetched) };
            if result != S_OK || fetched == 0 {
                break;
            }

            if !format.ptd.is_null() {
                unsafe { CoTaskMemFree(format.ptd as *const c_void) };
            }
            formats.push(FormatId(format.cfFormat));
        }

        unsafe { (vtbl.parent.Release)(enumerator) };
        trace!(?formats, "enumerated data object formats");
        Some(formats)
    }
}

/// A `STGMEDIUM` holding global memory, released back to its owner on drop.
pub struct HGlobalMedium(STGMEDIUM);

impl GlobalMemory for HGlobalMedium {
    fn lock(&self) -> *mut c_void {
        unsafe { GlobalLock(self.0.u.hGlobal) }
    }

    fn unlock(&self) {
        unsafe { GlobalUnlock(self.0.u.hGlobal) };
    }

    fn size(&self) -> usize {
        unsafe { GlobalSize(self.0.u.hGlobal) }
    }

    fn query_file(&self, index: u32, buffer: Option<&mut [u16]>) -> u32 {
        let hdrop = unsafe { self.0.u.hGlobal } as HDROP;
        let (name, len) = match buffer {
            Some(buffer) => (buffer.as_mut_ptr(), buffer.len() as u32),
            None => (ptr::null_mut(), 0),
        };
        unsafe { DragQueryFileW(hdrop, index, name, len) }
    }
}

impl Drop for HGlobalMedium {
    fn drop(&mut self) {
        unsafe { ReleaseStgMedium(&mut self.0) };
    }
}

/// The Win32 clipboard and windowing services.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Platform;

impl Platform for Win32Platform {
    type DataObject = ComDataObject;

    fn register_format(&self, name: &str) -> Option<FormatId> {
        let name = util::encode_wide(name);
        let id = unsafe { RegisterClipboardFormatW(name.as_ptr()) };
        u16::try_from(id).ok().filter(|id| *id != 0).map(FormatId)
    }

    fn format_name(&self, format: FormatId) -> Option<String> {
        let mut name = [0u16; MAX_FORMAT_NAME];
        let len = unsafe {
            GetClipboardFormatNameW(u32::from(format.0), name.as_mut_ptr(), name.len() as i32)
        };
        if len <= 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&name[..len as usize]))
    }

    fn screen_to_client(
        &self,
        window: RawWindowHandle,
        point: PhysicalPosition<i32>,
    ) -> PhysicalPosition<i32> {
        let RawWindowHandle::Win32(handle) = window else {
            debug!("not a Win32 window, keeping screen coordinates");
            return point;
        };

        let mut pt = POINT { x: point.x, y: point.y };
        if unsafe { ScreenToClient(handle.hwnd.get() as HWND, &mut pt) } == 0 {
            debug!("ScreenToClient failed: {}", io::Error::last_os_error());
            return point;
        }
        PhysicalPosition::new(pt.x, pt.y)
    }
}

type Win32DropTarget = DropTargetData<Win32Platform>;

impl DropTarget<Win32Platform> {
    pub fn new(session: DragSession<Win32Platform>) -> Self {
        Self::with_vtable(session, &DROP_TARGET_VTBL as *const IDropTargetVtbl as *const c_void)
    }
}

impl From<&GUID> for Guid {
    fn from(guid: &GUID) -> Self {
        Guid { data1: guid.data1, data2: guid.data2, data3: guid.data3, data4: guid.data4 }
    }
}

fn position(pt: POINTL) -> PhysicalPosition<i32> {
    PhysicalPosition::new(pt.x, pt.y)
}

/// Run `f` over the effect behind `effect` and write the outcome back.
unsafe fn with_effect(effect: *mut u32, f: impl FnOnce(&mut DropEffect) -> Status) -> HRESULT {
    let Some(effect) = (unsafe { effect.as_mut() }) else {
        return Status::InvalidArg.hresult();
    };

    let mut value = DropEffect::from_bits_retain(*effect);
    let status = f(&mut value);
    *effect = value.bits();
    status.hresult()
}

unsafe extern "system" fn query_interface(
    this: *mut c_void,
    riid: *const GUID,
    ppv: *mut *mut c_void,
) -> HRESULT {
    let riid = unsafe { riid.as_ref() }.map(Guid::from);
    unsafe { Win32DropTarget::query_interface(this.cast(), riid.as_ref(), ppv) }.hresult()
}

unsafe extern "system" fn add_ref(this: *mut c_void) -> u32 {
    unsafe { Win32DropTarget::add_ref(this.cast()) }
}

unsafe extern "system" fn release(this: *mut c_void) -> u32 {
    unsafe { Win32DropTarget::release(this.cast()) }
}

unsafe extern "system" fn drag_enter(
    this: *mut c_void,
    data: *mut c_void,
    key_state: u32,
    pt: POINTL,
    effect: *mut u32,
) -> HRESULT {
    let target = unsafe { &*this.cast::<Win32DropTarget>() };
    let data = unsafe { ComDataObject::from_borrowed(data) };
    let keys = KeyState::from_bits_truncate(key_state);
    unsafe {
        with_effect(effect, |effect| target.drag_enter(data, keys, position(pt), effect))
    }
}

unsafe extern "system" fn drag_over(
    this: *mut c_void,
    key_state: u32,
    pt: POINTL,
    effect: *mut u32,
) -> HRESULT {
    let target = unsafe { &*this.cast::<Win32DropTarget>() };
    let keys = KeyState::from_bits_truncate(key_state);
    unsafe { with_effect(effect, |effect| target.drag_over(keys, position(pt), effect)) }
}

unsafe extern "system" fn drag_leave(this: *mut c_void) -> HRESULT {
    let target = unsafe { &*this.cast::<Win32DropTarget>() };
    target.drag_leave().hresult()
}

unsafe extern "system" fn drag_drop(
    this: *mut c_void,
    data: *mut c_void,
    key_state: u32,
    pt: POINTL,
    effect: *mut u32,
) -> HRESULT {
    let target = unsafe { &*this.cast::<Win32DropTarget>() };
    let data = unsafe { ComDataObject::from_borrowed(data) };
    let keys = KeyState::from_bits_truncate(key_state);
    unsafe { with_effect(effect, |effect| target.drag_drop(data, keys, position(pt), effect)) }
}

static DROP_TARGET_VTBL: IDropTargetVtbl = IDropTargetVtbl {
    parent: IUnknownVtbl { QueryInterface: query_interface, AddRef: add_ref, Release: release },
    DragEnter: drag_enter,
    DragOver: drag_over,
    DragLeave: drag_leave,
    Drop: drag_drop,
};

/// Initialize OLE on the calling thread.
///
/// Must be called on the thread that owns the window before [`register_drop_target`]. Calling it
/// again on an initialized thread succeeds.
pub fn initialize_ole() -> Result<(), RequestError> {
    let result = unsafe { OleInitialize(ptr::null()) };
    if result < 0 {
        return Err(os_error!(io::Error::from_raw_os_error(result)).into());
    }
    Ok(())
}

/// Register `session` as the drop target of its window.
///
/// The window must be a Win32 window. The target stays registered until the returned value is
/// dropped.
pub fn register_drop_target(
    session: DragSession<Win32Platform>,
) -> Result<DropTargetRegistration, RequestError> {
    let hwnd = match session.window().window_handle().map(|handle| handle.as_raw()) {
        Ok(RawWindowHandle::Win32(handle)) => handle.hwnd.get() as HWND,
        Ok(_) => return Err(NotSupportedError::new("drop targets need a Win32 window").into()),
        Err(err) => return Err(os_error!(err).into()),
    };

    let target = DropTarget::new(session);
    let result = unsafe { RegisterDragDrop(hwnd, target.as_ptr()) };
    if result < 0 {
        return Err(os_error!(io::Error::from_raw_os_error(result)).into());
    }

    debug!(?hwnd, "registered drop target");
    Ok(DropTargetRegistration { hwnd, target })
}

/// Convenience for [`register_drop_target`] with a default session over `window`.
pub fn register_window(
    window: impl DragTargetWindow + 'static,
) -> Result<DropTargetRegistration, RequestError> {
    register_drop_target(DragSession::new(Win32Platform, window))
}

/// A registered drop target. Dropping it revokes the registration.
#[derive(Debug)]
pub struct DropTargetRegistration {
    hwnd: HWND,
    target: DropTarget<Win32Platform>,
}

impl DropTargetRegistration {
    pub fn target(&self) -> &DropTarget<Win32Platform> {
        &self.target
    }
}

impl Drop for DropTargetRegistration {
    fn drop(&mut self) {
        let result = unsafe { RevokeDragDrop(self.hwnd) };
        if result < 0 {
            debug!("RevokeDragDrop failed: HRESULT {result:#010x}");
        }
    }
}

#[cfg(test)]
mod tests {
    use windows_sys::Win32::Globalization::{MultiByteToWideChar, CP_ACP};
    use windows_sys::Win32::System::Memory::{GlobalAlloc, GMEM_MOVEABLE};

    use super::*;
    use crate::buffer::ScopedNativeBuffer;
    use crate::com::{IID_IDROP_TARGET, IID_IUNKNOWN};
    use crate::drop_files::bundle_files;
    use crate::mock::MockWindow;
    use crate::platform::QUERY_FILE_COUNT;

    /// Copy `bytes` into a global memory medium owned by the returned value.
    fn global_medium(bytes: &[u8]) -> HGlobalMedium {
        unsafe {
            let handle = GlobalAlloc(GMEM_MOVEABLE, bytes.len());
            assert!(!handle.is_null());
            let block = GlobalLock(handle);
            assert!(!block.is_null());
            ptr::copy_nonoverlapping(bytes.as_ptr(), block.cast::<u8>(), bytes.len());
            GlobalUnlock(handle);

            let mut medium: STGMEDIUM = mem::zeroed();
            medium.tymed = TYMED_HGLOBAL as u32;
            medium.u.hGlobal = handle;
            HGlobalMedium(medium)
        }
    }

    /// `bytes` converted with the ANSI code page of the system.
    fn ansi_to_wide(bytes: &[u8]) -> Vec<u16> {
        unsafe {
            let len = bytes.len() as i32;
            let wide_len = MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, ptr::null_mut(), 0);
            let mut wide = vec![0u16; wide_len as usize];
            MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, wide.as_mut_ptr(), wide_len);
            wide
        }
    }

    fn file_names(medium: &HGlobalMedium) -> Vec<Vec<u16>> {
        let buffer = ScopedNativeBuffer::lock(medium);
        (0..buffer.query_file(QUERY_FILE_COUNT, None))
            .map(|index| {
                let len = buffer.query_file(index, None) as usize;
                let mut name = vec![0u16; len + 1];
                assert_eq!(buffer.query_file(index, Some(&mut name[..])) as usize, len);
                assert_eq!(name.pop(), Some(0));
                name
            })
            .collect()
    }

    #[test]
    fn wide_file_lists_are_queried_by_the_shell() {
        let medium = global_medium(&bundle_files(["C:\\photos\\é.png", "C:\\notes.txt"]));
        let names: Vec<String> =
            file_names(&medium).iter().map(|name| String::from_utf16_lossy(name)).collect();
        assert_eq!(names, ["C:\\photos\\é.png", "C:\\notes.txt"]);
    }

    #[test]
    fn narrow_file_lists_use_the_ansi_code_page() {
        // DROPFILES header with fWide = 0.
        let mut bytes = 20u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0; 16]);
        bytes.extend_from_slice(b"a\x80.txt\0\0");

        let medium = global_medium(&bytes);
        assert_eq!(file_names(&medium), [ansi_to_wide(b"a\x80.txt")]);
    }

    fn guid(guid: Guid) -> GUID {
        GUID { data1: guid.data1, data2: guid.data2, data3: guid.data3, data4: guid.data4 }
    }

    #[test]
    fn vtable_dispatches_to_the_target() {
        let (window, log) = MockWindow::new();
        let target = DropTarget::new(DragSession::new(Win32Platform, window));
        let this = target.as_ptr();

        unsafe {
            let unknown = vtable::<IUnknownVtbl>(this);
            let mut ppv = ptr::null_mut();
            let result = (unknown.QueryInterface)(this, &guid(IID_IDROP_TARGET), &mut ppv);
            assert_eq!(result, S_OK);
            assert_eq!(ppv, this);
            assert_eq!(target.refcount(), 2);
            assert_eq!((unknown.Release)(this), 1);

            let result = (unknown.QueryInterface)(this, &guid(IID_IUNKNOWN), ptr::null_mut());
            assert_eq!(result, Status::InvalidArg.hresult());

            let drop_target = vtable::<IDropTargetVtbl>(this);
            let mut effect = DropEffect::COPY.bits();
            let pt = POINTL { x: 1, y: 2 };
            let result = (drop_target.DragEnter)(this, ptr::null_mut(), 0, pt, &mut effect);
            assert_eq!(result, Status::Unexpected.hresult());
            assert_eq!((drop_target.DragLeave)(this), S_OK);
        }
        assert!(log.events.borrow().is_empty());
    }

    #[test]
    fn registered_png_format_round_trips() {
        let platform = Win32Platform;
        let png = platform.register_format("PNG").unwrap();
        assert!(png.0 >= 0xc000);
        assert_eq!(platform.register_format("PNG"), Some(png));
        assert_eq!(platform.format_name(png).as_deref(), Some("PNG"));
        assert_eq!(platform.format_name(FormatId::HDROP), None);
    }

    #[test]
    fn null_effect_is_an_invalid_argument() {
        let result = unsafe { with_effect(ptr::null_mut(), |_| Status::Ok) };
        assert_eq!(result, Status::InvalidArg.hresult());

        let mut effect = DropEffect::COPY.bits();
        let result = unsafe {
            with_effect(&mut effect, |effect| {
                *effect = DropEffect::NONE;
                Status::Ok
            })
        };
        assert_eq!(result, S_OK);
        assert_eq!(effect, 0);
    }
}

#![allow(non_snake_case)]

use std::ffi::c_void;

use windows_sys::core::{GUID, HRESULT};
use windows_sys::Win32::Foundation::{BOOL, POINTL};
use windows_sys::Win32::System::Com::{FORMATETC, STGMEDIUM};

#[repr(C)]
pub struct IUnknownVtbl {
    pub QueryInterface: unsafe extern "system" fn(
        This: *mut c_void,
        riid: *const GUID,
        ppvObject: *mut *mut c_void,
    ) -> HRESULT,
    pub AddRef: unsafe extern "system" fn(This: *mut c_void) -> u32,
    pub Release: unsafe extern "system" fn(This: *mut c_void) -> u32,
}

#[repr(C)]
pub struct IDataObjectVtbl {
    pub parent: IUnknownVtbl,
    pub GetData: unsafe extern "system" fn(
        This: *mut c_void,
        pformatetcIn: *const FORMATETC,
        pmedium: *mut STGMEDIUM,
    ) -> HRESULT,
    pub GetDataHere: unsafe extern "system" fn(
        This: *mut c_void,
        pformatetc: *const FORMATETC,
        pmedium: *mut STGMEDIUM,
    ) -> HRESULT,
    pub QueryGetData:
        unsafe extern "system" fn(This: *mut c_void, pformatetc: *const FORMATETC) -> HRESULT,
    pub GetCanonicalFormatEtc: unsafe extern "system" fn(
        This: *mut c_void,
        pformatetcIn: *const FORMATETC,
        pformatetcOut: *mut FORMATETC,
    ) -> HRESULT,
    pub SetData: unsafe extern "system" fn(
        This: *mut c_void,
        pformatetc: *const FORMATETC,
        pmedium: *const STGMEDIUM,
        fRelease: BOOL,
    ) -> HRESULT,
    pub EnumFormatEtc: unsafe extern "system" fn(
        This: *mut c_void,
        dwDirection: u32,
        ppenumFormatEtc: *mut *mut c_void,
    ) -> HRESULT,
    pub DAdvise: unsafe extern "system" fn(
        This: *mut c_void,
        pformatetc: *const FORMATETC,
        advf: u32,
        pAdvSink: *mut c_void,
        pdwConnection: *mut u32,
    ) -> HRESULT,
    pub DUnadvise: unsafe extern "system" fn(This: *mut c_void, dwConnection: u32) -> HRESULT,
    pub EnumDAdvise:
        unsafe extern "system" fn(This: *mut c_void, ppenumAdvise: *mut *mut c_void) -> HRESULT,
}

#[repr(C)]
pub struct IEnumFORMATETCVtbl {
    pub parent: IUnknownVtbl,
    pub Next: unsafe extern "system" fn(
        This: *mut c_void,
        celt: u32,
        rgelt: *mut FORMATETC,
        pceltFetched: *mut u32,
    ) -> HRESULT,
    pub Skip: unsafe extern "system" fn(This: *mut c_void, celt: u32) -> HRESULT,
    pub Reset: unsafe extern "system" fn(This: *mut c_void) -> HRESULT,
    pub Clone: unsafe extern "system" fn(This: *mut c_void, ppenum: *mut *mut c_void) -> HRESULT,
}

#[repr(C)]
pub struct IDropTargetVtbl {
    pub parent: IUnknownVtbl,
    pub DragEnter: unsafe extern "system" fn(
        This: *mut c_void,
        pDataObj: *mut c_void,
        grfKeyState: u32,
        pt: POINTL,
        pdwEffect: *mut u32,
    ) -> HRESULT,
    pub DragOver: unsafe extern "system" fn(
        This: *mut c_void,
        grfKeyState: u32,
        pt: POINTL,
        pdwEffect: *mut u32,
    ) -> HRESULT,
    pub DragLeave: unsafe extern "system" fn(This: *mut c_void) -> HRESULT,
    pub Drop: unsafe extern "system" fn(
        This: *mut c_void,
        pDataObj: *mut c_void,
        grfKeyState: u32,
        pt: POINTL,
        pdwEffect: *mut u32,
    ) -> HRESULT,
}

/// Read the vtable of the COM object at `this`.
///
/// # Safety
///
/// `this` must be a live interface pointer whose vtable is laid out as `V`.
pub unsafe fn vtable<'a, V>(this: *mut c_void) -> &'a V {
    unsafe { &**this.cast::<*const V>() }
}

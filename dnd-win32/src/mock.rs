//! In-memory stand-ins for the OS, used by the unit tests.

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::path::PathBuf;
use std::rc::Rc;

use dnd_core::error::DecodeError;
use dnd_core::event::{DragEvent, ModifiersState};
use dnd_core::image::{DecodedImage, ImageDecoder, ImageSpec};
use dnd_core::operation::DropOperation;
use dnd_core::provider::DragDataItemType;
use dnd_core::window::DragTargetWindow;
use dpi::PhysicalPosition;
use rwh_06::{HandleError, HasWindowHandle, RawWindowHandle, WebWindowHandle, WindowHandle};

use crate::drop_files::DropFiles;
use crate::format::{FormatId, PNG_FORMAT_NAME};
use crate::platform::{DataObject, GlobalMemory, Platform};

/// `DV_E_FORMATETC`
pub const DV_E_FORMATETC: i32 = 0x8004_0064_u32 as i32;

pub const PNG: FormatId = FormatId(0xc100);
pub const HTML: FormatId = FormatId(0xc101);
pub const PNG_LOOKALIKE: FormatId = FormatId(0xc102);

/// Window origin on screen.
pub const ORIGIN: PhysicalPosition<i32> = PhysicalPosition::new(100, 50);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct MockState {
    formats: Vec<(FormatId, Vec<u8>)>,
    advertised: Vec<FormatId>,
    enumerable: bool,
    refs: Cell<usize>,
    live_media: Cell<usize>,
    max_live_media: Cell<usize>,
    locks: Cell<isize>,
    requests: RefCell<Vec<FormatId>>,
}

/// A data object with reference, lock and medium accounting.
pub struct MockDataObject {
    state: Rc<MockState>,
}

impl MockDataObject {
    pub fn new() -> Self {
        Self {
            state: Rc::new(MockState {
                formats: Vec::new(),
                advertised: Vec::new(),
                enumerable: true,
                refs: Cell::new(1),
                live_media: Cell::new(0),
                max_live_media: Cell::new(0),
                locks: Cell::new(0),
                requests: RefCell::new(Vec::new()),
            }),
        }
    }

    fn state_mut(&mut self) -> &mut MockState {
        Rc::get_mut(&mut self.state).expect("configure the data object before sharing it")
    }

    /// Advertise `format` and deliver `bytes` for it.
    pub fn with_format(mut self, format: FormatId, bytes: Vec<u8>) -> Self {
        let state = self.state_mut();
        state.formats.push((format, bytes));
        state.advertised.push(format);
        self
    }

    /// Advertise `format` without being able to deliver it.
    pub fn advertising(mut self, format: FormatId) -> Self {
        self.state_mut().advertised.push(format);
        self
    }

    pub fn without_enumeration(mut self) -> Self {
        self.state_mut().enumerable = false;
        self
    }

    pub fn refs(&self) -> usize {
        self.state.refs.get()
    }

    pub fn live_media(&self) -> usize {
        self.state.live_media.get()
    }

    pub fn max_live_media(&self) -> usize {
        self.state.max_live_media.get()
    }

    pub fn locks(&self) -> isize {
        self.state.locks.get()
    }

    pub fn requests(&self) -> Vec<FormatId> {
        self.state.requests.borrow().clone()
    }
}

impl Clone for MockDataObject {
    fn clone(&self) -> Self {
        self.state.refs.set(self.state.refs.get() + 1);
        Self { state: self.state.clone() }
    }
}

impl Drop for MockDataObject {
    fn drop(&mut self) {
        self.state.refs.set(self.state.refs.get() - 1);
    }
}

pub struct MockMedium {
    bytes: Vec<u8>,
    state: Rc<MockState>,
}

impl GlobalMemory for MockMedium {
    fn lock(&self) -> *mut c_void {
        self.state.locks.set(self.state.locks.get() + 1);
        self.bytes.as_ptr() as *mut c_void
    }

    fn unlock(&self) {
        self.state.locks.set(self.state.locks.get() - 1);
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn query_file(&self, index: u32, buffer: Option<&mut [u16]>) -> u32 {
        DropFiles::parse(&self.bytes).map_or(0, |files| files.query_file(index, buffer))
    }
}

impl Drop for MockMedium {
    fn drop(&mut self) {
        self.state.live_media.set(self.state.live_media.get() - 1);
    }
}

impl DataObject for MockDataObject {
    type Medium = MockMedium;

    fn get_data(&self, format: FormatId) -> Result<MockMedium, i32> {
        self.state.requests.borrow_mut().push(format);
        let (_, bytes) =
            self.state.formats.iter().find(|(id, _)| *id == format).ok_or(DV_E_FORMATETC)?;

        let live = self.state.live_media.get() + 1;
        self.state.live_media.set(live);
        self.state.max_live_media.set(self.state.max_live_media.get().max(live));
        Ok(MockMedium { bytes: bytes.clone(), state: self.state.clone() })
    }

    fn formats(&self) -> Option<Vec<FormatId>> {
        self.state.enumerable.then(|| self.state.advertised.clone())
    }
}

/// Registered formats plus a fixed window origin.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockPlatform;

impl Platform for MockPlatform {
    type DataObject = MockDataObject;

    fn register_format(&self, name: &str) -> Option<FormatId> {
        (name == PNG_FORMAT_NAME).then_some(PNG)
    }

    fn format_name(&self, format: FormatId) -> Option<String> {
        match format {
            PNG => Some(PNG_FORMAT_NAME.to_owned()),
            HTML => Some("HTML Format".to_owned()),
            PNG_LOOKALIKE => Some("png".to_owned()),
            _ => None,
        }
    }

    fn screen_to_client(
        &self,
        _: RawWindowHandle,
        point: PhysicalPosition<i32>,
    ) -> PhysicalPosition<i32> {
        PhysicalPosition::new(point.x - ORIGIN.x, point.y - ORIGIN.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Enter,
    Drag,
    Leave,
    Drop,
}

/// What the window saw in one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub kind: Notification,
    pub position: PhysicalPosition<i32>,
    pub supported: DropOperation,
    pub modifiers: ModifiersState,
    pub paths: Vec<PathBuf>,
    pub contains_image: bool,
}

#[derive(Default)]
pub struct WindowLog {
    pub has_target: Cell<bool>,
    pub response: Cell<Option<DropOperation>>,
    pub events: RefCell<Vec<Recorded>>,
}

/// A window recording every event into a shared [`WindowLog`].
pub struct MockWindow {
    pub log: Rc<WindowLog>,
}

impl MockWindow {
    pub fn new() -> (Self, Rc<WindowLog>) {
        let log = Rc::new(WindowLog::default());
        log.has_target.set(true);
        (Self { log: log.clone() }, log)
    }

    fn record(&self, kind: Notification, event: &mut DragEvent<'_>) {
        self.log.events.borrow_mut().push(Recorded {
            kind,
            position: event.position(),
            supported: event.supported_operations(),
            modifiers: event.modifiers(),
            paths: event.data().paths(),
            contains_image: event.data().contains(DragDataItemType::Image),
        });
        if let Some(response) = self.log.response.get() {
            event.set_drop_result(response);
        }
    }
}

impl HasWindowHandle for MockWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        let raw = RawWindowHandle::Web(WebWindowHandle::new(1));
        // SAFETY: a web handle is a plain identifier.
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl DragTargetWindow for MockWindow {
    fn has_drag_target(&self) -> bool {
        self.log.has_target.get()
    }

    fn notify_drag_enter(&self, event: &mut DragEvent<'_>) {
        self.record(Notification::Enter, event);
    }

    fn notify_drag(&self, event: &mut DragEvent<'_>) {
        self.record(Notification::Drag, event);
    }

    fn notify_drag_leave(&self, event: &mut DragEvent<'_>) {
        self.record(Notification::Leave, event);
    }

    fn notify_drop(&self, event: &mut DragEvent<'_>) {
        self.record(Notification::Drop, event);
    }
}

/// Decodes only the payloads it is told to, into a single pixel holding the payload's first four
/// bytes.
#[derive(Default)]
pub struct MockDecoder {
    pub decodable: Vec<Vec<u8>>,
    pub calls: Rc<RefCell<Vec<(&'static str, Vec<u8>)>>>,
}

impl MockDecoder {
    fn decode(&self, kind: &'static str, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        self.calls.borrow_mut().push((kind, data.to_vec()));
        if !self.decodable.iter().any(|payload| payload == data) || data.len() < 4 {
            return Err(DecodeError::Malformed("not decodable"));
        }
        Ok(DecodedImage { spec: ImageSpec::rgba8(1, 1), data: data[..4].to_vec() })
    }
}

impl ImageDecoder for MockDecoder {
    fn decode_png(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        self.decode("png", data)
    }

    fn decode_bitmap(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        self.decode("bitmap", data)
    }
}

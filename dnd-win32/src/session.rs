use std::fmt;
use std::mem;

use dnd_core::event::{DragEvent, ModifiersState};
use dnd_core::image::{self, ImageDecoder};
use dnd_core::operation::DropOperation;
use dnd_core::surface::{RgbaSurfaceFactory, SurfaceFactory};
use dnd_core::window::DragTargetWindow;
use dpi::PhysicalPosition;
use tracing::{debug, trace, warn};

use crate::com::Status;
use crate::content::DragContentProvider;
use crate::effect::{DropEffect, KeyState};
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Enter,
    Over,
    Leave,
    Drop,
}

enum SessionState<D> {
    Idle,
    Active { data: D, position: PhysicalPosition<i32>, operation: DropOperation },
}

/// The state machine behind a drop target.
///
/// A session starts when a drag enters the window, or when something is dropped without a prior
/// enter, and ends on leave or drop. While active it holds a reference to the data object, which
/// is released as soon as the session ends.
///
/// Every callback first checks [`DragTargetWindow::has_drag_target`]; a window without a drag
/// target answers [`Status::NotImplemented`] and the session is left untouched.
pub struct DragSession<P: Platform> {
    platform: P,
    window: Box<dyn DragTargetWindow>,
    decoder: Box<dyn ImageDecoder>,
    surfaces: Box<dyn SurfaceFactory>,
    state: SessionState<P::DataObject>,
}

impl<P: Platform> DragSession<P> {
    pub fn new(platform: P, window: impl DragTargetWindow + 'static) -> Self {
        Self {
            platform,
            window: Box::new(window),
            decoder: image::default_decoder(),
            surfaces: Box::new(RgbaSurfaceFactory),
            state: SessionState::Idle,
        }
    }

    /// Use `decoder` for dragged PNG and bitmap payloads.
    pub fn with_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Use `surfaces` to materialize decoded images.
    pub fn with_surface_factory(mut self, surfaces: impl SurfaceFactory + 'static) -> Self {
        self.surfaces = Box::new(surfaces);
        self
    }

    pub fn window(&self) -> &dyn DragTargetWindow {
        &*self.window
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    /// Last pointer position, in window coordinates, of the active session.
    pub fn position(&self) -> Option<PhysicalPosition<i32>> {
        match self.state {
            SessionState::Active { position, .. } => Some(position),
            SessionState::Idle => None,
        }
    }

    /// Operations the window accepted on the last event of the active session.
    pub fn operation(&self) -> Option<DropOperation> {
        match self.state {
            SessionState::Active { operation, .. } => Some(operation),
            SessionState::Idle => None,
        }
    }

    /// `IDropTarget::DragEnter`.
    pub fn drag_enter(
        &mut self,
        data: Option<P::DataObject>,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        if !self.window.has_drag_target() {
            return Status::NotImplemented;
        }
        let Some(data) = data else {
            warn!("drag entered without a data object");
            return Status::Unexpected;
        };

        let position = self.client_position(point);
        let operation =
            self.dispatch(Phase::Enter, &data, position, effect.to_operation(), keys.modifiers());
        *effect = DropEffect::from_operation(operation);
        self.state = SessionState::Active { data, position, operation };
        Status::Ok
    }

    /// `IDropTarget::DragOver`.
    pub fn drag_over(
        &mut self,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        if !self.window.has_drag_target() {
            return Status::NotImplemented;
        }
        let SessionState::Active { data, .. } = &self.state else {
            debug!("drag moved without an active session");
            return Status::Unexpected;
        };

        let position = self.client_position(point);
        let accepted =
            self.dispatch(Phase::Over, data, position, effect.to_operation(), keys.modifiers());
        *effect = DropEffect::from_operation(accepted);

        if let SessionState::Active { position: last, operation, .. } = &mut self.state {
            *last = position;
            *operation = accepted;
        }
        Status::Ok
    }

    /// `IDropTarget::DragLeave`.
    pub fn drag_leave(&mut self) -> Status {
        if !self.window.has_drag_target() {
            return Status::NotImplemented;
        }

        if let SessionState::Active { data, position, .. } = &self.state {
            let modifiers = ModifiersState::empty();
            self.dispatch(Phase::Leave, data, *position, DropOperation::NONE, modifiers);
        }
        self.end_session();
        Status::Ok
    }

    /// `IDropTarget::Drop`.
    ///
    /// The session ends whatever the window does with the drop.
    pub fn drag_drop(
        &mut self,
        data: Option<P::DataObject>,
        keys: KeyState,
        point: PhysicalPosition<i32>,
        effect: &mut DropEffect,
    ) -> Status {
        if !self.window.has_drag_target() {
            return Status::NotImplemented;
        }
        let Some(data) = data else {
            warn!("dropped without a data object");
            return Status::Unexpected;
        };
        if !self.is_active() {
            debug!("drop without a prior drag enter");
        }

        let position = self.client_position(point);
        let operation =
            self.dispatch(Phase::Drop, &data, position, effect.to_operation(), keys.modifiers());
        *effect = DropEffect::from_operation(operation);

        drop(data);
        self.end_session();
        Status::Ok
    }

    fn end_session(&mut self) {
        if let SessionState::Active { .. } = mem::replace(&mut self.state, SessionState::Idle) {
            trace!("drag session ended");
        }
    }

    fn client_position(&self, point: PhysicalPosition<i32>) -> PhysicalPosition<i32> {
        match self.window.window_handle() {
            Ok(handle) => self.platform.screen_to_client(handle.as_raw(), point),
            Err(err) => {
                debug!("no window handle to translate the drag position: {err}");
                point
            },
        }
    }

    fn dispatch(
        &self,
        phase: Phase,
        data: &P::DataObject,
        position: PhysicalPosition<i32>,
        supported: DropOperation,
        modifiers: ModifiersState,
    ) -> DropOperation {
        let provider =
            DragContentProvider::new(data, &self.platform, &*self.decoder, &*self.surfaces);
        let mut event = DragEvent::new(position, supported, modifiers, &provider);

        match phase {
            Phase::Enter => self.window.notify_drag_enter(&mut event),
            Phase::Over => self.window.notify_drag(&mut event),
            Phase::Leave => self.window.notify_drag_leave(&mut event),
            Phase::Drop => self.window.notify_drop(&mut event),
        }

        let accepted = event.drop_result();
        trace!(?phase, ?position, ?supported, ?accepted, "drag event dispatched");
        accepted
    }
}

impl<P: Platform> fmt::Debug for DragSession<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragSession")
            .field("active", &self.is_active())
            .field("position", &self.position())
            .field("operation", &self.operation())
            .finish_non_exhaustive()
    }
}

//! The window side of a drag session.

use rwh_06::HasWindowHandle;

use crate::event::DragEvent;

/// A window that may receive drag events.
///
/// Backends forward every step of a native drag session to the window the session is over.
/// The window answers by updating [`DragEvent::set_drop_result`]. A window that returns `false`
/// from [`has_drag_target`] never receives events and the backend reports the native session as
/// unhandled.
///
/// The window handle is used to translate screen coordinates into window-local ones.
///
/// [`has_drag_target`]: Self::has_drag_target
pub trait DragTargetWindow: HasWindowHandle {
    /// Whether the window currently accepts drags at all.
    fn has_drag_target(&self) -> bool;

    /// A drag entered the window.
    fn notify_drag_enter(&self, event: &mut DragEvent<'_>);

    /// The drag moved over the window, or the modifiers changed.
    fn notify_drag(&self, event: &mut DragEvent<'_>);

    /// The drag left the window or was cancelled.
    fn notify_drag_leave(&self, event: &mut DragEvent<'_>);

    /// The data was dropped on the window.
    fn notify_drop(&self, event: &mut DragEvent<'_>);
}

//! Native drag protocol backends.
//!
//! The Windows backend is always built so its protocol logic can be driven on any host; the
//! pieces that call into OLE are only available on Windows.

pub mod windows;

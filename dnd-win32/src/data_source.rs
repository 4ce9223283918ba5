use tracing::{debug, trace};

use crate::buffer::ScopedNativeBuffer;
use crate::format::FormatId;
use crate::platform::DataObject;

/// Per-format access to a data object's payloads.
///
/// At most one medium is held at a time: acquiring a format releases the medium of the previous
/// acquisition, and dropping the source releases whatever is still held. The returned buffer
/// borrows the source, so it is always unlocked before its medium can be released.
pub struct FormatDataSource<'a, D: DataObject> {
    data: &'a D,
    medium: Option<D::Medium>,
}

impl<'a, D: DataObject> FormatDataSource<'a, D> {
    /// A source over `data` that holds no medium yet.
    pub fn new(data: &'a D) -> Self {
        Self { data, medium: None }
    }

    /// The data object the payloads are fetched from.
    pub fn data_object(&self) -> &'a D {
        self.data
    }

    /// Fetch `format` and lock it.
    ///
    /// A format the object cannot deliver yields a null buffer.
    pub fn acquire(&mut self, format: FormatId) -> ScopedNativeBuffer<'_, D::Medium> {
        self.release();

        match self.data.get_data(format) {
            Ok(medium) => {
                trace!(?format, "acquired medium");
                ScopedNativeBuffer::lock(self.medium.insert(medium))
            },
            Err(hresult) => {
                debug!(?format, "format not delivered: HRESULT {hresult:#010x}");
                ScopedNativeBuffer::null()
            },
        }
    }

    /// Release the held medium, if any.
    pub fn release(&mut self) {
        if self.medium.take().is_some() {
            trace!("released medium");
        }
    }
}

impl<D: DataObject> Drop for FormatDataSource<'_, D> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDataObject;

    #[test]
    fn one_medium_at_a_time() {
        let data = MockDataObject::new()
            .with_format(FormatId::HDROP, b"files".to_vec())
            .with_format(FormatId::DIB, b"bitmap".to_vec());
        let mut source = FormatDataSource::new(&data);

        {
            let buffer = source.acquire(FormatId::HDROP);
            assert_eq!(buffer.as_bytes(), Some(&b"files"[..]));
            assert_eq!(data.live_media(), 1);
            assert_eq!(data.locks(), 1);
        }
        assert_eq!(data.locks(), 0);
        assert_eq!(data.live_media(), 1);

        {
            let buffer = source.acquire(FormatId::DIB);
            assert_eq!(buffer.as_bytes(), Some(&b"bitmap"[..]));
            assert_eq!(data.live_media(), 1);
        }

        drop(source);
        assert_eq!(data.live_media(), 0);
        assert_eq!(data.max_live_media(), 1);
    }

    #[test]
    fn missing_format_is_null_and_releases_previous() {
        let data = MockDataObject::new().with_format(FormatId::HDROP, b"files".to_vec());
        let mut source = FormatDataSource::new(&data);

        assert!(!source.acquire(FormatId::HDROP).is_null());
        assert_eq!(data.live_media(), 1);

        assert!(source.acquire(FormatId::DIBV5).is_null());
        assert_eq!(data.live_media(), 0);
    }
}

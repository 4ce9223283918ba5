use std::fmt;
use std::path::PathBuf;

use dnd_core::error::DecodeError;
use dnd_core::image::{DecodedImage, ImageDecoder};
use dnd_core::provider::{DragDataItemType, DragDataProvider};
use dnd_core::surface::{Surface, SurfaceFactory, SurfaceFormat};
use tracing::{debug, trace};

use crate::data_source::FormatDataSource;
use crate::format::{FormatId, PNG_FORMAT_NAME};
use crate::platform::{DataObject, Platform, QUERY_FILE_COUNT};
use crate::util;

type DecodeFn = fn(&dyn ImageDecoder, &[u8]) -> Result<DecodedImage, DecodeError>;

#[derive(Debug, Clone, Copy)]
enum FormatRef {
    Predefined(FormatId),
    Registered(&'static str),
}

impl FormatRef {
    fn resolve<P: Platform>(self, platform: &P) -> Option<FormatId> {
        match self {
            FormatRef::Predefined(format) => Some(format),
            FormatRef::Registered(name) => platform.register_format(name),
        }
    }
}

struct ImageFormat {
    format: FormatRef,
    decode: DecodeFn,
}

fn decode_png(decoder: &dyn ImageDecoder, data: &[u8]) -> Result<DecodedImage, DecodeError> {
    decoder.decode_png(data)
}

fn decode_bitmap(decoder: &dyn ImageDecoder, data: &[u8]) -> Result<DecodedImage, DecodeError> {
    decoder.decode_bitmap(data)
}

/// Image formats in order of preference. The first one that decodes wins.
const IMAGE_FORMATS: [ImageFormat; 3] = [
    ImageFormat { format: FormatRef::Registered(PNG_FORMAT_NAME), decode: decode_png },
    ImageFormat { format: FormatRef::Predefined(FormatId::DIBV5), decode: decode_bitmap },
    ImageFormat { format: FormatRef::Predefined(FormatId::DIB), decode: decode_bitmap },
];

/// The content of a drag session, read on demand from its data object.
///
/// Every query runs over its own [`FormatDataSource`], so no medium outlives the call that
/// fetched it.
pub struct DragContentProvider<'a, P: Platform> {
    data: &'a P::DataObject,
    platform: &'a P,
    decoder: &'a dyn ImageDecoder,
    surfaces: &'a dyn SurfaceFactory,
}

impl<'a, P: Platform> DragContentProvider<'a, P> {
    pub fn new(
        data: &'a P::DataObject,
        platform: &'a P,
        decoder: &'a dyn ImageDecoder,
        surfaces: &'a dyn SurfaceFactory,
    ) -> Self {
        Self { data, platform, decoder, surfaces }
    }

    fn classify(&self, format: FormatId) -> Option<DragDataItemType> {
        match format {
            FormatId::HDROP => Some(DragDataItemType::Paths),
            FormatId::DIB | FormatId::DIBV5 => Some(DragDataItemType::Image),
            _ => {
                let name = self.platform.format_name(format)?;
                (name == PNG_FORMAT_NAME).then_some(DragDataItemType::Image)
            },
        }
    }

    fn make_surface(&self, image: &DecodedImage) -> Option<Surface> {
        let format = SurfaceFormat::from(&image.spec);
        self.surfaces.make_surface(image.spec.width, image.spec.height, &format, &image.data)
    }
}

impl<P: Platform> DragDataProvider for DragContentProvider<'_, P> {
    fn paths(&self) -> Vec<PathBuf> {
        let mut source = FormatDataSource::new(self.data);
        let buffer = source.acquire(FormatId::HDROP);
        if buffer.is_null() {
            return Vec::new();
        }

        let count = buffer.query_file(QUERY_FILE_COUNT, None);
        let mut paths = Vec::with_capacity(count as usize);
        for index in 0..count {
            // The length excludes the terminating null character.
            let length = buffer.query_file(index, None) as usize;
            if length == 0 {
                continue;
            }

            let mut name = vec![0u16; length + 1];
            buffer.query_file(index, Some(&mut name[..]));
            paths.push(util::decode_wide(&name).into());
        }
        trace!(count, "read dragged paths");
        paths
    }

    fn image(&self) -> Option<Surface> {
        let mut source = FormatDataSource::new(self.data);
        for candidate in &IMAGE_FORMATS {
            let Some(format) = candidate.format.resolve(self.platform) else {
                trace!(format = ?candidate.format, "format unavailable");
                continue;
            };

            let buffer = source.acquire(format);
            let Some(bytes) = buffer.as_bytes() else {
                continue;
            };
            match (candidate.decode)(self.decoder, bytes) {
                Ok(image) => return self.make_surface(&image),
                Err(err) => debug!(?format, "failed to decode dragged image: {err}"),
            }
        }

        trace!("no decodable image format");
        None
    }

    fn contains(&self, item_type: DragDataItemType) -> bool {
        let Some(formats) = self.data.formats() else {
            debug!("data object formats cannot be enumerated");
            return false;
        };
        formats.into_iter().any(|format| self.classify(format) == Some(item_type))
    }
}

impl<P: Platform> fmt::Debug for DragContentProvider<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragContentProvider").finish_non_exhaustive()
    }
}

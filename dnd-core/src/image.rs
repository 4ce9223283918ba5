//! Image decoding capability used to materialize dragged bitmaps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Layout of the pixels of a [`DecodedImage`].
///
/// Pixels are packed little-endian words of `bits_per_pixel` bits; each channel is extracted
/// with `(pixel & mask) >> shift`. An `alpha_mask` of zero means the image is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageSpec {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub bytes_per_row: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
    pub red_shift: u32,
    pub green_shift: u32,
    pub blue_shift: u32,
    pub alpha_shift: u32,
}

impl ImageSpec {
    /// Spec of a tightly packed 32-bit RGBA image, red in the lowest byte.
    pub const fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 32,
            bytes_per_row: width * 4,
            red_mask: 0x0000_00ff,
            green_mask: 0x0000_ff00,
            blue_mask: 0x00ff_0000,
            alpha_mask: 0xff00_0000,
            red_shift: 0,
            green_shift: 8,
            blue_shift: 16,
            alpha_shift: 24,
        }
    }
}

/// Raw pixels plus the [`ImageSpec`] describing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub spec: ImageSpec,
    pub data: Vec<u8>,
}

/// Decodes the image payloads a drag source may carry.
pub trait ImageDecoder {
    /// Decode a PNG file held in memory.
    fn decode_png(&self, data: &[u8]) -> Result<DecodedImage, DecodeError>;

    /// Decode a packed device-independent bitmap: a `BITMAPINFOHEADER` (or any later header
    /// revision, up to `BITMAPV5HEADER`) followed by the optional colour table and the pixels.
    fn decode_bitmap(&self, data: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// A decoder that supports no format at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDecoder;

impl ImageDecoder for UnsupportedDecoder {
    fn decode_png(&self, _: &[u8]) -> Result<DecodedImage, DecodeError> {
        Err(DecodeError::Unsupported)
    }

    fn decode_bitmap(&self, _: &[u8]) -> Result<DecodedImage, DecodeError> {
        Err(DecodeError::Unsupported)
    }
}

/// The decoder used when none is configured.
///
/// This is [`DefaultImageDecoder`] with the `image` feature and [`UnsupportedDecoder`] otherwise.
///
/// [`DefaultImageDecoder`]: crate::codec::DefaultImageDecoder
pub fn default_decoder() -> Box<dyn ImageDecoder> {
    #[cfg(feature = "image")]
    {
        Box::new(crate::codec::DefaultImageDecoder)
    }
    #[cfg(not(feature = "image"))]
    {
        Box::new(UnsupportedDecoder)
    }
}

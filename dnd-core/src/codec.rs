//! [`ImageDecoder`] backed by the `image` crate.

use std::io::Cursor;

use ::image::{DynamicImage, ImageFormat, ImageReader};
use tracing::trace;

use crate::error::DecodeError;
use crate::image::{DecodedImage, ImageDecoder, ImageSpec};

const FILE_HEADER_SIZE: usize = 14;
const CORE_HEADER_SIZE: u32 = 12;
const INFO_HEADER_SIZE: u32 = 40;

const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

/// Decodes PNG files and packed DIBs into RGBA8 images.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageDecoder;

impl ImageDecoder for DefaultImageDecoder {
    fn decode_png(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        let image = ImageReader::with_format(Cursor::new(data), ImageFormat::Png).decode()?;
        Ok(to_rgba8(image))
    }

    fn decode_bitmap(&self, data: &[u8]) -> Result<DecodedImage, DecodeError> {
        let file = bitmap_file_from_dib(data)?;
        let image = ImageReader::with_format(Cursor::new(file), ImageFormat::Bmp).decode()?;
        Ok(to_rgba8(image))
    }
}

fn to_rgba8(image: DynamicImage) -> DecodedImage {
    let image = image.into_rgba8();
    let (width, height) = image.dimensions();
    DecodedImage { spec: ImageSpec::rgba8(width, height), data: image.into_raw() }
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4).map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Prefix a packed DIB with the `BITMAPFILEHEADER` that clipboard bitmaps lack.
///
/// The header's pixel offset depends on the info header revision, on the masks that trail a
/// plain `BITMAPINFOHEADER` when bit fields are used, and on the colour table size.
fn bitmap_file_from_dib(dib: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let header_size = read_u32(dib, 0).ok_or(DecodeError::Malformed("truncated header"))?;
    if header_size as usize > dib.len() {
        return Err(DecodeError::Malformed("header larger than payload"));
    }

    let (bit_count, palette_entry_size, masks_size, colors_used) = match header_size {
        CORE_HEADER_SIZE => {
            let bit_count = read_u16(dib, 10).ok_or(DecodeError::Malformed("core header"))?;
            (bit_count, 3, 0, 0)
        },
        size if size >= INFO_HEADER_SIZE => {
            let bit_count = read_u16(dib, 14).ok_or(DecodeError::Malformed("info header"))?;
            let compression = read_u32(dib, 16).ok_or(DecodeError::Malformed("info header"))?;
            let colors_used = read_u32(dib, 32).ok_or(DecodeError::Malformed("info header"))?;
            let masks_size = match (size, compression) {
                (INFO_HEADER_SIZE, BI_BITFIELDS) => 12,
                (INFO_HEADER_SIZE, BI_ALPHABITFIELDS) => 16,
                _ => 0,
            };
            (bit_count, 4, masks_size, colors_used)
        },
        _ => return Err(DecodeError::Malformed("unknown header revision")),
    };

    let palette_len = match colors_used {
        0 if bit_count <= 8 => 1usize << bit_count,
        0 => 0,
        n => n as usize,
    };
    let pixel_offset = FILE_HEADER_SIZE
        + header_size as usize
        + masks_size
        + palette_len * palette_entry_size;
    let file_size = FILE_HEADER_SIZE + dib.len();
    trace!(header_size, bit_count, pixel_offset, "wrapping packed DIB");

    let mut file = Vec::with_capacity(file_size);
    file.extend_from_slice(b"BM");
    file.extend_from_slice(&(file_size as u32).to_le_bytes());
    file.extend_from_slice(&[0; 4]);
    file.extend_from_slice(&(pixel_offset as u32).to_le_bytes());
    file.extend_from_slice(dib);
    Ok(file)
}

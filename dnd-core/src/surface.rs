//! Surfaces holding dragged images.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use dpi::PhysicalSize;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::image::ImageSpec;

/// How the alpha channel relates to the colour channels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelAlpha {
    Opaque,
    Premultiplied,
    /// Colour channels are not scaled by alpha.
    #[default]
    Straight,
}

/// Pixel layout handed to a [`SurfaceFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceFormat {
    pub bits_per_pixel: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
    pub red_shift: u32,
    pub green_shift: u32,
    pub blue_shift: u32,
    pub alpha_shift: u32,
    pub pixel_alpha: PixelAlpha,
}

impl From<&ImageSpec> for SurfaceFormat {
    /// Decoded images always carry straight alpha.
    fn from(spec: &ImageSpec) -> Self {
        Self {
            bits_per_pixel: spec.bits_per_pixel,
            red_mask: spec.red_mask,
            green_mask: spec.green_mask,
            blue_mask: spec.blue_mask,
            alpha_mask: spec.alpha_mask,
            red_shift: spec.red_shift,
            green_shift: spec.green_shift,
            blue_shift: spec.blue_shift,
            alpha_shift: spec.alpha_shift,
            pixel_alpha: PixelAlpha::Straight,
        }
    }
}

/// A backend surface created by a [`SurfaceFactory`].
pub trait SurfaceProvider: fmt::Debug + Send + Sync + 'static {
    fn size(&self) -> PhysicalSize<u32>;

    #[doc(hidden)]
    fn __as_any(&self) -> &dyn Any;
}

/// A shared handle to a surface.
#[derive(Debug, Clone)]
pub struct Surface(pub Arc<dyn SurfaceProvider>);

impl Surface {
    pub fn new(provider: impl SurfaceProvider) -> Self {
        Self(Arc::new(provider))
    }

    /// Downcast to the concrete surface type.
    ///
    /// Returns `None` if the surface was created by another factory.
    pub fn cast_ref<T: SurfaceProvider>(&self) -> Option<&T> {
        self.0.__as_any().downcast_ref::<T>()
    }
}

impl Deref for Surface {
    type Target = dyn SurfaceProvider;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Turns raw pixels into surfaces the embedding graphics stack can draw.
pub trait SurfaceFactory {
    /// Create a surface of `width` x `height` pixels laid out as `format`.
    ///
    /// Returns `None` when the layout is not supported.
    fn make_surface(
        &self,
        width: u32,
        height: u32,
        format: &SurfaceFormat,
        pixels: &[u8],
    ) -> Option<Surface>;
}

/// A straight-alpha RGBA8 surface held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RgbaSurface {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels, four bytes each.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The RGBA value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl fmt::Debug for RgbaSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RgbaSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SurfaceProvider for RgbaSurface {
    fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    fn __as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`RgbaSurface`]s out of 24 or 32 bits-per-pixel masked layouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RgbaSurfaceFactory;

impl SurfaceFactory for RgbaSurfaceFactory {
    fn make_surface(
        &self,
        width: u32,
        height: u32,
        format: &SurfaceFormat,
        pixels: &[u8],
    ) -> Option<Surface> {
        let bytes_per_pixel = match format.bits_per_pixel {
            24 => 3,
            32 => 4,
            _ => return None,
        };
        if width == 0 || height == 0 {
            return None;
        }

        let stride = pixels.len() / height as usize;
        if stride < width as usize * bytes_per_pixel {
            return None;
        }

        let channel = |word: u32, mask: u32, shift: u32| ((word & mask) >> shift) as u8;
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for row in pixels.chunks_exact(stride).take(height as usize) {
            for px in row[..width as usize * bytes_per_pixel].chunks_exact(bytes_per_pixel) {
                let mut word = [0u8; 4];
                word[..bytes_per_pixel].copy_from_slice(px);
                let word = u32::from_le_bytes(word);

                let alpha = if format.alpha_mask == 0 || format.pixel_alpha == PixelAlpha::Opaque {
                    u8::MAX
                } else {
                    channel(word, format.alpha_mask, format.alpha_shift)
                };
                let mut color = [
                    channel(word, format.red_mask, format.red_shift),
                    channel(word, format.green_mask, format.green_shift),
                    channel(word, format.blue_mask, format.blue_shift),
                ];
                if format.pixel_alpha == PixelAlpha::Premultiplied && alpha != 0 {
                    for c in &mut color {
                        *c = ((*c as u32 * 255 + alpha as u32 / 2) / alpha as u32).min(255) as u8;
                    }
                }
                rgba.extend_from_slice(&[color[0], color[1], color[2], alpha]);
            }
        }

        Some(Surface::new(RgbaSurface { width, height, rgba }))
    }
}

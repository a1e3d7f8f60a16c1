//! Procedural particle textures and the one-time async provisioning step.
//!
//! Each sprite is a solid rectangle drawn into an RGBA raster, encoded as PNG
//! and handed to an [`ImageDecoder`]. Rain and snow become available as their
//! textures finish decoding.

use std::future::Future;
use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use tracing::{info, warn};

use crate::config::OverlayConfig;
use crate::error::TextureError;
use crate::profile::TextureSpec;
use crate::state::Precipitation;

/// A decoded RGBA8 image, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

/// An offscreen RGBA8 raster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterTexture {
    /// Fills the whole surface with the fill color.
    pub fn generate(spec: &TextureSpec) -> Self {
        let len = spec.width as usize * spec.height as usize;
        let pixels = spec.fill.0.repeat(len);
        Self {
            width: spec.width,
            height: spec.height,
            pixels,
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, TextureError> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| TextureError::Encode("pixel buffer does not match size".into()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .map_err(|e| TextureError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    /// PNG `data:` URL, the form browser image elements load from.
    pub fn to_data_url(&self) -> Result<String, TextureError> {
        let png = self.encode_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }
}

/// Turns encoded raster bytes into an image the particle engine can sample.
pub trait ImageDecoder {
    fn load_image_from_raster_data(
        &self,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<ImageHandle, TextureError>>;
}

/// Decodes PNG bytes in-process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngImageDecoder;

impl ImageDecoder for PngImageDecoder {
    async fn load_image_from_raster_data(&self, bytes: Vec<u8>) -> Result<ImageHandle, TextureError> {
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .map_err(|e| TextureError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(ImageHandle {
            width,
            height,
            pixels: Arc::from(img.into_raw()),
        })
    }
}

/// Readiness of one texture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextureSlot {
    #[default]
    Pending,
    Ready(ImageHandle),
}

impl TextureSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, TextureSlot::Ready(_))
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        match self {
            TextureSlot::Ready(image) => Some(image),
            TextureSlot::Pending => None,
        }
    }
}

/// One slot per precipitation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticleTextures {
    rain: TextureSlot,
    snow: TextureSlot,
}

impl ParticleTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: Precipitation) -> &TextureSlot {
        match kind {
            Precipitation::Rain => &self.rain,
            Precipitation::Snow => &self.snow,
        }
    }

    pub fn install(&mut self, kind: Precipitation, image: ImageHandle) {
        let slot = match kind {
            Precipitation::Rain => &mut self.rain,
            Precipitation::Snow => &mut self.snow,
        };
        *slot = TextureSlot::Ready(image);
    }

    pub fn is_ready(&self, kind: Precipitation) -> bool {
        self.slot(kind).is_ready()
    }

    pub fn image(&self, kind: Precipitation) -> Option<&ImageHandle> {
        self.slot(kind).image()
    }

    /// Installs every ready texture of `other`; pending slots are left alone.
    pub fn merge(&mut self, other: ParticleTextures) {
        for kind in Precipitation::ALL {
            if let Some(image) = other.image(kind) {
                self.install(kind, image.clone());
            }
        }
    }
}

pub async fn load_texture<D: ImageDecoder>(
    spec: &TextureSpec,
    decoder: &D,
) -> Result<ImageHandle, TextureError> {
    let png = RasterTexture::generate(spec).encode_png()?;
    decoder.load_image_from_raster_data(png).await
}

/// Generates and decodes the sprite of every configured kind.
///
/// A texture that fails stays pending and is logged; the others are still
/// returned ready.
pub async fn provision_textures<D: ImageDecoder>(
    config: &OverlayConfig,
    decoder: &D,
) -> ParticleTextures {
    let mut textures = ParticleTextures::new();
    for kind in Precipitation::ALL {
        let spec = &config.profile(kind).texture;
        match load_texture(spec, decoder).await {
            Ok(image) => {
                info!(%kind, width = image.width, height = image.height, "particle texture ready");
                textures.install(kind, image);
            }
            Err(err) => warn!(%kind, "particle texture unavailable: {err}"),
        }
    }
    textures
}

//! Texture loading and GPU upload.
//!
//! [`ImageData`] is a CPU-side RGBA8 image, either decoded from disk with the
//! `image` crate or produced procedurally. [`GpuTexture`] uploads it once and
//! exposes a view for binding.

use std::path::Path;

/// Errors that can occur while loading or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The image file could not be opened or decoded.
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    /// Pixel data length doesn't match the dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// Tightly packed RGBA8 pixels, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGBA8 pixels after validating the length.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        validate(width, height, pixels.len())?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file (PNG or JPEG) into RGBA8.
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// A 1x1 image of a single color.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    /// RGBA of the texel at `(x, y)`, clamped to the image bounds.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Nearest-texel lookup at a UV in [0,1]², with `u` wrapping.
    pub fn sample_uv(&self, u: f32, v: f32) -> [u8; 4] {
        let u = u.rem_euclid(1.0);
        let v = v.clamp(0.0, 1.0);
        let x = (u * self.width as f32) as u32;
        let y = (v * self.height as f32) as u32;
        self.texel(x, y)
    }
}

fn validate(width: u32, height: u32, len: usize) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: len,
            expected,
            width,
            height,
        });
    }
    Ok(())
}

/// A sampled 2D texture resident on the GPU.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
}

impl GpuTexture {
    /// Upload `image`. Color maps use `Rgba8UnormSrgb`, data maps
    /// (elevation, specular) use `Rgba8Unorm` so values are not gamma decoded.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &ImageData,
        srgb: bool,
    ) -> Self {
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("Uploaded texture '{label}' ({}x{})", image.width, image.height);

        Self {
            texture,
            view,
            dimensions: (image.width, image.height),
        }
    }

    /// Linear sampler that wraps horizontally (longitude) and clamps vertically.
    pub fn equirect_sampler(device: &wgpu::Device) -> wgpu::Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("equirect-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_validates_length() {
        let err = ImageData::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::DataSizeMismatch {
                actual: 15,
                expected: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = ImageData::from_rgba8(0, 4, vec![]).unwrap_err();
        assert!(matches!(err, TextureError::ZeroDimensions { .. }));
    }

    #[test]
    fn test_sample_uv_wraps_u() {
        let mut pixels = vec![0u8; 2 * 1 * 4];
        pixels[4..8].copy_from_slice(&[255, 0, 0, 255]);
        let img = ImageData::from_rgba8(2, 1, pixels).unwrap();
        assert_eq!(img.sample_uv(0.75, 0.5), [255, 0, 0, 255]);
        assert_eq!(img.sample_uv(1.75, 0.5), [255, 0, 0, 255]);
        assert_eq!(img.sample_uv(0.25, 0.5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_texel_clamps_to_bounds() {
        let img = ImageData::solid([1, 2, 3, 4]);
        assert_eq!(img.texel(10, 10), [1, 2, 3, 4]);
        assert_eq!(img.sample_uv(0.0, 1.0), [1, 2, 3, 4]);
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut img = image::RgbaImage::new(4, 2);
        img.put_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let loaded = ImageData::load(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 2));
        assert_eq!(loaded.texel(3, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = ImageData::load(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TextureError::ImageLoad(_)));
    }
}

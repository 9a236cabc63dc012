//! 纹理缓存
//!
//! 按纹理名缓存已上传的 GPU 纹理，同一个名字不管被多少材质引用都只加载一次。
//! 条目在整个会话中只增不减。
//!
//! 纹理文件先按原名查找，找不到再拼上模型所在目录查找。解码交给 `image` crate，
//! 只接受 3 通道 (RGB) 和 4 通道 (RGBA) 图像。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use tracing::info;

use crate::core::error::{Result, TextureError};
use crate::geometry::material::Materials;
use crate::gfx::backend::GpuDevice;

/// 解码后的图像数据
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 3 (RGB) 或 4 (RGBA)
    pub channels: u8,
    /// 按行交错的像素数据，每通道 8 位
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// 转成 RGBA8 数据（RGB 图像补 alpha = 255）
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            _ => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        }
    }

    /// 1x1 白色图像，没有贴图的材质用它采样
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            channels: 4,
            pixels: vec![255; 4],
        }
    }
}

/// 查找纹理文件：先按原名，再拼上基准目录
pub fn resolve_texture_path(name: &str, base_dir: &Path) -> std::result::Result<PathBuf, TextureError> {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return Ok(direct);
    }

    let joined = base_dir.join(name);
    if joined.exists() {
        return Ok(joined);
    }

    Err(TextureError::Missing {
        name: name.to_string(),
        base_dir: base_dir.to_path_buf(),
    })
}

/// 解码图像文件
pub fn decode_image(path: &Path) -> std::result::Result<DecodedImage, TextureError> {
    let img = image::open(path).map_err(|e| TextureError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (width, height) = img.dimensions();
    let channels = img.color().channel_count();
    let pixels = match channels {
        3 => img.to_rgb8().into_raw(),
        4 => img.to_rgba8().into_raw(),
        _ => {
            return Err(TextureError::UnsupportedChannelCount {
                path: path.to_path_buf(),
                channels,
            })
        }
    };

    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels,
    })
}

/// 纹理名 → GPU 纹理
#[derive(Debug)]
pub struct TextureCache<T> {
    textures: HashMap<String, T>,
}

impl<T> TextureCache<T> {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
        }
    }

    /// 为所有材质加载还没有缓存的漫反射贴图
    ///
    /// 第一个失败的纹理会中止加载并返回错误，已经加载的条目保留。
    pub fn ensure_loaded<D>(&mut self, device: &D, materials: &Materials, base_dir: &Path) -> Result<()>
    where
        D: GpuDevice<Texture = T>,
    {
        for material in materials {
            let Some(name) = material.texture_name() else {
                continue;
            };
            if self.textures.contains_key(name) {
                continue;
            }

            let path = resolve_texture_path(name, base_dir)?;
            let image = decode_image(&path)?;
            info!(
                "Loaded texture: {}, w = {}, h = {}, comp = {}",
                path.display(),
                image.width,
                image.height,
                image.channels
            );

            let texture = device.create_texture_2d(name, &image);
            self.textures.insert(name.to_string(), texture);
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.textures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl<T> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ViewerError;
    use crate::geometry::material::Material;
    use crate::gfx::backend::testing::CountingDevice;
    use std::fs;

    fn temp_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("objview-tex-{}-{}", test, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn textured(name: &str, texture: &str) -> Material {
        Material::new(name, [1.0; 3]).with_texture(texture)
    }

    #[test]
    fn test_each_texture_loaded_once() {
        let dir = temp_dir("once");
        image::RgbImage::new(2, 2).save(dir.join("a.png")).unwrap();
        image::RgbaImage::new(4, 1).save(dir.join("b.png")).unwrap();

        let materials = Materials::new(vec![
            textured("m0", "a.png"),
            textured("m1", "a.png"),
            textured("m2", "b.png"),
        ]);
        let device = CountingDevice::default();
        let mut cache = TextureCache::new();

        cache.ensure_loaded(&device, &materials, &dir).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(device.textures.borrow().len(), 2);
        assert_eq!(cache.get("a.png").map(|t| t.channels), Some(3));
        assert_eq!(cache.get("b.png").map(|t| (t.width, t.height)), Some((4, 1)));

        // 再次调用不会重新上传
        cache.ensure_loaded(&device, &materials, &dir).unwrap();
        assert_eq!(device.textures.borrow().len(), 2);
    }

    #[test]
    fn test_materials_without_texture_are_skipped() {
        let device = CountingDevice::default();
        let mut cache = TextureCache::new();
        let materials = Materials::new(vec![Material::new("plain", [0.5; 3]), textured("empty", "")]);

        cache.ensure_loaded(&device, &materials, Path::new(".")).unwrap();

        assert!(cache.is_empty());
        assert!(device.textures.borrow().is_empty());
    }

    #[test]
    fn test_missing_texture() {
        let dir = temp_dir("missing");
        let device = CountingDevice::default();
        let mut cache = TextureCache::new();
        let materials = Materials::new(vec![textured("m", "does-not-exist.png")]);

        let result = cache.ensure_loaded(&device, &materials, &dir);

        assert!(matches!(
            result,
            Err(ViewerError::Texture(TextureError::Missing { .. }))
        ));
    }

    #[test]
    fn test_undecodable_texture() {
        let dir = temp_dir("garbage");
        fs::write(dir.join("garbage.png"), b"definitely not a png").unwrap();

        let result = decode_image(&dir.join("garbage.png"));

        assert!(matches!(result, Err(TextureError::Decode { .. })));
    }

    #[test]
    fn test_unsupported_channel_count() {
        let dir = temp_dir("gray");
        image::GrayImage::new(2, 2).save(dir.join("gray.png")).unwrap();

        let result = decode_image(&dir.join("gray.png"));

        assert!(matches!(
            result,
            Err(TextureError::UnsupportedChannelCount { channels: 1, .. })
        ));
    }

    #[test]
    fn test_rgb_widened_to_rgba() {
        let image = DecodedImage {
            width: 2,
            height: 1,
            channels: 3,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };

        assert_eq!(image.to_rgba(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(DecodedImage::white().to_rgba(), vec![255; 4]);
    }
}

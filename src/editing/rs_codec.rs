//! # 默认编解码实现（`image` + `fast_image_resize`）
//!
//! ## 设计思路
//!
//! 在关键节点增加资源上限控制：优先做签名与尺寸检查，再进行完整解码，
//! 降低异常输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 文件存在性 + 体积上限
//! 2. 同一个缓冲读取器先做签名检查（magic bytes），识别出非图片类型直接拒绝
//! 3. 按内容猜测格式并读取 header 尺寸
//! 4. 按调用方给出的 header 做像素/内存上限校验，再携带 `image::Limits` 完整解码
//! 5. 重采样优先走 `fast_image_resize`，失败回退 `image::resize_exact`
//!
//! `image` 不支持按比例解码，`sample_size` 提示在这里不生效：
//! 缩小全部交给第 5 步的一次带滤镜重采样完成。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use super::{ImageCodec, ImageConfig, ImageDimensions, ImageError};

/// 基于 `image` crate 的编解码器。
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageCodec for ImageRsCodec {
    type Bitmap = DynamicImage;

    fn probe(&self, path: &Path, config: &ImageConfig) -> Result<ImageDimensions, ImageError> {
        Self::validate_file(path, config)?;

        let (width, height) = Self::open_reader(path)?
            .into_dimensions()
            .map_err(|e| Self::map_image_error(path, e))?;

        log::debug!("🔍 读取图片头 - 路径: {} 尺寸: {}x{}", path.display(), width, height);

        ImageDimensions::new(width, height)
            .map_err(|_| ImageError::Decode(format!("图片头尺寸无效：{}x{}", width, height)))
    }

    fn decode(
        &self,
        path: &Path,
        header: ImageDimensions,
        sample_size: u32,
        config: &ImageConfig,
    ) -> Result<DynamicImage, ImageError> {
        Self::validate_pixel_limits(config, header)?;
        Self::validate_decoded_memory_limits(config, header)?;

        let mut reader = Self::open_reader(path)?;
        let mut limits = Limits::default();
        limits.max_alloc = Some(config.max_decoded_bytes);
        reader.limits(limits);

        let decoded = reader.decode().map_err(|e| Self::map_image_error(path, e))?;

        log::debug!(
            "🧩 解码完成 - 路径: {} 尺寸: {}x{}（sample_size={} 不生效，按原分辨率解码）",
            path.display(),
            decoded.width(),
            decoded.height(),
            sample_size
        );

        Ok(decoded)
    }

    fn resample(
        &self,
        bitmap: &DynamicImage,
        target: ImageDimensions,
        filter: FilterType,
        config: &ImageConfig,
    ) -> Result<DynamicImage, ImageError> {
        if self.dimensions(bitmap) == target {
            return Ok(bitmap.clone());
        }

        Self::validate_pixel_limits(config, target)?;
        Self::validate_decoded_memory_limits(config, target)?;

        if !config.use_fast_resize {
            return Ok(bitmap.resize_exact(target.width, target.height, filter));
        }

        match Self::resize_with_fast_image_resize(bitmap, target, filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 重采样失败，回退 image::resize_exact：{}",
                    err
                );
                Ok(bitmap.resize_exact(target.width, target.height, filter))
            }
        }
    }

    fn dimensions(&self, bitmap: &DynamicImage) -> ImageDimensions {
        ImageDimensions {
            width: bitmap.width(),
            height: bitmap.height(),
        }
    }

    fn save(&self, bitmap: &DynamicImage, path: &Path) -> Result<(), ImageError> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

        // JPEG 不支持透明通道
        let result = if format == ImageFormat::Jpeg && bitmap.color().has_alpha() {
            DynamicImage::ImageRgb8(bitmap.to_rgb8()).save_with_format(path, format)
        } else {
            bitmap.save_with_format(path, format)
        };

        result.map_err(|e| match e {
            image::ImageError::IoError(io) => {
                ImageError::FileSystem(format!("无法写入图片文件 {}：{}", path.display(), io))
            }
            other => ImageError::Encode(format!("图片编码失败 {}：{}", path.display(), other)),
        })?;

        log::debug!(
            "💾 图片已保存 - 路径: {} 格式: {:?} 尺寸: {}",
            path.display(),
            format,
            self.dimensions(bitmap)
        );

        Ok(())
    }
}

impl ImageRsCodec {
    /// 仅通过内存中的图片头信息读取宽高。
    pub fn probe_bytes(bytes: &[u8]) -> Result<ImageDimensions, ImageError> {
        Self::validate_image_signature(bytes)?;

        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(format!("无法识别图片格式：{}", e)))?
            .into_dimensions()
            .map_err(|e| ImageError::Decode(format!("无法读取图片尺寸：{}", e)))?;

        ImageDimensions::new(width, height)
            .map_err(|_| ImageError::Decode(format!("图片头尺寸无效：{}x{}", width, height)))
    }

    /// 文件存在性与体积校验。
    fn validate_file(path: &Path, config: &ImageConfig) -> Result<(), ImageError> {
        if !path.exists() {
            return Err(ImageError::NotFound(path.display().to_string()));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ImageError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if !metadata.is_file() {
            return Err(ImageError::FileSystem(format!("不是普通文件：{}", path.display())));
        }

        if metadata.len() > config.max_file_size {
            return Err(ImageError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 通过文件签名（magic bytes）校验输入是否为图片。
    ///
    /// `infer` 无法识别的签名交由 `image` 的格式猜测继续判断。
    fn validate_image_signature(bytes: &[u8]) -> Result<(), ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Decode("图片内容为空".to_string()));
        }

        if let Some(kind) = infer::get(bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(ImageError::Decode(format!(
                    "文件签名不是图片类型：{}",
                    kind.mime_type()
                )));
            }
        }

        Ok(())
    }

    /// 打开文件一次：缓冲区开头用于签名校验，同一读取器继续用于格式猜测与解码。
    fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, ImageError> {
        let file = File::open(path).map_err(|e| Self::map_io_error(path, e))?;
        let mut reader = BufReader::new(file);

        let head = reader.fill_buf().map_err(|e| Self::map_io_error(path, e))?;
        Self::validate_image_signature(head)?;

        let mut reader = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(|e| Self::map_io_error(path, e))?;

        // 无魔数的格式（如 TGA）退回扩展名
        if reader.format().is_none() {
            if let Ok(format) = ImageFormat::from_path(path) {
                reader.set_format(format);
            }
        }

        Ok(reader)
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        config: &ImageConfig,
        dimensions: ImageDimensions,
    ) -> Result<(), ImageError> {
        let pixels = dimensions.pixels();

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        dimensions: ImageDimensions,
    ) -> Result<(), ImageError> {
        let estimated = dimensions
            .pixels()
            .checked_mul(4)
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target: ImageDimensions,
        filter: FilterType,
    ) -> Result<DynamicImage, ImageError> {
        let mut dst_image = DynamicImage::new(target.width, target.height, image.color());

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(Self::to_fast_alg(filter));

        resizer
            .resize(image, &mut dst_image, Some(&options))
            .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

        Ok(dst_image)
    }

    fn to_fast_alg(filter: FilterType) -> fr::ResizeAlg {
        match filter {
            FilterType::Nearest => fr::ResizeAlg::Nearest,
            FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
            FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }

    fn map_io_error(path: &Path, error: std::io::Error) -> ImageError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ImageError::NotFound(path.display().to_string())
        } else {
            ImageError::FileSystem(format!("无法读取图片文件 {}：{}", path.display(), error))
        }
    }

    fn map_image_error(path: &Path, error: image::ImageError) -> ImageError {
        match error {
            // 截断或损坏的数据在部分解码器中以 I/O 错误上报
            image::ImageError::IoError(io)
                if matches!(
                    io.kind(),
                    std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::InvalidData
                ) =>
            {
                ImageError::Decode(format!("图片数据不完整 {}：{}", path.display(), io))
            }
            image::ImageError::IoError(io) => Self::map_io_error(path, io),
            image::ImageError::Limits(limit) => {
                ImageError::ResourceLimit(format!("解码超出资源限制 {}：{}", path.display(), limit))
            }
            other => ImageError::Decode(format!("图片解码失败 {}：{}", path.display(), other)),
        }
    }
}

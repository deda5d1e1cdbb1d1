//! # 图片编解码能力抽象
//!
//! ## 设计思路
//!
//! 探测、解码、重采样、编码全部委托给 `ImageCodec`，`ImageEditor` 只依赖这个 trait。
//! 生产环境使用 `ImageRsCodec`（`image` + `fast_image_resize`），测试可注入记录调用的替身。

use std::path::Path;

use image::imageops::FilterType;

use super::{ImageConfig, ImageDimensions, ImageError};

/// 图片编解码能力。
///
/// `Bitmap` 为编解码器持有的已解码位图，编排层只读取其尺寸，不读取像素。
pub trait ImageCodec {
    type Bitmap;

    /// 仅读取文件头获取宽高，不解码像素。
    fn probe(&self, path: &Path, config: &ImageConfig) -> Result<ImageDimensions, ImageError>;

    /// 解码整张图片。
    ///
    /// `header` 为调用方已读取的文件头尺寸，资源上限按它校验，实现无需再读一次文件头。
    /// `sample_size` 为整数子采样提示（1 表示原尺寸），只对能按比例解码的实现有意义，
    /// 其余实现按原分辨率解码即可；结果尺寸不得小于 `ceil(header / sample_size)`。
    fn decode(
        &self,
        path: &Path,
        header: ImageDimensions,
        sample_size: u32,
        config: &ImageConfig,
    ) -> Result<Self::Bitmap, ImageError>;

    /// 重采样到精确尺寸，不保持宽高比。
    fn resample(
        &self,
        bitmap: &Self::Bitmap,
        target: ImageDimensions,
        filter: FilterType,
        config: &ImageConfig,
    ) -> Result<Self::Bitmap, ImageError>;

    /// 位图当前尺寸。
    fn dimensions(&self, bitmap: &Self::Bitmap) -> ImageDimensions;

    /// 编码写入文件，格式由扩展名决定。
    fn save(&self, bitmap: &Self::Bitmap, path: &Path) -> Result<(), ImageError>;
}

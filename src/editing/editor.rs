//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageEditor` 只负责流程编排与配置管理，像素操作全部交给注入的 `ImageCodec`。
//! 有界加载的链路固定为：
//! 1. 只读文件头获取源尺寸
//! 2. 计算缩放比例与目标尺寸（向上取整）
//! 3. 把文件头尺寸与子采样提示交给解码，再一次重采样到目标尺寸
//!
//! ## 实现思路
//!
//! - 配置在构建时确定，之后只读；换档位即换一个编辑器。
//! - 文件头只读取一次，解码阶段复用其结果做资源校验。
//! - 记录 `probe/decode/resample/total` 阶段耗时，便于性能诊断。

use std::path::Path;
use std::time::Instant;

use image::imageops::FilterType;

use super::sampling::{compute_fit_dimensions, compute_fraction_dimensions};
use super::{ImageCodec, ImageConfig, ImageDimensions, ImageError, ImageRsCodec};

/// 图片编辑器。
///
/// 封装了配置状态与编解码器，并编排缩放、探测、有界加载流程。
pub struct ImageEditor<C: ImageCodec = ImageRsCodec> {
    codec: C,
    config: ImageConfig,
}

impl ImageEditor<ImageRsCodec> {
    /// 使用默认编解码器创建编辑器。
    ///
    /// # 示例
    /// ```rust
    /// use image_editing::editing::{ImageConfig, ImageEditor, ImagePerformanceProfile};
    ///
    /// let editor = ImageEditor::new(ImageConfig::with_profile(ImagePerformanceProfile::Speed));
    /// assert_eq!(
    ///     editor.config().infer_performance_profile(),
    ///     ImagePerformanceProfile::Speed
    /// );
    /// ```
    pub fn new(config: ImageConfig) -> Self {
        Self::with_codec(ImageRsCodec, config)
    }
}

impl Default for ImageEditor<ImageRsCodec> {
    fn default() -> Self {
        Self::new(ImageConfig::default())
    }
}

impl<C: ImageCodec> ImageEditor<C> {
    /// 注入自定义编解码器。
    pub fn with_codec(codec: C, config: ImageConfig) -> Self {
        log::debug!(
            "⚙️ 图片编辑器就绪 - 档位: {} filter: {:?} fast_resize: {}",
            config.infer_performance_profile(),
            config.resize_filter,
            config.use_fast_resize
        );

        Self { codec, config }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// 按倍数缩放位图（`0.5` 表示宽高各缩小一半）。
    ///
    /// `filter` 为 `false` 时使用最近邻采样，否则使用配置中的平滑滤镜。
    pub fn scale_bitmap(
        &self,
        bitmap: &C::Bitmap,
        scale: f32,
        filter: bool,
    ) -> Result<C::Bitmap, ImageError> {
        let config = &self.config;
        let source = self.bitmap_dimensions(bitmap)?;
        let target = compute_fraction_dimensions(source, scale)?;
        let filter = if filter { config.resize_filter } else { FilterType::Nearest };

        log::debug!("📐 按倍数缩放：{} x{} -> {}", source, scale, target);

        self.codec.resample(bitmap, target, filter, config)
    }

    /// 缩放位图到精确尺寸，不保持宽高比。
    pub fn scale_bitmap_to(
        &self,
        bitmap: &C::Bitmap,
        width: u32,
        height: u32,
    ) -> Result<C::Bitmap, ImageError> {
        let target = ImageDimensions::new(width, height)?;
        self.bitmap_dimensions(bitmap)?;

        self.codec
            .resample(bitmap, target, self.config.resize_filter, &self.config)
    }

    /// 只读文件头获取图片尺寸。
    pub fn get_image_dimensions(&self, path: impl AsRef<Path>) -> Result<ImageDimensions, ImageError> {
        self.codec.probe(path.as_ref(), &self.config)
    }

    /// 加载图片并保证不超出 `max_width x max_height`。
    ///
    /// 源图已在框内时原样解码，不会放大。
    pub fn get_bitmap(
        &self,
        path: impl AsRef<Path>,
        max_width: u32,
        max_height: u32,
    ) -> Result<C::Bitmap, ImageError> {
        let bounds = ImageDimensions::new(max_width, max_height)?;
        self.load_scaled(path.as_ref(), bounds, false)
    }

    /// 加载图片并缩放到装入 `width x height` 的尺寸（向上取整），小图会被放大。
    pub fn get_scaled_bitmap(
        &self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<C::Bitmap, ImageError> {
        let target = ImageDimensions::new(width, height)?;
        self.load_scaled(path.as_ref(), target, true)
    }

    /// 编码保存位图，格式由扩展名决定（默认 PNG）。
    pub fn save_bitmap(&self, bitmap: &C::Bitmap, path: impl AsRef<Path>) -> Result<(), ImageError> {
        self.codec.save(bitmap, path.as_ref())
    }

    fn load_scaled(
        &self,
        path: &Path,
        bounds: ImageDimensions,
        allow_upscale: bool,
    ) -> Result<C::Bitmap, ImageError> {
        let total_start = Instant::now();
        let config = &self.config;

        let probe_start = Instant::now();
        let source = self.codec.probe(path, config)?;
        let probe_ms = probe_start.elapsed().as_millis();

        if !allow_upscale && source.fits_within(bounds) {
            let decode_start = Instant::now();
            let bitmap = self.codec.decode(path, source, 1, config)?;

            log::info!(
                "✅ 图片加载完成（无需缩放） - 路径: {} 尺寸: {} 框: {} 耗时: probe={}ms decode={}ms total={}ms",
                path.display(),
                source,
                bounds,
                probe_ms,
                decode_start.elapsed().as_millis(),
                total_start.elapsed().as_millis()
            );
            return Ok(bitmap);
        }

        let (factor, target) = compute_fit_dimensions(source, bounds)?;
        let sample_size = factor.sample_size();

        log::debug!(
            "🧮 缩放计划 - 源尺寸: {} 框: {} 比例: {} 目标: {} sample_size: {}",
            source,
            bounds,
            factor,
            target,
            sample_size
        );

        let decode_start = Instant::now();
        let decoded = self.codec.decode(path, source, sample_size, config)?;
        let decode_ms = decode_start.elapsed().as_millis();

        let resample_start = Instant::now();
        let bitmap = self
            .codec
            .resample(&decoded, target, config.resize_filter, config)?;
        let resample_ms = resample_start.elapsed().as_millis();

        log::info!(
            "✅ 图片加载完成 - 路径: {} 原始尺寸: {} 输出尺寸: {} 耗时: probe={}ms decode={}ms resample={}ms total={}ms",
            path.display(),
            source,
            target,
            probe_ms,
            decode_ms,
            resample_ms,
            total_start.elapsed().as_millis()
        );

        Ok(bitmap)
    }

    fn bitmap_dimensions(&self, bitmap: &C::Bitmap) -> Result<ImageDimensions, ImageError> {
        let dimensions = self.codec.dimensions(bitmap);
        ImageDimensions::new(dimensions.width, dimensions.height)
            .map_err(|_| ImageError::InvalidArgument(format!("位图尺寸无效：{}", dimensions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::ImagePerformanceProfile;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Probe(PathBuf),
        Decode(PathBuf, ImageDimensions, u32),
        Resample(ImageDimensions, ImageDimensions, FilterType),
    }

    /// 以尺寸代替像素的编解码替身，记录每次调用。
    #[derive(Default)]
    struct FakeCodec {
        files: HashMap<PathBuf, ImageDimensions>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeCodec {
        fn with_file(path: &str, width: u32, height: u32) -> Self {
            let mut codec = Self::default();
            codec
                .files
                .insert(PathBuf::from(path), ImageDimensions::new(width, height).expect("dims"));
            codec
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ImageCodec for FakeCodec {
        type Bitmap = ImageDimensions;

        fn probe(&self, path: &Path, _config: &ImageConfig) -> Result<ImageDimensions, ImageError> {
            self.calls.borrow_mut().push(Call::Probe(path.to_path_buf()));
            self.files
                .get(path)
                .copied()
                .ok_or_else(|| ImageError::NotFound(path.display().to_string()))
        }

        fn decode(
            &self,
            path: &Path,
            header: ImageDimensions,
            sample_size: u32,
            _config: &ImageConfig,
        ) -> Result<ImageDimensions, ImageError> {
            self.calls
                .borrow_mut()
                .push(Call::Decode(path.to_path_buf(), header, sample_size));
            ImageDimensions::new(
                header.width.div_ceil(sample_size),
                header.height.div_ceil(sample_size),
            )
        }

        fn resample(
            &self,
            bitmap: &ImageDimensions,
            target: ImageDimensions,
            filter: FilterType,
            _config: &ImageConfig,
        ) -> Result<ImageDimensions, ImageError> {
            self.calls
                .borrow_mut()
                .push(Call::Resample(*bitmap, target, filter));
            Ok(target)
        }

        fn dimensions(&self, bitmap: &ImageDimensions) -> ImageDimensions {
            *bitmap
        }

        fn save(&self, _bitmap: &ImageDimensions, _path: &Path) -> Result<(), ImageError> {
            Ok(())
        }
    }

    fn dims(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions::new(width, height).expect("valid dimensions")
    }

    #[test]
    fn get_bitmap_inside_box_skips_resample() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("small.png", 100, 200),
            ImageConfig::default(),
        );

        let bitmap = editor.get_bitmap("small.png", 500, 500).expect("load failed");

        assert_eq!(bitmap, dims(100, 200));
        assert_eq!(
            editor.codec().calls(),
            vec![
                Call::Probe(PathBuf::from("small.png")),
                Call::Decode(PathBuf::from("small.png"), dims(100, 200), 1),
            ]
        );
    }

    #[test]
    fn get_bitmap_outside_box_rounds_up() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("large.png", 600, 800),
            ImageConfig::default(),
        );

        let bitmap = editor.get_bitmap("large.png", 500, 500).expect("load failed");

        assert_eq!(bitmap, dims(375, 500));
        assert_eq!(
            editor.codec().calls(),
            vec![
                Call::Probe(PathBuf::from("large.png")),
                Call::Decode(PathBuf::from("large.png"), dims(600, 800), 1),
                Call::Resample(dims(600, 800), dims(375, 500), FilterType::Triangle),
            ]
        );
    }

    #[test]
    fn get_scaled_bitmap_passes_sample_size_hint() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("photo.jpg", 1000, 900),
            ImageConfig::default(),
        );

        let bitmap = editor.get_scaled_bitmap("photo.jpg", 300, 500).expect("load failed");

        assert_eq!(bitmap, dims(300, 270));
        assert_eq!(
            editor.codec().calls(),
            vec![
                Call::Probe(PathBuf::from("photo.jpg")),
                Call::Decode(PathBuf::from("photo.jpg"), dims(1000, 900), 3),
                Call::Resample(dims(334, 300), dims(300, 270), FilterType::Triangle),
            ]
        );
    }

    #[test]
    fn get_scaled_bitmap_enlarges_small_source() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("small.png", 100, 200),
            ImageConfig::default(),
        );

        let bitmap = editor.get_scaled_bitmap("small.png", 500, 500).expect("load failed");
        assert_eq!(bitmap, dims(250, 500));
    }

    #[test]
    fn zero_box_is_rejected_before_io() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("large.png", 600, 800),
            ImageConfig::default(),
        );

        assert!(matches!(
            editor.get_bitmap("large.png", 0, 500),
            Err(ImageError::InvalidArgument(_))
        ));
        assert!(matches!(
            editor.get_scaled_bitmap("large.png", 300, 0),
            Err(ImageError::InvalidArgument(_))
        ));
        assert!(editor.codec().calls().is_empty());
    }

    #[test]
    fn missing_file_propagates_not_found() {
        let editor = ImageEditor::with_codec(FakeCodec::default(), ImageConfig::default());

        assert!(matches!(
            editor.get_image_dimensions("missing.png"),
            Err(ImageError::NotFound(_))
        ));
        assert!(matches!(
            editor.get_bitmap("missing.png", 10, 10),
            Err(ImageError::NotFound(_))
        ));
    }

    #[test]
    fn scale_bitmap_filter_flag_selects_filter() {
        let editor = ImageEditor::with_codec(FakeCodec::default(), ImageConfig::default());

        let scaled = editor.scale_bitmap(&dims(100, 100), 0.5, false).expect("scale failed");
        assert_eq!(scaled, dims(50, 50));

        editor.scale_bitmap(&dims(100, 100), 0.5, true).expect("scale failed");

        assert_eq!(
            editor.codec().calls(),
            vec![
                Call::Resample(dims(100, 100), dims(50, 50), FilterType::Nearest),
                Call::Resample(dims(100, 100), dims(50, 50), FilterType::Triangle),
            ]
        );
    }

    #[test]
    fn scale_bitmap_to_uses_exact_target() {
        let editor = ImageEditor::with_codec(FakeCodec::default(), ImageConfig::default());

        let scaled = editor.scale_bitmap_to(&dims(100, 100), 60, 70).expect("scale failed");
        assert_eq!(scaled, dims(60, 70));
        assert!(matches!(
            editor.scale_bitmap_to(&dims(100, 100), 0, 70),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn header_is_read_once_per_load() {
        let editor = ImageEditor::with_codec(
            FakeCodec::with_file("large.png", 563, 300),
            ImageConfig::default(),
        );

        let bitmap = editor.get_bitmap("large.png", 500, 500).expect("load failed");

        assert_eq!(bitmap, dims(500, 267));
        let header_reads = editor
            .codec()
            .calls()
            .iter()
            .filter(|call| matches!(call, Call::Probe(_)))
            .count();
        assert_eq!(header_reads, 1);
    }

    #[test]
    fn profile_given_at_construction_selects_filter() {
        let editor = ImageEditor::with_codec(
            FakeCodec::default(),
            ImageConfig::with_profile(ImagePerformanceProfile::Quality),
        );

        editor.scale_bitmap_to(&dims(100, 100), 10, 10).expect("scale failed");

        assert_eq!(
            editor.config().infer_performance_profile(),
            ImagePerformanceProfile::Quality
        );
        assert_eq!(
            editor.codec().calls(),
            vec![Call::Resample(dims(100, 100), dims(10, 10), FilterType::CatmullRom)]
        );
    }
}

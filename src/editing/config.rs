//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `ImageConfig`，保证解码与缩放行为可观测、可调整、可测试。
//! 其中性能档位（quality / balanced / speed）作为高层语义，映射到底层参数组合。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ImagePerformanceProfile` 实现 `FromStr` / `Display`，负责档位字符串解析与反向输出。
//! - `apply_performance_profile` 将档位转换为具体参数。
//! - `infer_performance_profile` 用于从当前配置反推档位。

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;

use super::ImageError;

/// 图片编辑配置。
///
/// 字段覆盖了读取、解码与重采样三个阶段。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 读取图片文件时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 开启平滑时使用的重采样滤镜。
    pub resize_filter: FilterType,
    /// 是否优先使用 `fast_image_resize`，失败时回退 `image::resize_exact`。
    pub use_fast_resize: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::Triangle,
            use_fast_resize: true,
        }
    }
}

/// 图片性能档位。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与性能平衡
/// - `Speed`：优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl FromStr for ImagePerformanceProfile {
    type Err = ImageError;

    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use image_editing::editing::ImagePerformanceProfile;
    ///
    /// let p: ImagePerformanceProfile = "balanced".parse()?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), image_editing::editing::ImageError>(())
    /// ```
    fn from_str(profile: &str) -> Result<Self, ImageError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidArgument(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

impl fmt::Display for ImagePerformanceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ImagePerformanceProfile {
    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl ImageConfig {
    /// 基于当前参数反推性能档位。
    pub fn infer_performance_profile(&self) -> ImagePerformanceProfile {
        match self.resize_filter {
            FilterType::CatmullRom | FilterType::Lanczos3 => ImagePerformanceProfile::Quality,
            FilterType::Nearest => ImagePerformanceProfile::Speed,
            _ => ImagePerformanceProfile::Balanced,
        }
    }

    /// 应用指定性能档位到实际参数。
    pub fn apply_performance_profile(&mut self, profile: ImagePerformanceProfile) {
        match profile {
            ImagePerformanceProfile::Quality => {
                self.resize_filter = FilterType::CatmullRom;
            }
            ImagePerformanceProfile::Balanced => {
                self.resize_filter = FilterType::Triangle;
            }
            ImagePerformanceProfile::Speed => {
                self.resize_filter = FilterType::Nearest;
            }
        }
    }

    /// 由档位直接构建配置。
    pub fn with_profile(profile: ImagePerformanceProfile) -> Self {
        let mut config = Self::default();
        config.apply_performance_profile(profile);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_parse_is_case_insensitive() {
        assert_eq!(
            "  Speed ".parse::<ImagePerformanceProfile>().expect("parse failed"),
            ImagePerformanceProfile::Speed
        );
        assert!(matches!(
            "turbo".parse::<ImagePerformanceProfile>(),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn profile_round_trips_through_config() {
        for profile in [
            ImagePerformanceProfile::Quality,
            ImagePerformanceProfile::Balanced,
            ImagePerformanceProfile::Speed,
        ] {
            let config = ImageConfig::with_profile(profile);
            assert_eq!(config.infer_performance_profile(), profile);
        }
    }

    #[test]
    fn default_config_is_balanced() {
        assert_eq!(
            ImageConfig::default().infer_performance_profile(),
            ImagePerformanceProfile::Balanced
        );
    }
}

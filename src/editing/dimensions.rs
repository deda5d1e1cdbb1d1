//! # 尺寸与缩放比例模型
//!
//! ## 设计思路
//!
//! - `ImageDimensions` 表示源图的自然尺寸或调用方请求的目标尺寸，宽高均为正整数
//! - `ScaleFactor` 表示线性尺寸的除数：`> 1` 缩小，`< 1` 放大
//!
//! 两者都在构造时完成校验，后续计算无需再判断零值或非有限值。

use std::fmt;

use super::ImageError;

/// 图片宽高（像素）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// 构建尺寸，宽或高为 0 时返回 `InvalidArgument`。
    pub fn new(width: u32, height: u32) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "尺寸必须为正整数：{}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// 接受有符号输入（如命令行参数），负数与 0 一并拒绝。
    pub fn from_signed(width: i64, height: i64) -> Result<Self, ImageError> {
        let to_u32 = |value: i64| u32::try_from(value).ok().filter(|v| *v > 0);
        match (to_u32(width), to_u32(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(ImageError::InvalidArgument(format!(
                "尺寸必须为正整数：{}x{}",
                width, height
            ))),
        }
    }

    /// 像素总数。
    pub fn pixels(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// 两个方向都不超过 `bounds`。
    pub fn fits_within(self, bounds: ImageDimensions) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 缩放比例。
///
/// 新尺寸 = 源尺寸 / 比例。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// 比例必须为有限正数。
    pub fn new(value: f64) -> Result<Self, ImageError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ImageError::InvalidArgument(format!(
                "缩放比例必须为有限正数：{}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// 是否为缩小（比例大于 1）。
    pub fn is_downscale(self) -> bool {
        self.0 > 1.0
    }

    /// 解码阶段的整数子采样提示：不低于 1，且不跨过目标尺寸。
    pub fn sample_size(self) -> u32 {
        let floor = self.0.floor();
        if floor < 1.0 {
            1
        } else if floor >= u32::MAX as f64 {
            u32::MAX
        } else {
            floor as u32
        }
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

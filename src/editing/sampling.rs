//! # 缩放比例与目标尺寸计算
//!
//! ## 设计思路
//!
//! 本模块是整个库唯一自有的计算逻辑，不触碰像素：
//! 1. 由源尺寸与目标框计算缩放比例：`max(sw / tw, sh / th)`
//! 2. 由源尺寸与比例计算目标尺寸：`ceil(sw / factor)`、`ceil(sh / factor)`
//!
//! 取两轴比例中较大者，保证缩放后两个方向都落在目标框内；
//! 目标尺寸一律向上取整，结果不会比 `源尺寸 / 比例` 更小。

use super::{ImageDimensions, ImageError, ScaleFactor};

/// 计算把 `source` 装进 `target` 框所需的缩放比例。
///
/// # 示例
/// ```rust
/// use image_editing::editing::{compute_scale_factor, ImageDimensions};
///
/// let source = ImageDimensions::new(600, 800)?;
/// let bounds = ImageDimensions::new(500, 500)?;
/// assert_eq!(compute_scale_factor(source, bounds)?.value(), 1.6);
/// # Ok::<(), image_editing::editing::ImageError>(())
/// ```
pub fn compute_scale_factor(
    source: ImageDimensions,
    target: ImageDimensions,
) -> Result<ScaleFactor, ImageError> {
    if target.width == 0 || target.height == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "目标尺寸必须为正整数：{}",
            target
        )));
    }

    let width_ratio = source.width as f64 / target.width as f64;
    let height_ratio = source.height as f64 / target.height as f64;

    ScaleFactor::new(width_ratio.max(height_ratio))
}

/// 按比例计算缩放后的尺寸，两轴均向上取整且不小于 1。
pub fn compute_scaled_dimensions(
    source: ImageDimensions,
    factor: ScaleFactor,
) -> Result<ImageDimensions, ImageError> {
    let width = ceil_to_pixels(source.width as f64 / factor.value())?;
    let height = ceil_to_pixels(source.height as f64 / factor.value())?;
    ImageDimensions::new(width, height)
}

/// 把源图装进 `bounds` 后的尺寸（比例计算 + 向上取整）。
///
/// 比例的浮点误差可能让向上取整越过边界 1 像素，因此每个方向再夹到 `bounds` 以内；
/// 夹取后的值仍是精确商的向上取整。
pub fn compute_fit_dimensions(
    source: ImageDimensions,
    bounds: ImageDimensions,
) -> Result<(ScaleFactor, ImageDimensions), ImageError> {
    let factor = compute_scale_factor(source, bounds)?;
    let scaled = compute_scaled_dimensions(source, factor)?;
    let fitted = ImageDimensions::new(
        scaled.width.min(bounds.width),
        scaled.height.min(bounds.height),
    )?;
    Ok((factor, fitted))
}

/// 按乘数缩放后的尺寸（`0.5` 表示缩小一半），四舍五入且不小于 1。
pub fn compute_fraction_dimensions(
    source: ImageDimensions,
    scale: f32,
) -> Result<ImageDimensions, ImageError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ImageError::InvalidArgument(format!(
            "缩放倍数必须为有限正数：{}",
            scale
        )));
    }

    let scale = scale as f64;
    let width = round_to_pixels(source.width as f64 * scale)?;
    let height = round_to_pixels(source.height as f64 * scale)?;
    ImageDimensions::new(width, height)
}

fn ceil_to_pixels(value: f64) -> Result<u32, ImageError> {
    to_pixels(value.ceil())
}

fn round_to_pixels(value: f64) -> Result<u32, ImageError> {
    to_pixels(value.round())
}

fn to_pixels(value: f64) -> Result<u32, ImageError> {
    if !value.is_finite() || value > u32::MAX as f64 {
        return Err(ImageError::ResourceLimit(format!(
            "缩放后尺寸超出范围：{}",
            value
        )));
    }
    Ok((value as u32).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dims(width: u32, height: u32) -> ImageDimensions {
        ImageDimensions::new(width, height).expect("valid dimensions")
    }

    #[test]
    fn factor_uses_larger_axis_ratio() {
        let factor = compute_scale_factor(dims(600, 800), dims(500, 500)).expect("factor");
        assert_eq!(factor.value(), 1.6);

        let factor = compute_scale_factor(dims(1000, 900), dims(300, 500)).expect("factor");
        assert!((factor.value() - 1000.0 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn factor_rejects_zero_target() {
        let target = ImageDimensions { width: 0, height: 500 };
        assert!(matches!(
            compute_scale_factor(dims(600, 800), target),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn bounded_scenarios_round_up() {
        let (_, scaled) = compute_fit_dimensions(dims(600, 800), dims(500, 500)).expect("fit");
        assert_eq!(scaled, dims(375, 500));

        let (_, scaled) = compute_fit_dimensions(dims(1000, 900), dims(300, 500)).expect("fit");
        assert_eq!(scaled, dims(300, 270));
    }

    #[test]
    fn uneven_ratio_rounds_up_not_to_nearest() {
        let factor = ScaleFactor::new(3.0).expect("factor");
        let scaled = compute_scaled_dimensions(dims(100, 101), factor).expect("scaled");
        assert_eq!(scaled, dims(34, 34));
    }

    #[test]
    fn fit_never_overshoots_box_on_float_error() {
        // 563 / (563 / 500) 在浮点下为 500.00000000000006
        let (_, scaled) = compute_fit_dimensions(dims(563, 300), dims(500, 500)).expect("fit");
        assert_eq!(scaled, dims(500, 267));
    }

    #[test]
    fn small_source_scales_up_through_fit() {
        let (factor, scaled) = compute_fit_dimensions(dims(100, 200), dims(500, 500)).expect("fit");
        assert!(!factor.is_downscale());
        assert_eq!(scaled, dims(250, 500));
    }

    #[test]
    fn huge_upscale_is_rejected() {
        let factor = ScaleFactor::new(1e-9).expect("factor");
        assert!(matches!(
            compute_scaled_dimensions(dims(1000, 1000), factor),
            Err(ImageError::ResourceLimit(_))
        ));
    }

    #[test]
    fn fraction_halves_square() {
        let scaled = compute_fraction_dimensions(dims(100, 100), 0.5).expect("scaled");
        assert_eq!(scaled, dims(50, 50));
    }

    #[test]
    fn fraction_keeps_at_least_one_pixel() {
        let scaled = compute_fraction_dimensions(dims(3, 3), 0.01).expect("scaled");
        assert_eq!(scaled, dims(1, 1));
        assert!(compute_fraction_dimensions(dims(3, 3), 0.0).is_err());
        assert!(compute_fraction_dimensions(dims(3, 3), f32::NAN).is_err());
    }

    proptest! {
        #[test]
        fn scaled_dimensions_never_undershoot(
            width in 1u32..20_000,
            height in 1u32..20_000,
            factor in 0.05f64..500.0,
        ) {
            let source = dims(width, height);
            let factor = ScaleFactor::new(factor).expect("factor");
            let scaled = compute_scaled_dimensions(source, factor).expect("scaled");

            prop_assert!(scaled.width as f64 >= width as f64 / factor.value());
            prop_assert!(scaled.height as f64 >= height as f64 / factor.value());
        }

        #[test]
        fn fit_dimensions_stay_inside_bounds(
            width in 1u32..10_000,
            height in 1u32..10_000,
            max_width in 1u32..4_000,
            max_height in 1u32..4_000,
        ) {
            let (_, scaled) = compute_fit_dimensions(dims(width, height), dims(max_width, max_height))
                .expect("fit");

            prop_assert!(scaled.width <= max_width);
            prop_assert!(scaled.height <= max_height);
        }
    }
}

//! # 图片编辑模块（editing）
//!
//! ## 设计思路
//!
//! 该模块将“尺寸探测 → 比例计算 → 解码 → 重采样 → 保存”按职责拆分为多个子模块，
//! 自有逻辑只有比例与目标尺寸的计算，像素操作全部委托给可注入的编解码器。
//!
//! - `dimensions`：尺寸与缩放比例模型
//! - `sampling`：缩放比例与向上取整的目标尺寸计算
//! - `codec`：编解码能力抽象 `ImageCodec`
//! - `rs_codec`：基于 `image` + `fast_image_resize` 的默认实现
//! - `editor`：编排缩放、探测、有界加载
//! - `config/error`：配置与错误
//!
//! ## 调用链
//!
//! ```text
//! 调用方 / main.rs
//!    ↓
//! editor.rs（文件头只读一次 + 阶段耗时日志）
//!    ├─ sampling.rs（比例 + 向上取整）
//!    └─ codec.rs → rs_codec.rs（探测 / 解码 / 重采样 / 保存）
//!    ↓
//! 返回 ImageError
//! ```

mod codec;
mod config;
mod dimensions;
mod editor;
mod error;
mod rs_codec;
mod sampling;

pub use codec::ImageCodec;
pub use config::{ImageConfig, ImagePerformanceProfile};
pub use dimensions::{ImageDimensions, ScaleFactor};
pub use editor::ImageEditor;
pub use error::ImageError;
pub use rs_codec::ImageRsCodec;
pub use sampling::{
    compute_fit_dimensions, compute_fraction_dimensions, compute_scale_factor,
    compute_scaled_dimensions,
};

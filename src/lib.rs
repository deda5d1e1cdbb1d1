//! # 图片编辑工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  main.rs (clap 子命令: probe / fit / scale / resize)      │
//! │       │  (env_logger + AppError)                         │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↓
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ error ────── AppError (应用级统一错误类型)             │
//! │  │                                                       │
//! │  └─ editing ──── ImageEditor<C: ImageCodec>              │
//! │      ├─ sampling      比例 max(sw/tw, sh/th) + 向上取整    │
//! │      ├─ dimensions    ImageDimensions / ScaleFactor      │
//! │      └─ rs_codec      image + fast_image_resize          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行入口的返回类型 |
//! | [`editing`] | 位图缩放、文件头尺寸探测、有界加载与保存 |

pub mod editing;
pub mod error;

pub use editing::{ImageConfig, ImageDimensions, ImageEditor, ImageError};

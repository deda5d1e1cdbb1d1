//! # 图片编辑工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与子命令分发。
//! 业务逻辑位于 `editing` 模块，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use image_editing::editing::{ImageConfig, ImageDimensions, ImageEditor, ImagePerformanceProfile};
use image_editing::error::AppError;

/// 图片缩放、尺寸探测与有界加载
#[derive(Parser, Debug)]
#[command(name = "image-editing")]
#[command(about = "🖼️ Scale images, read their dimensions, load them into a bounding box")]
struct Args {
    /// 性能档位
    #[arg(long, global = true, default_value = "balanced",
          help = "Resampling profile: quality, balanced, speed")]
    profile: ImagePerformanceProfile,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 只读文件头输出 WIDTHxHEIGHT
    Probe { path: PathBuf },

    /// 装入最大框，已在框内的图片原样输出
    Fit {
        path: PathBuf,
        #[arg(long)]
        max_width: i64,
        #[arg(long)]
        max_height: i64,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// 按目标框计算尺寸并缩放（小图会被放大）
    Scale {
        path: PathBuf,
        #[arg(long)]
        width: i64,
        #[arg(long)]
        height: i64,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// 按倍数或精确尺寸缩放位图
    Resize {
        path: PathBuf,
        #[arg(long, conflicts_with_all = ["width", "height"])]
        factor: Option<f32>,
        #[arg(long, requires = "height")]
        width: Option<i64>,
        #[arg(long, requires = "width")]
        height: Option<i64>,
        /// 关闭平滑，使用最近邻采样
        #[arg(long)]
        no_filter: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 执行失败 [{}]: {err}", err.code());
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let editor = ImageEditor::new(ImageConfig::with_profile(args.profile));
    log::debug!("⚙️ 图片性能档位：{}", args.profile);

    match args.command {
        Command::Probe { path } => {
            let dimensions = editor.get_image_dimensions(&path)?;
            println!("{dimensions}");
        }
        Command::Fit {
            path,
            max_width,
            max_height,
            output,
        } => {
            let bounds = ImageDimensions::from_signed(max_width, max_height)?;
            let bitmap = editor.get_bitmap(&path, bounds.width, bounds.height)?;
            editor.save_bitmap(&bitmap, &output)?;
            println!("{}x{}", bitmap.width(), bitmap.height());
        }
        Command::Scale {
            path,
            width,
            height,
            output,
        } => {
            let target = ImageDimensions::from_signed(width, height)?;
            let bitmap = editor.get_scaled_bitmap(&path, target.width, target.height)?;
            editor.save_bitmap(&bitmap, &output)?;
            println!("{}x{}", bitmap.width(), bitmap.height());
        }
        Command::Resize {
            path,
            factor,
            width,
            height,
            no_filter,
            output,
        } => {
            let source = editor.get_bitmap(&path, u32::MAX, u32::MAX)?;
            let bitmap = match (factor, width, height) {
                (Some(factor), _, _) => editor.scale_bitmap(&source, factor, !no_filter)?,
                (None, Some(width), Some(height)) => {
                    let target = ImageDimensions::from_signed(width, height)?;
                    editor.scale_bitmap_to(&source, target.width, target.height)?
                }
                _ => {
                    return Err(AppError::Usage(
                        "resize 需要 --factor 或同时指定 --width 与 --height".to_string(),
                    ));
                }
            };
            editor.save_bitmap(&bitmap, &output)?;
            println!("{}x{}", bitmap.width(), bitmap.height());
        }
    }

    Ok(())
}

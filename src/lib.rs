//! 基于 MPEG-7 颜色描述符的图片检索
//!
//! 从图片中提取紧凑的数值描述符，并在内存数据库中按描述符距离查找相似图片。

#[cfg(feature = "opencv")]
pub mod cli;
pub mod colorspace;
#[cfg(feature = "opencv")]
pub mod config;
pub mod db;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod grid;
pub mod media;
#[cfg(feature = "opencv")]
pub mod utils;

pub use db::{ListDB, Record, ResultMetadata};
pub use error::{Error, Result};
pub use factory::{AnyDescriptor, DescriptorConfig, DescriptorFactory, DescriptorKind};
pub use media::ColorImage;

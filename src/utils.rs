use std::path::Path;

use anyhow::{Result, anyhow};
use indicatif::ProgressStyle;
use opencv::core::{Mat, Vec3b};
use opencv::imgcodecs;
use opencv::imgproc;
use opencv::prelude::*;

use crate::media::ColorImage;

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .expect("invalid progress bar template")
        .progress_chars("#>-")
}

/// 读取彩色图片，OpenCV 的 BGR 顺序会转换为 RGB
pub fn imread<P: AsRef<Path>>(filename: P) -> Result<ColorImage> {
    let filename = filename.as_ref();
    let bgr = imgcodecs::imread(&filename.to_string_lossy(), imgcodecs::IMREAD_COLOR)?;
    if bgr.empty() {
        return Err(anyhow!("无法读取图片: {}", filename.display()));
    }
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
    mat_to_image(&rgb)
}

fn mat_to_image(mat: &Mat) -> Result<ColorImage> {
    let (width, height) = (mat.cols() as usize, mat.rows() as usize);
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..mat.rows() {
        for x in 0..mat.cols() {
            let p = mat.at_2d::<Vec3b>(y, x)?;
            pixels.push([p[0], p[1], p[2]]);
        }
    }
    Ok(ColorImage::new(width, height, pixels)?)
}

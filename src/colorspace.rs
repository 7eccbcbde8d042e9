use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::media::Rgb;

/// HSV 像素，H 范围 [0, 360]，S、V 范围 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// HMMD 像素，Hue 范围 [0, 360]，Max、Min、Diff 范围 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hmmd {
    pub hue: f32,
    pub max: f32,
    pub min: f32,
    pub diff: f32,
}

fn normalize(rgb: Rgb) -> (f32, f32, f32) {
    (rgb[0] as f32 / 255., rgb[1] as f32 / 255., rgb[2] as f32 / 255.)
}

fn hue(r: f32, g: f32, b: f32, max: f32, diff: f32) -> f32 {
    if diff == 0. {
        0.
    } else if r == max {
        let h = (g - b) / diff * 60.;
        if g >= b { h } else { h + 360. }
    } else if g == max {
        (2. + (b - r) / diff) * 60.
    } else {
        (4. + (r - g) / diff) * 60.
    }
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let (r, g, b) = normalize(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;
    let s = if max == 0. { 0. } else { diff / max };
    Hsv { h: hue(r, g, b, max, diff), s, v: max }
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = hsv.h.clamp(0., 360.);
    let s = hsv.s.clamp(0., 1.);
    let v = hsv.v.clamp(0., 1.);
    let hi = (h / 60.) as u32 % 6;
    let f = h / 60. - (h / 60.).floor();
    let p = v * (1. - s);
    let q = v * (1. - f * s);
    let t = v * (1. - (1. - f) * s);
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [(r * 255.).round() as u8, (g * 255.).round() as u8, (b * 255.).round() as u8]
}

pub fn rgb_to_hmmd(rgb: Rgb) -> Hmmd {
    let (r, g, b) = normalize(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;
    // r 为最大值且 g == b 时结果为 360，与 HSV 不同
    let hue = if diff != 0. && r == max && g - b <= 0. { 60. * (g - b) / diff + 360. } else { hue(r, g, b, max, diff) };
    Hmmd { hue, max, min, diff }
}

/// 主色描述符聚类所用的颜色空间
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorSpace {
    #[default]
    Srgb,
    Hsv,
}

impl ColorSpace {
    /// 第一个分量是否为环形色相
    pub fn has_cyclic_hue(&self) -> bool {
        matches!(self, Self::Hsv)
    }

    /// 转换到该颜色空间，并把每个分量归一化到 [0, 1]
    pub fn normalized(&self, rgb: Rgb) -> [f32; 3] {
        match self {
            Self::Srgb => {
                let (r, g, b) = normalize(rgb);
                [r, g, b]
            }
            Self::Hsv => {
                let hsv = rgb_to_hsv(rgb);
                [hsv.h / 360., hsv.s, hsv.v]
            }
        }
    }

    pub fn to_rgb(&self, color: [f32; 3]) -> Rgb {
        match self {
            Self::Srgb => color.map(|c| (c.clamp(0., 1.) * 255.).round() as u8),
            Self::Hsv => hsv_to_rgb(Hsv { h: color[0] * 360., s: color[1], v: color[2] }),
        }
    }
}

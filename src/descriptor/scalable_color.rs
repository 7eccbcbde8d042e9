use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{ComparatorSlot, Distance, MediaDescriptor};
use crate::colorspace::rgb_to_hsv;
use crate::error::{Error, Result};
use crate::media::ColorImage;

mod tables;

use tables::{HAAR_PAIRS, QUANT_TABLE, SORT_TABLE};

pub const DEFAULT_COEFFICIENTS: usize = 256;
pub const DEFAULT_BITPLANES_DISCARDED: u8 = 0;

const H_BINS: usize = 16;
const S_BINS: usize = 4;
const V_BINS: usize = 4;
const H_SCALE: f32 = 361. / H_BINS as f32;
const S_SCALE: f32 = (1. + 1. / 255.) / S_BINS as f32;
const V_SCALE: f32 = (1. + 1. / 255.) / V_BINS as f32;

/// 11 位直方图的最大值
const BIN_FACTOR: f64 = 2047.;

/// 16x4x4 的 HSV 直方图，按 V、S、H 的嵌套顺序展开
fn hsv_histogram(image: &ColorImage) -> Vec<u32> {
    let mut histogram = vec![0u32; H_BINS * S_BINS * V_BINS];
    for &pixel in image.pixels() {
        let hsv = rgb_to_hsv(pixel);
        let h = ((hsv.h / H_SCALE) as usize).min(H_BINS - 1);
        let s = ((hsv.s / S_SCALE) as usize).min(S_BINS - 1);
        let v = ((hsv.v / V_SCALE) as usize).min(V_BINS - 1);
        histogram[v * S_BINS * H_BINS + s * H_BINS + h] += 1;
    }
    histogram
}

/// 先缩放到 11 位，再按幂律非线性量化到 [0, 15]
fn quantize_histogram(histogram: &[u32]) -> Vec<i32> {
    let total: u64 = histogram.iter().map(|&v| v as u64).sum();
    let max = 40. * BIN_FACTOR / 100.;
    histogram
        .iter()
        .map(|&count| {
            let bin = ((BIN_FACTOR * (count as f64 / total as f64) + 0.49999) as i32).min(BIN_FACTOR as i32) as f64;
            if bin > max { 15 } else { ((15. * (bin / max).powf(0.4) + 0.5) as i32).min(15) }
        })
        .collect()
}

/// 按配对表在 16x16 矩阵上做 Haar 和差变换
fn haar_transform(histogram: &mut [i32]) {
    let mut matrix = Array2::<i32>::zeros((H_BINS, S_BINS * V_BINS));
    for (i, &v) in histogram.iter().enumerate() {
        matrix[[i % H_BINS, i / H_BINS]] = v;
    }
    for i in 0..HAAR_PAIRS[0].len() {
        let p1 = [HAAR_PAIRS[0][i] as usize, HAAR_PAIRS[1][i] as usize];
        let p2 = [HAAR_PAIRS[2][i] as usize, HAAR_PAIRS[3][i] as usize];
        let (a, b) = (matrix[p1], matrix[p2]);
        matrix[p1] = a + b;
        matrix[p2] = b - a;
    }
    for (i, v) in histogram.iter_mut().enumerate() {
        *v = matrix[[i % H_BINS, i / H_BINS]];
    }
}

/// 减去偏置并限制幅值
fn quantize_linear(coefficients: &mut [i32]) {
    for (v, &(bias, _, max)) in coefficients.iter_mut().zip(QUANT_TABLE.iter()) {
        *v = (*v - bias).clamp(-max, max);
    }
}

/// 丢弃低位平面，剩余位数不足 2 的系数只保留符号位
fn discard_bitplanes(coefficients: &mut [i32], discarded: u8) {
    if discarded == 0 {
        return;
    }
    for (v, &(_, bits, _)) in coefficients.iter_mut().zip(QUANT_TABLE.iter()) {
        if (bits as i32) - (discarded as i32) < 2 {
            *v = if *v >= 0 { 1 } else { 0 };
        } else {
            let magnitude = v.abs() >> discarded;
            *v = if *v < 0 { -magnitude } else { magnitude };
        }
    }
}

/// MPEG-7 可伸缩颜色描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalableColorDescriptor {
    nof_coefficients: usize,
    nof_bitplanes_discarded: u8,
    coefficients: Option<Vec<i32>>,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "ScalableColorDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Option<Distance>>,
}

impl ScalableColorDescriptor {
    pub fn new(image: &ColorImage) -> Result<Self> {
        Self::with_params(image, DEFAULT_COEFFICIENTS, DEFAULT_BITPLANES_DISCARDED)
    }

    pub fn with_params(image: &ColorImage, nof_coefficients: usize, nof_bitplanes_discarded: u8) -> Result<Self> {
        let mut descriptor = Self::empty(nof_coefficients, nof_bitplanes_discarded)?;
        descriptor.init(image)?;
        Ok(descriptor)
    }

    /// 没有系数的描述符
    pub fn empty(nof_coefficients: usize, nof_bitplanes_discarded: u8) -> Result<Self> {
        if ![16, 32, 64, 128, 256].contains(&nof_coefficients) {
            return Err(Error::InvalidParameter(format!("number of coefficients must be 16, 32, 64, 128 or 256, got {}", nof_coefficients)));
        }
        if nof_bitplanes_discarded > 8 {
            return Err(Error::InvalidParameter(format!("at most 8 bit planes can be discarded, got {}", nof_bitplanes_discarded)));
        }
        Ok(Self { nof_coefficients, nof_bitplanes_discarded, coefficients: None, source: None, comparator: Self::default_comparator() })
    }

    /// 由符号位和幅值还原系数，幅值长度必须是符号字节数的 8 倍
    pub fn from_signs_and_magnitudes(signs: &[u8], magnitudes: &[u8], nof_bitplanes_discarded: u8) -> Result<Self> {
        if magnitudes.len() != signs.len() * 8 {
            return Err(Error::InvalidParameter(format!("{} magnitudes do not match {} sign bytes", magnitudes.len(), signs.len())));
        }
        let mut descriptor = Self::empty(magnitudes.len(), nof_bitplanes_discarded)?;
        let coefficients = magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| if signs[i / 8] >> (i % 8) & 1 == 1 { -(m as i32) } else { m as i32 })
            .collect();
        descriptor.coefficients = Some(coefficients);
        Ok(descriptor)
    }

    pub fn nof_coefficients(&self) -> usize {
        self.nof_coefficients
    }

    pub fn nof_bitplanes_discarded(&self) -> u8 {
        self.nof_bitplanes_discarded
    }

    pub fn coefficients(&self) -> Option<&[i32]> {
        self.coefficients.as_deref()
    }

    /// 每个字节保存 8 个系数的符号，负数对应的位为 1
    pub fn coefficient_signs(&self) -> Option<Vec<u8>> {
        let coefficients = self.coefficients.as_ref()?;
        Some(
            coefficients
                .chunks(8)
                .map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (j, &v)| if v < 0 { acc | 1 << j } else { acc }))
                .collect(),
        )
    }

    /// 系数的绝对值
    pub fn bit_planes(&self) -> Option<Vec<u8>> {
        Some(self.coefficients.as_ref()?.iter().map(|v| (v.unsigned_abs() & 0xff) as u8).collect())
    }

    fn default_comparator() -> ComparatorSlot<Self, Option<Distance>> {
        ComparatorSlot::new(Arc::new(scalable_color_distance))
    }
}

/// 系数的 L1 距离，系数数量或丢弃的位平面数不同时无法比较
pub fn scalable_color_distance(a: &ScalableColorDescriptor, b: &ScalableColorDescriptor) -> Option<Distance> {
    if a.nof_coefficients != b.nof_coefficients || a.nof_bitplanes_discarded != b.nof_bitplanes_discarded {
        return None;
    }
    let (ca, cb) = (a.coefficients.as_ref()?, b.coefficients.as_ref()?);
    Some(ca.iter().zip(cb).take(a.nof_coefficients).map(|(x, y)| (x - y).abs() as f64).sum())
}

impl MediaDescriptor for ScalableColorDescriptor {
    type Media = ColorImage;
    type Output = Option<Distance>;

    fn init(&mut self, media: &ColorImage) -> Result<()> {
        if media.is_empty() {
            return Err(Error::EmptyMedia);
        }
        let mut histogram = quantize_histogram(&hsv_histogram(media));
        haar_transform(&mut histogram);
        let mut coefficients: Vec<i32> = SORT_TABLE.iter().map(|&i| histogram[i]).collect();
        quantize_linear(&mut coefficients);
        discard_bitplanes(&mut coefficients, self.nof_bitplanes_discarded);
        coefficients.truncate(self.nof_coefficients);
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn source_slot(&mut self) -> &mut Option<ColorImage> {
        &mut self.source
    }

    fn source(&self) -> Option<&ColorImage> {
        self.source.as_ref()
    }

    fn comparator_slot(&self) -> &ComparatorSlot<Self, Option<Distance>> {
        &self.comparator
    }

    fn comparator_slot_mut(&mut self) -> &mut ComparatorSlot<Self, Option<Distance>> {
        &mut self.comparator
    }
}

impl fmt::Display for ScalableColorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScalableColor({}, {}): {:?}", self.nof_coefficients, self.nof_bitplanes_discarded, self.coefficients.as_deref().unwrap_or_default())
    }
}

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{ComparatorSlot, Distance, MediaDescriptor};
use crate::colorspace::rgb_to_hmmd;
use crate::error::{Error, Result};
use crate::media::ColorImage;

pub const DEFAULT_Q_LEVELS: usize = 256;

/// 每种量化级别下各子空间的 (色相分箱数, 和分箱数)
const QUANTIZATION_TABLE: [[(usize, usize); 5]; 4] = [
    [(1, 8), (4, 4), (4, 4), (4, 1), (4, 1)],
    [(1, 8), (4, 4), (4, 4), (8, 2), (8, 1)],
    [(1, 16), (4, 4), (8, 4), (8, 4), (8, 4)],
    [(1, 32), (4, 8), (16, 4), (16, 4), (16, 4)],
];

/// 划分子空间的 Diff 阈值
const DIFF_THRESHOLDS: [f32; 4] = [7. / 255., 21. / 255., 61. / 255., 111. / 255.];

/// 把级别规整到 32、64、128、256 之一
pub fn normalize_levels(q_levels: usize) -> usize {
    match q_levels {
        0..=32 => 32,
        33..=64 => 64,
        65..=128 => 128,
        _ => 256,
    }
}

fn table_offset(q_levels: usize) -> usize {
    q_levels.trailing_zeros() as usize - 5
}

/// 各子空间在直方图中的起始位置
fn subspace_starts(offset: usize) -> [usize; 5] {
    let mut start = [0; 5];
    for i in 1..5 {
        let (h, s) = QUANTIZATION_TABLE[offset][i - 1];
        start[i] = start[i - 1] + h * s;
    }
    start
}

fn subspace(diff: f32) -> usize {
    DIFF_THRESHOLDS.iter().position(|&t| diff < t).unwrap_or(4)
}

/// 把 [0, 1] 的直方图值非线性量化到 [0, 255]，单调不减
pub fn quant_func(x: f64) -> u8 {
    const STEP_IN: [f64; 6] = [0.000000001, 0.037, 0.08, 0.195, 0.32, 1.];
    const STEP_OUT: [i32; 6] = [-1, 0, 25, 45, 80, 115];
    if x <= 0. {
        return 0;
    }
    if x >= 1. {
        return 255;
    }
    let mut y = (((x - 0.32) / (1. - 0.32)) * 140.).round() as i32;
    if let Some(i) = STEP_IN.iter().position(|&s| x < s) {
        y += STEP_OUT[i];
    }
    (255. * (y as f64 + 66.) / (255. + 66.)) as u8
}

/// 把 `histogram` 从 `src_levels` 映射到更少的 `dst_levels`，落入同一目标分箱的值求和
///
/// 目标级别不小于源级别时原样返回。
pub fn resize_histogram(histogram: &[u8], src_levels: usize, dst_levels: usize) -> Vec<u32> {
    if src_levels <= dst_levels {
        return histogram.iter().map(|&v| v as u32).collect();
    }
    let (offset_src, offset_dst) = (table_offset(src_levels), table_offset(dst_levels));
    let (start_src, start_dst) = (subspace_starts(offset_src), subspace_starts(offset_dst));
    let mut dst = vec![0u32; dst_levels];
    for (i, &v) in histogram.iter().enumerate().take(src_levels) {
        let s = (1..5).find(|&s| i < start_src[s]).unwrap_or(5) - 1;
        let (h_src, sum_src) = QUANTIZATION_TABLE[offset_src][s];
        let (h_dst, sum_dst) = QUANTIZATION_TABLE[offset_dst][s];
        let pos = i - start_src[s];
        let hue_bin = h_dst * (pos % h_src) / h_src;
        let sum_bin = sum_dst * (pos / h_src) / sum_src;
        dst[start_dst[s] + h_dst * sum_bin + hue_bin] += v as u32;
    }
    dst
}

/// MPEG-7 颜色结构描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStructureDescriptor {
    q_levels: usize,
    histogram: Option<Vec<u8>>,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "ColorStructureDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Option<Distance>>,
}

impl ColorStructureDescriptor {
    pub fn new(image: &ColorImage) -> Result<Self> {
        Self::with_levels(image, DEFAULT_Q_LEVELS)
    }

    /// `q_levels` 会被向上规整到合法值
    pub fn with_levels(image: &ColorImage, q_levels: usize) -> Result<Self> {
        let mut descriptor = Self::empty(q_levels);
        descriptor.init(image)?;
        Ok(descriptor)
    }

    /// 没有直方图的描述符，与任何描述符都无法比较
    pub fn empty(q_levels: usize) -> Self {
        Self { q_levels: normalize_levels(q_levels), histogram: None, source: None, comparator: Self::default_comparator() }
    }

    /// 由已有的直方图字节构造，长度决定量化级别
    pub fn from_histogram_bytes(bytes: &[u8]) -> Result<Self> {
        let mut descriptor = Self::empty(bytes.len());
        descriptor.set_histogram_bytes(bytes)?;
        Ok(descriptor)
    }

    pub fn q_levels(&self) -> usize {
        self.q_levels
    }

    pub fn histogram(&self) -> Option<&[u8]> {
        self.histogram.as_deref()
    }

    pub fn histogram_bytes(&self) -> Option<Vec<u8>> {
        self.histogram.clone()
    }

    pub fn set_histogram_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if ![32, 64, 128, 256].contains(&bytes.len()) {
            return Err(Error::InvalidParameter(format!("invalid color structure histogram length: {}", bytes.len())));
        }
        self.q_levels = bytes.len();
        self.histogram = Some(bytes.to_vec());
        Ok(())
    }

    fn default_comparator() -> ComparatorSlot<Self, Option<Distance>> {
        ComparatorSlot::new(Arc::new(color_structure_distance))
    }

    fn quantize(&self, image: &ColorImage) -> Array2<u8> {
        let offset = table_offset(self.q_levels);
        let start = subspace_starts(offset);
        Array2::from_shape_fn((image.height(), image.width()), |(y, x)| {
            let hmmd = rgb_to_hmmd(image.pixel(x, y));
            let s = subspace(hmmd.diff);
            let (h, sum) = QUANTIZATION_TABLE[offset][s];
            let hue_bin = ((hmmd.hue / 361.) * h as f32) as usize;
            let sum_bin = (((hmmd.min + hmmd.max) / 2. * sum as f32) as usize).min(sum - 1);
            (start[s] + sum_bin * h + hue_bin) as u8
        })
    }

    /// 结构化直方图：每个窗口位置对窗口中出现过的颜色计数一次
    fn structured_histogram(&self, quantized: &Array2<u8>) -> Vec<f64> {
        let (height, width) = quantized.dim();
        let p = (((height * width) as f64).sqrt().log2() - 7.5).floor().max(0.);
        let k = 2f64.powf(p) as usize;
        let e = 8 * k;
        let mut histogram = vec![0f64; self.q_levels];
        let mut window = vec![false; self.q_levels];
        let mut y = 0;
        while y + e < height {
            let mut x = 0;
            while x + e < width {
                window.iter_mut().for_each(|w| *w = false);
                for yy in (y..y + e).step_by(k) {
                    for xx in (x..x + e).step_by(k) {
                        window[quantized[[yy, xx]] as usize] = true;
                    }
                }
                for (h, &present) in histogram.iter_mut().zip(&window) {
                    if present {
                        *h += 1.;
                    }
                }
                x += k;
            }
            y += k;
        }

        let shift_x = (width as i64 - 1 - e as i64 + k as i64) / k as i64;
        let shift_y = (height as i64 - 1 - e as i64 + k as i64) / k as i64;
        let placements = shift_x * shift_y;
        if placements > 0 {
            histogram.iter_mut().for_each(|h| *h /= placements as f64);
        }
        histogram
    }
}

/// 归一化的 L1 距离，级别不同时把较大的直方图映射到较小的级别
pub fn color_structure_distance(a: &ColorStructureDescriptor, b: &ColorStructureDescriptor) -> Option<Distance> {
    let (ha, hb) = (a.histogram.as_ref()?, b.histogram.as_ref()?);
    let levels = a.q_levels.min(b.q_levels);
    let fa = resize_histogram(ha, a.q_levels, levels);
    let fb = resize_histogram(hb, b.q_levels, levels);
    let sum: u64 = fa.iter().zip(&fb).map(|(&x, &y)| (x as i64 - y as i64).unsigned_abs()).sum();
    Some(sum as f64 / (256 * fa.len()) as f64)
}

impl MediaDescriptor for ColorStructureDescriptor {
    type Media = ColorImage;
    type Output = Option<Distance>;

    fn init(&mut self, media: &ColorImage) -> Result<()> {
        if media.is_empty() {
            return Err(Error::EmptyMedia);
        }
        let quantized = self.quantize(media);
        let histogram = self.structured_histogram(&quantized);
        self.histogram = Some(histogram.into_iter().map(quant_func).collect());
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

impl fmt::Display for ColorStructureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorStructure({}): {:?}", self.q_levels, self.histogram.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripes() -> ColorImage {
        ColorImage::from_fn(64, 48, |x, y| match (x / 8 + y / 8) % 3 {
            0 => [230, 20, 20],
            1 => [20, 180, 40],
            _ => [250, 250, 250],
        })
    }

    #[test]
    fn test_normalize_levels() {
        assert_eq!(normalize_levels(1), 32);
        assert_eq!(normalize_levels(64), 64);
        assert_eq!(normalize_levels(100), 128);
        assert_eq!(normalize_levels(1000), 256);
    }

    #[test]
    fn test_subspace_starts() {
        assert_eq!(subspace_starts(0), [0, 8, 24, 40, 44]);
        assert_eq!(subspace_starts(3), [0, 32, 64, 128, 192]);
    }

    #[test]
    fn test_quant_func_monotone() {
        let mut last = 0;
        for i in 0..=10000 {
            let y = quant_func(i as f64 / 10000.);
            assert!(y >= last, "quant_func not monotone at {}", i);
            last = y;
        }
        assert_eq!(quant_func(-0.5), 0);
        assert_eq!(quant_func(1.), 255);
    }

    #[test]
    fn test_resize_identity() {
        let histogram: Vec<u8> = (0..=255).collect();
        let resized = resize_histogram(&histogram, 256, 256);
        assert_eq!(resized, histogram.iter().map(|&v| v as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_resize_preserves_mass() {
        let histogram = vec![1u8; 256];
        for levels in [32, 64, 128] {
            let resized = resize_histogram(&histogram, 256, levels);
            assert_eq!(resized.len(), levels);
            assert_eq!(resized.iter().sum::<u32>(), 256);
        }
    }

    #[test]
    fn test_identical_images() {
        let a = ColorStructureDescriptor::new(&stripes()).unwrap();
        let b = ColorStructureDescriptor::new(&stripes()).unwrap();
        assert_eq!(a.histogram().unwrap().len(), 256);
        assert_eq!(a.compare(&b).unwrap(), Some(0.));
    }

    #[test]
    fn test_uniform_image_single_bin() {
        let d = ColorStructureDescriptor::with_levels(&ColorImage::filled(32, 32, [255, 255, 255]), 32).unwrap();
        let histogram = d.histogram().unwrap();
        assert_eq!(histogram.iter().filter(|&&v| v == 255).count(), 1);
        assert_eq!(histogram.iter().filter(|&&v| v == 0).count(), 31);
    }

    #[test]
    fn test_small_image_zero_histogram() {
        let d = ColorStructureDescriptor::new(&ColorImage::filled(4, 4, [1, 2, 3])).unwrap();
        assert!(d.histogram().unwrap().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_different_levels() {
        let a = ColorStructureDescriptor::with_levels(&stripes(), 64).unwrap();
        let b = ColorStructureDescriptor::with_levels(&stripes(), 256).unwrap();
        let d = a.compare(&b).unwrap().unwrap();
        assert_eq!(d, b.compare(&a).unwrap().unwrap());
        assert!(d.is_finite());
    }

    #[test]
    fn test_missing_histogram() {
        let a = ColorStructureDescriptor::empty(256);
        let b = ColorStructureDescriptor::new(&stripes()).unwrap();
        assert_eq!(a.compare(&b).unwrap(), None);
        assert_eq!(b.compare(&a).unwrap(), None);
    }

    #[test]
    fn test_histogram_bytes() {
        let b = ColorStructureDescriptor::new(&stripes()).unwrap();
        let copy = ColorStructureDescriptor::from_histogram_bytes(&b.histogram_bytes().unwrap()).unwrap();
        assert_eq!(copy.q_levels(), 256);
        assert_eq!(b.compare(&copy).unwrap(), Some(0.));
        assert!(ColorStructureDescriptor::from_histogram_bytes(&[0; 10]).is_err());
    }
}

use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::{Comparator, ComparatorSlot, Distance, MediaDescriptor};
use crate::colorspace::ColorSpace;
use crate::error::{Error, Result};
use crate::media::{ColorImage, Rgb};

/// 提取前缩放的目标宽度
pub const RESIZE_WIDTH: usize = 200;

/// 单个主色
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColor {
    color: [f32; 3],
    variance: f32,
    percentage: f32,
    spatial_coherence: f32,
}

impl DominantColor {
    pub fn new(color: [f32; 3], percentage: f32) -> Self {
        Self { color, variance: 0., percentage, spatial_coherence: 0. }
    }

    /// 归一化到 [0, 1] 的颜色分量
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// 未计算，总为 0
    pub fn variance(&self) -> f32 {
        self.variance
    }

    /// 未计算，总为 0
    pub fn spatial_coherence(&self) -> f32 {
        self.spatial_coherence
    }

    /// 颜色间的欧氏距离，除以 sqrt(分量数) 后落在 [0, 1]
    pub fn distance(&self, other: &Self) -> f32 {
        color_distance(&self.color, &other.color)
    }
}

fn color_distance(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let sum: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum.sqrt() / (a.len() as f32).sqrt()
}

/// 主色提取参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColorParams {
    /// 新聚类的距离阈值系数
    pub ro: f32,
    /// 聚类最小像素占比，0 表示不过滤
    pub min_percentage: f32,
    pub color_space: ColorSpace,
}

impl Default for DominantColorParams {
    fn default() -> Self {
        Self { ro: 0.3, min_percentage: 0.01, color_space: ColorSpace::Srgb }
    }
}

/// 主色比较策略
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DominantColorPolicy {
    /// 颜色较多的一方的每个颜色都要在另一方中找到近似色
    #[default]
    ContainColors,
    /// 颜色数量必须相同，一一匹配
    SameCount,
    /// 未实现，结果总是无法比较
    AllToAll,
}

/// 带阈值的主色比较器
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantColorComparator {
    pub policy: DominantColorPolicy,
    /// 距离不小于该值的颜色视为未匹配
    pub td: f64,
}

impl Default for DominantColorComparator {
    fn default() -> Self {
        Self { policy: DominantColorPolicy::default(), td: f32::MAX as f64 }
    }
}

impl Comparator<DominantColorDescriptor, Option<Distance>> for DominantColorComparator {
    fn apply(&self, a: &DominantColorDescriptor, b: &DominantColorDescriptor) -> Option<Distance> {
        match self.policy {
            DominantColorPolicy::ContainColors => Some(contain_colors(&a.colors, &b.colors, self.td)),
            DominantColorPolicy::SameCount => Some(same_count(&a.colors, &b.colors, self.td)),
            DominantColorPolicy::AllToAll => None,
        }
    }
}

/// 与 `colors` 中最近颜色的下标和距离
fn nearest(colors: &[DominantColor], c: &DominantColor) -> Option<(usize, f64)> {
    let mut best = None;
    let mut min = f64::MAX;
    for (j, other) in colors.iter().enumerate() {
        let d = c.distance(other) as f64;
        if d < min {
            min = d;
            best = Some(j);
        }
    }
    best.map(|j| (j, min))
}

fn contain_colors(a: &[DominantColor], b: &[DominantColor], td: f64) -> Distance {
    if a.is_empty() && b.is_empty() {
        return 0.;
    }
    let (big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let (mut matched, mut sum) = (0, 0.);
    for c in big {
        let min = nearest(small, c).map_or(f64::MAX, |(_, d)| d);
        if min < td {
            matched += 1;
            sum += min;
        }
    }
    // 无论哪一方颜色更多，都与第一个描述符的颜色数比较
    if matched > 0 && matched == a.len() { sum / matched as f64 } else { 1. }
}

fn same_count(a: &[DominantColor], b: &[DominantColor], td: f64) -> Distance {
    if a.len() != b.len() {
        return 1.;
    }
    if a.is_empty() {
        return 0.;
    }
    let mut taken = vec![false; b.len()];
    let (mut matched, mut sum) = (0, 0.);
    for c in a {
        if let Some((j, min)) = nearest(b, c) {
            if min < td && !taken[j] {
                matched += 1;
                sum += min;
                taken[j] = true;
            }
        }
    }
    if matched == a.len() { sum / matched as f64 } else { 1. }
}

/// MPEG-7 主色描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DominantColorDescriptor {
    params: DominantColorParams,
    colors: Vec<DominantColor>,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "DominantColorDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Option<Distance>>,
}

impl DominantColorDescriptor {
    pub fn new(image: &ColorImage) -> Result<Self> {
        Self::with_params(image, DominantColorParams::default())
    }

    pub fn with_params(image: &ColorImage, params: DominantColorParams) -> Result<Self> {
        let mut descriptor = Self::empty(params);
        descriptor.init(image)?;
        Ok(descriptor)
    }

    /// 尚未计算的描述符
    pub fn empty(params: DominantColorParams) -> Self {
        Self { params, colors: vec![], source: None, comparator: Self::default_comparator() }
    }

    /// 计算主色，`resize` 为真时先把宽度超过 200 的图片等比缩小，返回实际使用的缩小图
    pub fn calculate(&mut self, image: &ColorImage, resize: bool) -> Result<Option<ColorImage>> {
        match image.shrink_to_width(RESIZE_WIDTH).filter(|_| resize) {
            Some(small) => {
                self.init(&small)?;
                Ok(Some(small))
            }
            None => {
                self.init(image)?;
                Ok(None)
            }
        }
    }

    pub fn params(&self) -> &DominantColorParams {
        &self.params
    }

    pub fn dominant_colors(&self) -> &[DominantColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DominantColor> {
        self.colors.get(index)
    }

    /// 主色转换回 RGB
    pub fn rgb(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).map(|c| self.params.color_space.to_rgb(c.color))
    }

    fn default_comparator() -> ComparatorSlot<Self, Option<Distance>> {
        ComparatorSlot::new(Arc::new(DominantColorComparator::default()))
    }
}

impl MediaDescriptor for DominantColorDescriptor {
    type Media = ColorImage;
    type Output = Option<Distance>;

    fn init(&mut self, media: &ColorImage) -> Result<()> {
        self.colors = BatchelorWilkins::new(media, &self.params)?.run();
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

impl fmt::Display for DominantColorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DominantColor: {} colors", self.colors.len())?;
        for i in 0..self.colors.len() {
            if let Some(rgb) = self.rgb(i) {
                write!(f, " [{}, {}, {}]({:.3})", rgb[0], rgb[1], rgb[2], self.colors[i].percentage)?;
            }
        }
        Ok(())
    }
}

/// Batchelor-Wilkins 顺序聚类
///
/// 像素按列优先顺序访问，距离相同时取先访问到的像素。
struct BatchelorWilkins<'a> {
    params: &'a DominantColorParams,
    pixels: Vec<[f32; 3]>,
    /// 作为聚类种子的像素及其聚类下标
    seed: Vec<Option<usize>>,
    /// 未分配像素当前最近的聚类
    nearest: Vec<usize>,
    centers: Vec<[f32; 3]>,
}

impl<'a> BatchelorWilkins<'a> {
    fn new(image: &ColorImage, params: &'a DominantColorParams) -> Result<Self> {
        if image.is_empty() {
            return Err(Error::EmptyMedia);
        }
        let cs = params.color_space;
        let pixels: Vec<_> =
            (0..image.width()).flat_map(|x| (0..image.height()).map(move |y| (x, y))).map(|(x, y)| cs.normalized(image.pixel(x, y))).collect();
        let n = pixels.len();
        Ok(Self { params, pixels, seed: vec![None; n], nearest: vec![0; n], centers: vec![] })
    }

    fn run(mut self) -> Vec<DominantColor> {
        self.add_center(0);
        if let Some((m, _)) = self.most_different() {
            self.add_center(m);
            loop {
                for i in 0..self.pixels.len() {
                    if self.seed[i].is_none() {
                        self.nearest[i] = closest(&self.centers, &self.pixels[i]);
                    }
                }
                match self.most_different() {
                    Some((m, d)) if d > self.threshold() => self.add_center(m),
                    _ => break,
                }
            }
        }
        let labels = self.group();
        self.centroids(&labels)
    }

    fn add_center(&mut self, i: usize) {
        self.seed[i] = Some(self.centers.len());
        self.centers.push(self.pixels[i]);
    }

    /// 离自己所属聚类最远的未分配像素
    fn most_different(&self) -> Option<(usize, f32)> {
        let mut best = None;
        let mut max = -1.;
        for (i, p) in self.pixels.iter().enumerate() {
            if self.seed[i].is_none() {
                let d = color_distance(&self.centers[self.nearest[i]], p);
                if d > max {
                    max = d;
                    best = Some(i);
                }
            }
        }
        best.map(|i| (i, max))
    }

    /// ro 乘以相邻聚类中心的平均距离
    fn threshold(&self) -> f32 {
        let sum: f32 = self.centers.windows(2).map(|w| color_distance(&w[0], &w[1])).sum();
        self.params.ro * (sum / (self.centers.len() - 1) as f32)
    }

    fn group(&mut self) -> Vec<usize> {
        let total = self.pixels.len() as f64;
        if self.params.min_percentage != 0. {
            let mut counts = vec![0usize; self.centers.len()];
            for (i, p) in self.pixels.iter().enumerate() {
                if self.seed[i].is_none() {
                    counts[closest(&self.centers, p)] += 1;
                }
            }
            let min = self.params.min_percentage as f64;
            let kept: Vec<_> = self.centers.iter().zip(&counts).filter(|&(_, &n)| n as f64 / total >= min).map(|(c, _)| *c).collect();
            // 全部被过滤时保留原有聚类
            if !kept.is_empty() {
                self.centers = kept;
            }
            self.pixels.iter().map(|p| closest(&self.centers, p)).collect()
        } else {
            self.pixels.iter().enumerate().map(|(i, p)| self.seed[i].unwrap_or_else(|| closest(&self.centers, p))).collect()
        }
    }

    fn centroids(&self, labels: &[usize]) -> Vec<DominantColor> {
        let k = self.centers.len();
        let mut sum = vec![[0f32; 3]; k];
        let mut angle = vec![[0f32; 2]; k];
        let mut num = vec![0usize; k];
        let cyclic = self.params.color_space.has_cyclic_hue();
        for (p, &l) in self.pixels.iter().zip(labels) {
            if cyclic {
                angle[l][0] += (p[0] * 2. * PI).sin();
                angle[l][1] += (p[0] * 2. * PI).cos();
            }
            for c in 0..3 {
                sum[l][c] += p[c];
            }
            num[l] += 1;
        }

        let total = self.pixels.len() as f32;
        (0..k)
            .filter(|&i| num[i] > 0)
            .map(|i| {
                let n = num[i] as f32;
                let mut color = sum[i].map(|s| s / n);
                if cyclic {
                    let a = (angle[i][0] / n).atan2(angle[i][1] / n);
                    color[0] = a.rem_euclid(2. * PI) / (2. * PI);
                }
                DominantColor::new(color, n / total)
            })
            .collect()
    }
}

fn closest(centers: &[[f32; 3]], p: &[f32; 3]) -> usize {
    let mut best = 0;
    let mut min = f32::MAX;
    for (i, c) in centers.iter().enumerate() {
        let d = color_distance(c, p);
        if d < min {
            min = d;
            best = i;
        }
    }
    best
}

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ComparatorSlot, Distance, MediaDescriptor};
use crate::error::{Error, Result};
use crate::media::{ColorImage, Rgb};

/// 单色描述符：图片所有像素的平均颜色
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleColorDescriptor {
    color: Rgb,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "SingleColorDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Distance>,
}

impl SingleColorDescriptor {
    pub fn new(image: &ColorImage) -> Result<Self> {
        let mut descriptor = Self::from_color([0, 0, 0]);
        descriptor.init(image)?;
        Ok(descriptor)
    }

    /// 直接由颜色构造，不关联任何图片
    pub fn from_color(color: Rgb) -> Self {
        Self { color, source: None, comparator: Self::default_comparator() }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    fn default_comparator() -> ComparatorSlot<Self, Distance> {
        ComparatorSlot::new(Arc::new(euclidean))
    }
}

/// RGB 均值之间的欧氏距离
pub fn euclidean(a: &SingleColorDescriptor, b: &SingleColorDescriptor) -> Distance {
    a.color.iter().zip(&b.color).map(|(&x, &y)| (x as f64 - y as f64).powi(2)).sum::<f64>().sqrt()
}

fn mean(image: &ColorImage) -> Result<Rgb> {
    if image.is_empty() {
        return Err(Error::EmptyMedia);
    }
    let mut sum = [0u64; 3];
    for pixel in image.pixels() {
        for c in 0..3 {
            sum[c] += pixel[c] as u64;
        }
    }
    let n = image.len() as u64;
    Ok(sum.map(|s| (s / n) as u8))
}

impl MediaDescriptor for SingleColorDescriptor {
    type Media = ColorImage;
    type Output = Distance;

    fn init(&mut self, media: &ColorImage) -> Result<()> {
        self.color = mean(media)?;
        Ok(())
    }

    fn source_slot(&mut self) -> &mut Option<ColorImage> {
        &mut self.source
    }

    fn source(&self) -> Option<&ColorImage> {
        self.source.as_ref()
    }

    fn comparator_slot(&self) -> &ComparatorSlot<Self, Distance> {
        &self.comparator
    }

    fn comparator_slot_mut(&mut self) -> &mut ComparatorSlot<Self, Distance> {
        &mut self.comparator
    }
}

impl fmt::Display for SingleColorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SingleColor: [{}, {}, {}]", self.color[0], self.color[1], self.color[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_truncates() {
        let img = ColorImage::new(2, 1, vec![[0, 10, 255], [1, 11, 254]]).unwrap();
        let d = SingleColorDescriptor::new(&img).unwrap();
        assert_eq!(d.color(), [0, 10, 254]);
        assert!(d.source().is_none());
    }

    #[test]
    fn test_empty_image() {
        let img = ColorImage::filled(0, 0, [0, 0, 0]);
        assert!(matches!(SingleColorDescriptor::new(&img), Err(Error::EmptyMedia)));
    }

    #[test]
    fn test_compare_symmetric() {
        let a = SingleColorDescriptor::from_color([255, 0, 0]);
        let b = SingleColorDescriptor::from_color([0, 255, 0]);
        let d1 = a.compare(&b).unwrap();
        let d2 = b.compare(&a).unwrap();
        assert_eq!(d1, d2);
        assert!((d1 - 255. * 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(a.compare(&a).unwrap(), 0.);
    }

    #[test]
    fn test_set_source_reinit() {
        let mut d = SingleColorDescriptor::from_color([0, 0, 0]);
        d.set_source(ColorImage::filled(3, 3, [9, 8, 7])).unwrap();
        assert_eq!(d.color(), [9, 8, 7]);
        assert!(d.source().is_some());
        d.drop_source();
        assert!(d.source().is_none());
        assert_eq!(d.color(), [9, 8, 7]);
    }

    #[test]
    fn test_missing_comparator() {
        let mut d = SingleColorDescriptor::from_color([0, 0, 0]);
        d.set_comparator(None);
        assert!(matches!(d.compare(&d.clone()), Err(Error::MissingComparator)));
        d.set_comparator(Some(Arc::new(|_: &SingleColorDescriptor, _: &SingleColorDescriptor| 42.)));
        assert_eq!(d.compare(&d.clone()).unwrap(), 42.);
    }
}

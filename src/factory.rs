use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::descriptor::*;
use crate::error::{Error, Result};
use crate::grid::SquareGrid;
use crate::media::ColorImage;

/// 描述符类型
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorKind {
    /// 平均颜色
    SingleColor,
    /// MPEG-7 主色
    DominantColor,
    /// MPEG-7 颜色结构
    ColorStructure,
    /// MPEG-7 可伸缩颜色
    ScalableColor,
    /// 分类标签
    Label,
    /// 网格，每个格子使用同一种描述符
    Gridded,
}

impl DescriptorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleColor => "single-color",
            Self::DominantColor => "dominant-color",
            Self::ColorStructure => "color-structure",
            Self::ScalableColor => "scalable-color",
            Self::Label => "label",
            Self::Gridded => "gridded",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DescriptorKind {
    type Err = Error;

    /// 忽略大小写，`-` 和 `_` 可以省略
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_ascii_lowercase().replace(['-', '_'], "");
        Self::value_variants()
            .iter()
            .find(|kind| kind.name().replace('-', "") == normalized)
            .copied()
            .ok_or_else(|| Error::UnsupportedDescriptorKind(s.to_string()))
    }
}

/// 创建描述符时使用的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorConfig {
    pub dominant_color: DominantColorParams,
    pub dominant_color_comparator: DominantColorComparator,
    /// 提取主色前是否把图片缩小到宽 200
    pub dominant_color_resize: bool,
    pub color_structure_levels: usize,
    pub scalable_color_coefficients: usize,
    pub scalable_color_bitplanes_discarded: u8,
    /// 网格的 (列数, 行数)
    pub grid_size: (usize, usize),
    pub grid_tile_kind: DescriptorKind,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            dominant_color: DominantColorParams::default(),
            dominant_color_comparator: DominantColorComparator::default(),
            dominant_color_resize: false,
            color_structure_levels: DEFAULT_Q_LEVELS,
            scalable_color_coefficients: DEFAULT_COEFFICIENTS,
            scalable_color_bitplanes_discarded: DEFAULT_BITPLANES_DISCARDED,
            grid_size: DEFAULT_GRID_SIZE,
            grid_tile_kind: DEFAULT_TILE_KIND,
        }
    }
}

/// 根据 [`DescriptorKind`] 创建描述符
#[derive(Debug, Clone)]
pub struct DescriptorFactory {
    config: DescriptorConfig,
    classifier: SharedClassifier<ColorImage>,
}

impl Default for DescriptorFactory {
    fn default() -> Self {
        Self::new(DescriptorConfig::default())
    }
}

impl DescriptorFactory {
    pub fn new(config: DescriptorConfig) -> Self {
        Self { config, classifier: Arc::new(TypeNameClassifier) }
    }

    pub fn with_classifier(config: DescriptorConfig, classifier: SharedClassifier<ColorImage>) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &DescriptorConfig {
        &self.config
    }

    pub fn classifier(&self) -> &SharedClassifier<ColorImage> {
        &self.classifier
    }

    pub fn create(&self, kind: DescriptorKind, image: &ColorImage) -> Result<AnyDescriptor> {
        let config = &self.config;
        let descriptor = match kind {
            DescriptorKind::SingleColor => SingleColorDescriptor::new(image)?.into(),
            DescriptorKind::DominantColor => {
                let mut descriptor = DominantColorDescriptor::empty(config.dominant_color);
                descriptor.calculate(image, config.dominant_color_resize)?;
                descriptor.set_comparator(Some(Arc::new(config.dominant_color_comparator)));
                descriptor.into()
            }
            DescriptorKind::ColorStructure => ColorStructureDescriptor::with_levels(image, config.color_structure_levels)?.into(),
            DescriptorKind::ScalableColor => ScalableColorDescriptor::with_params(
                image,
                config.scalable_color_coefficients,
                config.scalable_color_bitplanes_discarded,
            )?
            .into(),
            DescriptorKind::Label => LabelDescriptor::with_classifier(image, self.classifier.clone())?.into(),
            DescriptorKind::Gridded => {
                let (columns, rows) = config.grid_size;
                let grid = SquareGrid::from_grid_size(image, columns, rows);
                GriddedDescriptor::with_grid(image, grid, config.grid_tile_kind, self.clone())?.into()
            }
        };
        Ok(descriptor)
    }

    /// 按顺序创建一组描述符
    pub fn create_list(&self, kinds: &[DescriptorKind], image: &ColorImage) -> Result<DescriptorList> {
        let descriptors = kinds.iter().map(|&kind| self.create(kind, image)).collect::<Result<Vec<_>>>()?;
        Ok(DescriptorList::from_descriptors(descriptors))
    }

    /// 反序列化后比较器和分类器都是默认值，这里按当前配置重新设置
    pub fn restore_comparators(&self, list: &mut DescriptorList) {
        for descriptor in list.iter_mut() {
            self.restore(descriptor);
        }
    }

    fn restore(&self, descriptor: &mut AnyDescriptor) {
        match descriptor {
            AnyDescriptor::DominantColor(d) => d.set_comparator(Some(Arc::new(self.config.dominant_color_comparator))),
            AnyDescriptor::Label(d) => {
                d.set_classifier(self.classifier.clone());
                d.reset_comparator();
            }
            AnyDescriptor::Gridded(d) => {
                d.set_factory(self.clone());
                for tile in d.tiles_mut() {
                    self.restore(tile);
                }
            }
            _ => {}
        }
    }
}

/// 任意一种描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnyDescriptor {
    SingleColor(SingleColorDescriptor),
    DominantColor(DominantColorDescriptor),
    ColorStructure(ColorStructureDescriptor),
    ScalableColor(ScalableColorDescriptor),
    Label(LabelDescriptor),
    Gridded(GriddedDescriptor),
}

impl AnyDescriptor {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::SingleColor(_) => DescriptorKind::SingleColor,
            Self::DominantColor(_) => DescriptorKind::DominantColor,
            Self::ColorStructure(_) => DescriptorKind::ColorStructure,
            Self::ScalableColor(_) => DescriptorKind::ScalableColor,
            Self::Label(_) => DescriptorKind::Label,
            Self::Gridded(_) => DescriptorKind::Gridded,
        }
    }

    /// 比较两个描述符，类型不同或者参数不兼容时返回 `None`
    pub fn compare(&self, other: &Self) -> Result<Option<Distance>> {
        match (self, other) {
            (Self::SingleColor(a), Self::SingleColor(b)) => a.compare(b).map(Some),
            (Self::DominantColor(a), Self::DominantColor(b)) => a.compare(b),
            (Self::ColorStructure(a), Self::ColorStructure(b)) => a.compare(b),
            (Self::ScalableColor(a), Self::ScalableColor(b)) => a.compare(b),
            (Self::Label(a), Self::Label(b)) => a.compare(b).map(Some),
            (Self::Gridded(a), Self::Gridded(b)) => a.compare(b)?.map(Some),
            _ => Ok(None),
        }
    }

    /// 与 [`compare`](Self::compare) 相同，但无法比较时返回 `f64::INFINITY`
    pub fn distance(&self, other: &Self) -> Result<Distance> {
        Ok(self.compare(other)?.unwrap_or(f64::INFINITY))
    }

    /// 在新媒体上重新计算
    pub fn init(&mut self, media: &ColorImage) -> Result<()> {
        match self {
            Self::SingleColor(d) => d.init(media),
            Self::DominantColor(d) => d.init(media),
            Self::ColorStructure(d) => d.init(media),
            Self::ScalableColor(d) => d.init(media),
            Self::Label(d) => d.init(media),
            Self::Gridded(d) => d.init(media),
        }
    }
}

macro_rules! impl_from_descriptor {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AnyDescriptor {
                fn from(descriptor: $ty) -> Self {
                    Self::$variant(descriptor)
                }
            }
        )*
    };
}

impl_from_descriptor! {
    SingleColor => SingleColorDescriptor,
    DominantColor => DominantColorDescriptor,
    ColorStructure => ColorStructureDescriptor,
    ScalableColor => ScalableColorDescriptor,
    Label => LabelDescriptor,
    Gridded => GriddedDescriptor,
}

impl fmt::Display for AnyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleColor(d) => fmt::Display::fmt(d, f),
            Self::DominantColor(d) => fmt::Display::fmt(d, f),
            Self::ColorStructure(d) => fmt::Display::fmt(d, f),
            Self::ScalableColor(d) => fmt::Display::fmt(d, f),
            Self::Label(d) => fmt::Display::fmt(d, f),
            Self::Gridded(d) => fmt::Display::fmt(d, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("scalable-color".parse::<DescriptorKind>().unwrap(), DescriptorKind::ScalableColor);
        assert_eq!("DominantColor".parse::<DescriptorKind>().unwrap(), DescriptorKind::DominantColor);
        assert_eq!("color_structure".parse::<DescriptorKind>().unwrap(), DescriptorKind::ColorStructure);
        assert!(matches!("edge-histogram".parse::<DescriptorKind>(), Err(Error::UnsupportedDescriptorKind(s)) if s == "edge-histogram"));
        assert_eq!(DescriptorKind::Label.to_string(), "label");
    }

    #[test]
    fn test_create_every_kind() {
        let img = ColorImage::from_fn(32, 32, |x, y| [(x * 8) as u8, (y * 8) as u8, 128]);
        let factory = DescriptorFactory::default();
        for &kind in DescriptorKind::value_variants() {
            let d = factory.create(kind, &img).unwrap();
            assert_eq!(d.kind(), kind);
            assert_eq!(d.distance(&d.clone()).unwrap(), 0., "{}", kind);
        }
    }

    #[test]
    fn test_kind_mismatch() {
        let img = ColorImage::filled(8, 8, [1, 2, 3]);
        let factory = DescriptorFactory::default();
        let a = factory.create(DescriptorKind::SingleColor, &img).unwrap();
        let b = factory.create(DescriptorKind::ColorStructure, &img).unwrap();
        assert_eq!(a.compare(&b).unwrap(), None);
        assert_eq!(a.distance(&b).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_config_is_applied() {
        let img = ColorImage::filled(8, 8, [1, 2, 3]);
        let config = DescriptorConfig { scalable_color_coefficients: 64, color_structure_levels: 100, ..Default::default() };
        let factory = DescriptorFactory::new(config);
        let list = factory.create_list(&[DescriptorKind::ScalableColor, DescriptorKind::ColorStructure], &img).unwrap();
        match (list.get(0), list.get(1)) {
            (Some(AnyDescriptor::ScalableColor(scd)), Some(AnyDescriptor::ColorStructure(csd))) => {
                assert_eq!(scd.nof_coefficients(), 64);
                assert_eq!(csd.q_levels(), 128);
            }
            other => panic!("unexpected descriptors: {:?}", other),
        }
    }

    #[test]
    fn test_gridded_tile_kind_rejected() {
        let img = ColorImage::filled(8, 8, [1, 2, 3]);
        let config = DescriptorConfig { grid_tile_kind: DescriptorKind::Gridded, ..Default::default() };
        assert!(matches!(DescriptorFactory::new(config).create(DescriptorKind::Gridded, &img), Err(Error::InvalidParameter(_))));
    }
}

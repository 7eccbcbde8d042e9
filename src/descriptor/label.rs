use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Comparator, ComparatorSlot, Distance, MediaDescriptor};
use crate::error::{Error, Result};
use crate::media::ColorImage;

/// 分类结果，`weights` 存在时与 `labels` 一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledClassification {
    pub labels: Vec<String>,
    pub weights: Option<Vec<f64>>,
}

/// 给媒体打标签的分类器
pub trait Classifier<M>: Send + Sync + fmt::Debug {
    fn classify(&self, media: &M) -> LabeledClassification;
}

pub type SharedClassifier<M> = Arc<dyn Classifier<M>>;

/// 默认分类器：以媒体的类型名作为唯一标签
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeNameClassifier;

impl<M> Classifier<M> for TypeNameClassifier {
    fn classify(&self, _media: &M) -> LabeledClassification {
        let name = std::any::type_name::<M>();
        let name = name.rsplit("::").next().unwrap_or(name);
        LabeledClassification { labels: vec![name.to_string()], weights: None }
    }
}

/// 权重距离的聚合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightAggregation {
    Max,
    Min,
    Mean,
    Euclidean,
}

/// 标签比较器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelComparator {
    /// 第一个描述符的标签全部出现在第二个中时为 0，否则为无穷大
    #[default]
    Inclusion,
    /// 标签集合相同时为 0
    Equal,
    /// 任一方包含另一方时为 0
    SoftEqual,
    /// 对共同标签的权重差进行聚合，`only_inclusion` 为假时要求标签数量相同
    WeightBased { aggregation: WeightAggregation, only_inclusion: bool },
}

impl LabelComparator {
    /// 带权重描述符的默认比较器
    pub const WEIGHTED: Self = Self::WeightBased { aggregation: WeightAggregation::Min, only_inclusion: true };
}

fn to_distance(included: bool) -> Distance {
    if included { 0. } else { f64::INFINITY }
}

impl Comparator<LabelDescriptor, Distance> for LabelComparator {
    fn apply(&self, t: &LabelDescriptor, u: &LabelDescriptor) -> Distance {
        match *self {
            Self::Inclusion => to_distance(t.is_included(u)),
            Self::Equal => to_distance(t.len() == u.len() && t.is_included(u) && u.is_included(t)),
            Self::SoftEqual => to_distance(t.is_included(u) || u.is_included(t)),
            Self::WeightBased { aggregation, only_inclusion } => {
                if !only_inclusion && t.len() != u.len() {
                    return f64::INFINITY;
                }
                t.inclusion_distance(u, aggregation)
            }
        }
    }
}

/// 标签描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDescriptor {
    labels: Vec<String>,
    weights: Option<Vec<f64>>,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "LabelDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Distance>,
    #[serde(skip, default = "LabelDescriptor::default_classifier")]
    classifier: SharedClassifier<ColorImage>,
}

impl LabelDescriptor {
    /// 使用默认分类器
    pub fn new(image: &ColorImage) -> Result<Self> {
        Self::with_classifier(image, Self::default_classifier())
    }

    pub fn with_classifier(image: &ColorImage, classifier: SharedClassifier<ColorImage>) -> Result<Self> {
        let mut descriptor = Self::from_labels(Vec::<String>::new());
        descriptor.classifier = classifier;
        descriptor.init(image)?;
        Ok(descriptor)
    }

    /// 直接由标签构造，不关联图片
    pub fn from_labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            weights: None,
            source: None,
            comparator: Self::default_comparator(),
            classifier: Self::default_classifier(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.as_ref()?.get(index).copied()
    }

    pub fn weight_of(&self, label: &str) -> Option<f64> {
        let index = self.labels.iter().position(|l| l == label)?;
        self.weight(index)
    }

    /// 设置权重，数量必须与标签数量相同
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.labels.len() {
            return Err(Error::InvalidParameter(format!("the number of weights must be {}", self.labels.len())));
        }
        self.weights = Some(weights);
        Ok(())
    }

    pub fn classifier(&self) -> &SharedClassifier<ColorImage> {
        &self.classifier
    }

    /// 替换分类器，不会重新计算标签
    pub fn set_classifier(&mut self, classifier: SharedClassifier<ColorImage>) {
        self.classifier = classifier;
    }

    /// 恢复默认比较器，带权重时使用 [`LabelComparator::WEIGHTED`]
    pub fn reset_comparator(&mut self) {
        let comparator = if self.is_weighted() { LabelComparator::WEIGHTED } else { LabelComparator::default() };
        self.comparator.set(Some(Arc::new(comparator)));
    }

    /// 自身的每个标签都出现在 `other` 中（忽略大小写），没有标签时总是成立
    pub fn is_included(&self, other: &Self) -> bool {
        self.labels.iter().all(|l| other.position_ignore_case(l).is_some())
    }

    /// 至少有一个标签出现在 `other` 中，没有标签时总是成立
    pub fn is_soft_included(&self, other: &Self) -> bool {
        self.labels.is_empty() || self.labels.iter().any(|l| other.position_ignore_case(l).is_some())
    }

    fn position_ignore_case(&self, label: &str) -> Option<usize> {
        let label = label.to_lowercase();
        self.labels.iter().position(|l| l.to_lowercase() == label)
    }

    /// 有标签缺失或任意一方没有权重时为无穷大
    fn inclusion_distance(&self, other: &Self, aggregation: WeightAggregation) -> Distance {
        let mut dist: Option<f64> = None;
        for (i, label) in self.labels.iter().enumerate() {
            let Some(j) = other.position_ignore_case(label) else {
                return f64::INFINITY;
            };
            let (Some(wi), Some(wj)) = (self.weight(i), other.weight(j)) else {
                return f64::INFINITY;
            };
            let d = (wi - wj).abs();
            dist = Some(match (dist, aggregation) {
                (None, WeightAggregation::Euclidean) => d * d,
                (None, _) => d,
                (Some(acc), WeightAggregation::Max) => acc.max(d),
                (Some(acc), WeightAggregation::Min) => acc.min(d),
                (Some(acc), WeightAggregation::Mean) => acc + d,
                (Some(acc), WeightAggregation::Euclidean) => acc + d * d,
            });
        }
        let dist = dist.unwrap_or(0.);
        match aggregation {
            WeightAggregation::Mean if !self.is_empty() => dist / self.len() as f64,
            WeightAggregation::Euclidean => dist.sqrt(),
            _ => dist,
        }
    }

    fn default_comparator() -> ComparatorSlot<Self, Distance> {
        ComparatorSlot::new(Arc::new(LabelComparator::default()))
    }

    fn default_classifier() -> SharedClassifier<ColorImage> {
        Arc::new(TypeNameClassifier)
    }
}

impl MediaDescriptor for LabelDescriptor {
    type Media = ColorImage;
    type Output = Distance;

    fn init(&mut self, media: &ColorImage) -> Result<()> {
        let classification = self.classifier.classify(media);
        if let Some(weights) = &classification.weights {
            if weights.len() != classification.labels.len() {
                return Err(Error::InvalidParameter(format!(
                    "classifier returned {} weights for {} labels",
                    weights.len(),
                    classification.labels.len()
                )));
            }
            self.comparator.set(Some(Arc::new(LabelComparator::WEIGHTED)));
        }
        self.labels = classification.labels;
        self.weights = classification.weights;
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

impl fmt::Display for LabelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.weights {
            None => write!(f, "Label: {:?}", self.labels),
            Some(weights) => {
                write!(f, "Label: [")?;
                for (label, weight) in self.labels.iter().zip(weights) {
                    write!(f, "({}, {})", label, weight)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(LabeledClassification);

    impl Classifier<ColorImage> for Fixed {
        fn classify(&self, _media: &ColorImage) -> LabeledClassification {
            self.0.clone()
        }
    }

    fn weighted(labels: &[&str], weights: &[f64]) -> LabelDescriptor {
        let mut d = LabelDescriptor::from_labels(labels.iter().copied());
        d.set_weights(weights.to_vec()).unwrap();
        d.reset_comparator();
        d
    }

    #[test]
    fn test_default_classifier() {
        let d = LabelDescriptor::new(&ColorImage::filled(2, 2, [0, 0, 0])).unwrap();
        assert_eq!(d.labels(), &["ColorImage".to_string()]);
        assert!(!d.is_weighted());
    }

    #[test]
    fn test_inclusion() {
        let a = LabelDescriptor::from_labels(["Cat"]);
        let b = LabelDescriptor::from_labels(["dog", "cat"]);
        assert_eq!(a.compare(&b).unwrap(), 0.);
        assert_eq!(b.compare(&a).unwrap(), f64::INFINITY);
        let empty = LabelDescriptor::from_labels(Vec::<String>::new());
        assert_eq!(empty.compare(&a).unwrap(), 0.);
    }

    #[test]
    fn test_equal_and_soft_equal() {
        let a = LabelDescriptor::from_labels(["cat", "dog"]);
        let b = LabelDescriptor::from_labels(["DOG", "cat"]);
        let c = LabelDescriptor::from_labels(["cat"]);
        assert_eq!(LabelComparator::Equal.apply(&a, &b), 0.);
        assert_eq!(LabelComparator::Equal.apply(&a, &c), f64::INFINITY);
        assert_eq!(LabelComparator::SoftEqual.apply(&a, &c), 0.);
        assert_eq!(LabelComparator::SoftEqual.apply(&c, &a), 0.);
        assert!(c.is_soft_included(&a));
    }

    #[test]
    fn test_weight_based() {
        let a = weighted(&["cat", "dog"], &[0.9, 0.2]);
        let b = weighted(&["dog", "cat", "bird"], &[0.5, 0.6, 0.1]);
        let cmp = |aggregation, only_inclusion| LabelComparator::WeightBased { aggregation, only_inclusion };
        assert!((a.compare(&b).unwrap() - 0.3).abs() < 1e-9);
        assert!((cmp(WeightAggregation::Max, true).apply(&a, &b) - 0.3).abs() < 1e-9);
        assert!((cmp(WeightAggregation::Mean, true).apply(&a, &b) - 0.3).abs() < 1e-9);
        assert!((cmp(WeightAggregation::Euclidean, true).apply(&a, &b) - 0.18f64.sqrt()).abs() < 1e-9);
        assert_eq!(cmp(WeightAggregation::Min, false).apply(&a, &b), f64::INFINITY);
        assert_eq!(b.compare(&a).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_weighted_classifier_switches_comparator() {
        let classification = LabeledClassification { labels: vec!["sky".into(), "sea".into()], weights: Some(vec![0.7, 0.3]) };
        let classifier: SharedClassifier<ColorImage> = Arc::new(Fixed(classification));
        let img = ColorImage::filled(1, 1, [0, 0, 255]);
        let a = LabelDescriptor::with_classifier(&img, classifier.clone()).unwrap();
        assert!(a.is_weighted());
        assert_eq!(a.weight_of("sea"), Some(0.3));
        let b = weighted(&["sea", "sky"], &[0.2, 0.7]);
        assert!(a.compare(&b).unwrap() < 1e-9);
    }

    #[test]
    fn test_set_weights_length() {
        let mut d = LabelDescriptor::from_labels(["a", "b"]);
        assert!(d.set_weights(vec![1.]).is_err());
    }
}

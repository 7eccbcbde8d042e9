use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ComparatorSlot, Distance, MediaDescriptor, euclidean_norm};
use crate::error::{Error, Result};
use crate::factory::{AnyDescriptor, DescriptorKind};
use crate::media::ColorImage;

/// 逐位置比较两组描述符，返回子距离的欧氏范数
///
/// 长度不同时返回 [`Error::LengthMismatch`]，某个位置无法比较时返回 [`Error::NotComparable`]。
pub fn aggregate_distance(a: &[AnyDescriptor], b: &[AnyDescriptor]) -> Result<Distance> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch { left: a.len(), right: b.len() });
    }
    let distances = a
        .iter()
        .zip(b)
        .enumerate()
        .map(|(position, (x, y))| x.compare(y)?.ok_or(Error::NotComparable { position }))
        .collect::<Result<Vec<_>>>()?;
    Ok(euclidean_norm(distances))
}

/// 同一媒体上的一组异构描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorList {
    descriptors: Vec<AnyDescriptor>,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "DescriptorList::default_comparator")]
    comparator: ComparatorSlot<Self, Result<Distance>>,
}

impl DescriptorList {
    pub fn new() -> Self {
        Self::from_descriptors(vec![])
    }

    pub fn from_descriptors(descriptors: Vec<AnyDescriptor>) -> Self {
        Self { descriptors, source: None, comparator: Self::default_comparator() }
    }

    pub fn push(&mut self, descriptor: impl Into<AnyDescriptor>) {
        self.descriptors.push(descriptor.into());
    }

    pub fn insert(&mut self, index: usize, descriptor: impl Into<AnyDescriptor>) -> Result<()> {
        if index > self.descriptors.len() {
            return Err(Error::OutOfRange { index, len: self.descriptors.len() });
        }
        self.descriptors.insert(index, descriptor.into());
        Ok(())
    }

    /// 替换指定位置的描述符，返回旧值
    pub fn set(&mut self, index: usize, descriptor: impl Into<AnyDescriptor>) -> Result<AnyDescriptor> {
        let len = self.descriptors.len();
        let slot = self.descriptors.get_mut(index).ok_or(Error::OutOfRange { index, len })?;
        Ok(std::mem::replace(slot, descriptor.into()))
    }

    pub fn get(&self, index: usize) -> Option<&AnyDescriptor> {
        self.descriptors.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Result<AnyDescriptor> {
        if index >= self.descriptors.len() {
            return Err(Error::OutOfRange { index, len: self.descriptors.len() });
        }
        Ok(self.descriptors.remove(index))
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnyDescriptor> {
        self.descriptors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, AnyDescriptor> {
        self.descriptors.iter_mut()
    }

    /// 每个位置的描述符类型
    pub fn kinds(&self) -> Vec<DescriptorKind> {
        self.descriptors.iter().map(AnyDescriptor::kind).collect()
    }

    fn default_comparator() -> ComparatorSlot<Self, Result<Distance>> {
        ComparatorSlot::new(Arc::new(|a: &Self, b: &Self| aggregate_distance(&a.descriptors, &b.descriptors)))
    }
}

impl MediaDescriptor for DescriptorList {
    type Media = ColorImage;
    type Output = Result<Distance>;

    /// 在新媒体上重新计算每个描述符
    fn init(&mut self, media: &ColorImage) -> Result<()> {
        for descriptor in &mut self.descriptors {
            descriptor.init(media)?;
        }
        Ok(())
    }

    fn source_slot(&mut self) -> &mut Option<ColorImage> {
        &mut self.source
    }

    fn source(&self) -> Option<&ColorImage> {
        self.source.as_ref()
    }

    fn comparator_slot(&self) -> &ComparatorSlot<Self, Result<Distance>> {
        &self.comparator
    }

    fn comparator_slot_mut(&mut self) -> &mut ComparatorSlot<Self, Result<Distance>> {
        &mut self.comparator
    }
}

impl Default for DescriptorList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a DescriptorList {
    type Item = &'a AnyDescriptor;
    type IntoIter = std::slice::Iter<'a, AnyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for DescriptorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for descriptor in &self.descriptors {
            writeln!(f, "{}", descriptor)?;
        }
        Ok(())
    }
}

//! 描述符与比较器
//!
//! 描述符是某个媒体对象（目前为 [`ColorImage`]）的数值摘要，比较器负责计算两个同类描述符之间的距离。
//! 比较器以 `Arc` 共享，可以在运行时替换。

mod color_structure;
mod dominant_color;
mod gridded;
mod label;
mod list;
mod scalable_color;
mod single_color;

use std::fmt;
use std::sync::Arc;

pub use color_structure::*;
pub use dominant_color::*;
pub use gridded::*;
pub use label::*;
pub use list::*;
pub use scalable_color::*;
pub use single_color::*;

use crate::error::{Error, Result};

/// 描述符之间的距离，`f64::INFINITY` 表示无法比较或不包含
pub type Distance = f64;

/// 比较两个描述符的函数对象
pub trait Comparator<D: ?Sized, R>: Send + Sync {
    fn apply(&self, a: &D, b: &D) -> R;
}

impl<D: ?Sized, R, F> Comparator<D, R> for F
where
    F: Fn(&D, &D) -> R + Send + Sync,
{
    fn apply(&self, a: &D, b: &D) -> R {
        self(a, b)
    }
}

pub type SharedComparator<D, R> = Arc<dyn Comparator<D, R>>;

/// 比较器槽位，序列化时跳过，反序列化后恢复为描述符的默认比较器
pub struct ComparatorSlot<D, R>(Option<SharedComparator<D, R>>);

impl<D, R> ComparatorSlot<D, R> {
    pub fn new(comparator: SharedComparator<D, R>) -> Self {
        Self(Some(comparator))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&SharedComparator<D, R>> {
        self.0.as_ref()
    }

    pub fn set(&mut self, comparator: Option<SharedComparator<D, R>>) {
        self.0 = comparator;
    }
}

impl<D, R> Clone for ComparatorSlot<D, R> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<D, R> fmt::Debug for ComparatorSlot<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() { "Some(<comparator>)" } else { "None" })
    }
}

/// 媒体描述符
///
/// `init` 根据媒体重新计算描述符内容；`set_source` 保存媒体并总是触发 `init`。
/// 除此以外描述符是不可变的。
pub trait MediaDescriptor: Sized {
    type Media;
    /// 比较结果类型
    type Output;

    /// 根据媒体重新计算描述符
    fn init(&mut self, media: &Self::Media) -> Result<()>;

    /// 媒体存放位置
    fn source_slot(&mut self) -> &mut Option<Self::Media>;

    fn source(&self) -> Option<&Self::Media>;

    fn comparator_slot(&self) -> &ComparatorSlot<Self, Self::Output>;

    fn comparator_slot_mut(&mut self) -> &mut ComparatorSlot<Self, Self::Output>;

    fn set_source(&mut self, media: Self::Media) -> Result<()> {
        self.init(&media)?;
        *self.source_slot() = Some(media);
        Ok(())
    }

    /// 释放媒体以节省内存，描述符内容保持不变
    fn drop_source(&mut self) -> Option<Self::Media> {
        self.source_slot().take()
    }

    fn comparator(&self) -> Option<&SharedComparator<Self, Self::Output>> {
        self.comparator_slot().get()
    }

    fn set_comparator(&mut self, comparator: Option<SharedComparator<Self, Self::Output>>) {
        self.comparator_slot_mut().set(comparator);
    }

    /// 使用当前比较器计算与 `other` 的距离
    fn compare(&self, other: &Self) -> Result<Self::Output> {
        let comparator = self.comparator().ok_or(Error::MissingComparator)?;
        Ok(comparator.apply(self, other))
    }
}

/// 欧氏范数，用于组合描述符聚合子距离
pub(crate) fn euclidean_norm(distances: impl IntoIterator<Item = Distance>) -> Distance {
    distances.into_iter().map(|d| d * d).sum::<f64>().sqrt()
}

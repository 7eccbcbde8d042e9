//! 基于描述符的相似度数据库
//!
//! 所有记录共享同一个描述符模式（schema），查询时按与查询记录的距离从小到大排序。

use std::cmp::Ordering;
use std::path::Path;

use log::{debug, info};

mod record;
mod storage;

pub use record::*;

use crate::descriptor::{Distance, MediaDescriptor};
use crate::error::{Error, Result};
use crate::factory::{DescriptorConfig, DescriptorFactory, DescriptorKind};
use crate::media::ColorImage;

#[derive(Debug, Clone)]
pub struct ListDB {
    schema: Vec<DescriptorKind>,
    factory: DescriptorFactory,
    records: Vec<Record>,
}

impl ListDB {
    /// 创建空数据库，`schema` 之后不能修改
    pub fn new(schema: Vec<DescriptorKind>, config: DescriptorConfig) -> Self {
        Self::with_factory(schema, DescriptorFactory::new(config))
    }

    pub fn with_factory(schema: Vec<DescriptorKind>, factory: DescriptorFactory) -> Self {
        Self { schema, factory, records: vec![] }
    }

    pub fn schema(&self) -> &[DescriptorKind] {
        &self.schema
    }

    pub fn factory(&self) -> &DescriptorFactory {
        &self.factory
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// 第一条位置为 `locator` 的记录的下标
    pub fn position(&self, locator: &str) -> Option<usize> {
        self.records.iter().position(|r| r.locator() == Some(locator))
    }

    /// 按数据库的 schema 从图片计算一条记录
    pub fn record_from_media(&self, media: &ColorImage, locator: Option<String>) -> Result<Record> {
        let descriptors = self.factory.create_list(&self.schema, media)?;
        Ok(Record::new(descriptors, locator))
    }

    pub fn add(&mut self, record: Record) -> Result<()> {
        self.check(&record)?;
        self.records.push(record);
        Ok(())
    }

    pub fn add_media(&mut self, media: &ColorImage, locator: Option<String>) -> Result<()> {
        let record = self.record_from_media(media, locator)?;
        self.add(record)
    }

    pub fn insert(&mut self, index: usize, record: Record) -> Result<()> {
        self.check(&record)?;
        if index > self.records.len() {
            return Err(Error::OutOfRange { index, len: self.records.len() });
        }
        self.records.insert(index, record);
        Ok(())
    }

    /// 替换指定位置的记录，返回旧记录
    pub fn set(&mut self, index: usize, record: Record) -> Result<Record> {
        self.check(&record)?;
        let len = self.records.len();
        let slot = self.records.get_mut(index).ok_or(Error::OutOfRange { index, len })?;
        Ok(std::mem::replace(slot, record))
    }

    pub fn set_media(&mut self, index: usize, media: &ColorImage, locator: Option<String>) -> Result<Record> {
        let record = self.record_from_media(media, locator)?;
        self.set(index, record)
    }

    pub fn remove(&mut self, index: usize) -> Result<Record> {
        if index >= self.records.len() {
            return Err(Error::OutOfRange { index, len: self.records.len() });
        }
        Ok(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// 按与 `query` 的距离升序返回所有记录，距离相同时保持插入顺序
    pub fn query(&self, query: &Record) -> Result<Vec<&Record>> {
        Ok(self.query_metadata(query)?.into_iter().map(|m| m.record).collect())
    }

    /// 返回距离最小的 `k` 条记录，结果与 `query` 的前 `k` 项相同
    pub fn query_k(&self, query: &Record, k: usize) -> Result<Vec<&Record>> {
        Ok(self.query_k_metadata(query, k)?.into_iter().map(|m| m.record).collect())
    }

    /// 与 `query` 相同，同时返回距离
    pub fn query_metadata(&self, query: &Record) -> Result<Vec<ResultMetadata<'_>>> {
        let mut result = self.distances(query)?;
        result.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(result)
    }

    /// 有界插入选择，只保留当前最好的 `k` 条
    pub fn query_k_metadata(&self, query: &Record, k: usize) -> Result<Vec<ResultMetadata<'_>>> {
        let k = k.min(self.records.len());
        let mut best: Vec<ResultMetadata<'_>> = Vec::with_capacity(k + 1);
        for item in self.distances(query)? {
            if best.len() == k && best.last().is_none_or(|last| item.distance.total_cmp(&last.distance) != Ordering::Less) {
                continue;
            }
            let pos = best.partition_point(|m| m.distance.total_cmp(&item.distance) != Ordering::Greater);
            best.insert(pos, item);
            best.truncate(k);
        }
        Ok(best)
    }

    /// 从图片计算查询记录再查询，`k` 为 `None` 时返回全部
    pub fn query_media(&self, media: &ColorImage, k: Option<usize>) -> Result<Vec<ResultMetadata<'_>>> {
        let query = self.record_from_media(media, None)?;
        match k {
            Some(k) => self.query_k_metadata(&query, k),
            None => self.query_metadata(&query),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("保存 {} 条记录到 {}", self.records.len(), path.display());
        let snapshot = storage::SnapshotRef { schema: &self.schema, config: self.factory.config(), records: &self.records };
        storage::write(path, &snapshot)
    }

    /// 读取数据库，标签描述符使用默认分类器
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = storage::read(path)?;
        let factory = DescriptorFactory::new(snapshot.config);
        Self::restore(path, snapshot.schema, factory, snapshot.records)
    }

    pub fn open_with_factory(path: impl AsRef<Path>, factory: DescriptorFactory) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = storage::read(path)?;
        Self::restore(path, snapshot.schema, factory, snapshot.records)
    }

    fn restore(path: &Path, schema: Vec<DescriptorKind>, factory: DescriptorFactory, mut records: Vec<Record>) -> Result<Self> {
        info!("从 {} 读取了 {} 条记录", path.display(), records.len());
        for record in &mut records {
            factory.restore_comparators(record.descriptors_mut());
        }
        let db = Self { schema, factory, records };
        if let Some(record) = db.records.iter().find(|r| r.kinds() != db.schema) {
            return Err(Error::SchemaIncompatible { expected: db.schema.clone(), found: record.kinds() });
        }
        Ok(db)
    }

    fn check(&self, record: &Record) -> Result<()> {
        let found = record.kinds();
        if found != self.schema {
            return Err(Error::SchemaIncompatible { expected: self.schema.clone(), found });
        }
        Ok(())
    }

    fn distances(&self, query: &Record) -> Result<Vec<ResultMetadata<'_>>> {
        self.check(query)?;
        debug!("计算 {} 条记录的距离", self.records.len());
        self.records
            .iter()
            .map(|record| {
                let distance: Distance = query.descriptors().compare(record.descriptors())??;
                Ok(ResultMetadata { distance, record })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ListDB {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

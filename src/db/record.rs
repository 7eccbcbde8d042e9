use serde::{Deserialize, Serialize};

use crate::descriptor::{DescriptorList, Distance, MediaDescriptor};
use crate::error::Result;
use crate::factory::DescriptorKind;

/// 数据库中的一条记录：同一张图片的一组描述符，以及图片位置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    descriptors: DescriptorList,
    locator: Option<String>,
}

impl Record {
    pub fn new(descriptors: DescriptorList, locator: Option<String>) -> Self {
        Self { descriptors, locator }
    }

    pub fn descriptors(&self) -> &DescriptorList {
        &self.descriptors
    }

    pub(crate) fn descriptors_mut(&mut self) -> &mut DescriptorList {
        &mut self.descriptors
    }

    /// 图片路径或者 URL
    pub fn locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    pub fn set_locator(&mut self, locator: Option<String>) {
        self.locator = locator;
    }

    pub fn kinds(&self) -> Vec<DescriptorKind> {
        self.descriptors.kinds()
    }

    pub fn distance(&self, other: &Self) -> Result<Distance> {
        self.descriptors.compare(&other.descriptors)?
    }
}

/// 查询结果
#[derive(Debug, Clone, Serialize)]
pub struct ResultMetadata<'a> {
    pub distance: Distance,
    pub record: &'a Record,
}

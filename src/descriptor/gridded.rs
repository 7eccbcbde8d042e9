use std::fmt;
use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::list::aggregate_distance;
use super::{ComparatorSlot, Distance, MediaDescriptor};
use crate::error::{Error, Result};
use crate::factory::{AnyDescriptor, DescriptorFactory, DescriptorKind};
use crate::grid::SquareGrid;
use crate::media::ColorImage;

pub const DEFAULT_GRID_SIZE: (usize, usize) = (2, 2);
pub const DEFAULT_TILE_KIND: DescriptorKind = DescriptorKind::ScalableColor;

/// 网格描述符：对图片的每个格子分别计算同一种描述符
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GriddedDescriptor {
    grid: SquareGrid,
    tile_kind: DescriptorKind,
    tiles: Vec<AnyDescriptor>,
    #[serde(skip)]
    factory: DescriptorFactory,
    #[serde(skip)]
    source: Option<ColorImage>,
    #[serde(skip, default = "GriddedDescriptor::default_comparator")]
    comparator: ComparatorSlot<Self, Result<Distance>>,
}

impl GriddedDescriptor {
    /// 2x2 网格，每个格子计算可伸缩颜色描述符
    pub fn new(image: &ColorImage) -> Result<Self> {
        let (columns, rows) = DEFAULT_GRID_SIZE;
        Self::with_grid(image, SquareGrid::from_grid_size(image, columns, rows), DEFAULT_TILE_KIND, DescriptorFactory::default())
    }

    pub fn with_grid(image: &ColorImage, grid: SquareGrid, tile_kind: DescriptorKind, factory: DescriptorFactory) -> Result<Self> {
        check_tile_kind(tile_kind)?;
        let mut descriptor = Self { grid, tile_kind, tiles: vec![], factory, source: None, comparator: Self::default_comparator() };
        descriptor.compute_tiles(image)?;
        Ok(descriptor)
    }

    pub fn grid(&self) -> &SquareGrid {
        &self.grid
    }

    pub fn tile_kind(&self) -> DescriptorKind {
        self.tile_kind
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, index: usize) -> Option<&AnyDescriptor> {
        self.tiles.get(index)
    }

    pub fn tiles(&self) -> &[AnyDescriptor] {
        &self.tiles
    }

    /// 更换网格并重新计算所有格子
    pub fn set_grid(&mut self, grid: SquareGrid, image: &ColorImage) -> Result<()> {
        self.grid = grid;
        self.compute_tiles(image)
    }

    /// 更换格子描述符类型并重新计算所有格子
    pub fn set_tile_kind(&mut self, tile_kind: DescriptorKind, image: &ColorImage) -> Result<()> {
        check_tile_kind(tile_kind)?;
        self.tile_kind = tile_kind;
        self.compute_tiles(image)
    }

    pub(crate) fn set_factory(&mut self, factory: DescriptorFactory) {
        self.factory = factory;
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [AnyDescriptor] {
        &mut self.tiles
    }

    fn compute_tiles(&mut self, image: &ColorImage) -> Result<()> {
        debug!("computing {} {} tiles of {}x{} grid", self.grid.num_tiles(), self.tile_kind, self.grid.columns(), self.grid.rows());
        let (grid, kind, factory) = (&self.grid, self.tile_kind, &self.factory);
        self.tiles = (0..grid.num_tiles()).into_par_iter().map(|i| factory.create(kind, &grid.tile(image, i))).collect::<Result<Vec<_>>>()?;
        Ok(())
    }

    fn default_comparator() -> ComparatorSlot<Self, Result<Distance>> {
        ComparatorSlot::new(Arc::new(|a: &Self, b: &Self| aggregate_distance(&a.tiles, &b.tiles)))
    }
}

fn check_tile_kind(kind: DescriptorKind) -> Result<()> {
    if kind == DescriptorKind::Gridded {
        return Err(Error::InvalidParameter("gridded descriptor can not be used as tile descriptor".to_string()));
    }
    Ok(())
}

impl MediaDescriptor for GriddedDescriptor {
    type Media = ColorImage;
    type Output = Result<Distance>;

    /// 保持网格行列数，按新图片重新划分并计算
    fn init(&mut self, media: &ColorImage) -> Result<()> {
        self.grid = self.grid.resized_for(media);
        self.compute_tiles(media)
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

impl fmt::Display for GriddedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gridded({}x{}, {}):", self.grid.columns(), self.grid.rows(), self.tile_kind)?;
        for tile in &self.tiles {
            writeln!(f, "  {}", tile)?;
        }
        Ok(())
    }
}

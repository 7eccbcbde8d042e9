use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::ColorImage;

/// 把图片划分为等大小的矩形网格，边缘的格子会被裁剪
///
/// 格子按列优先编号：下标 `i` 对应第 `i / rows` 列、第 `i % rows` 行。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareGrid {
    columns: usize,
    rows: usize,
    tile_width: usize,
    tile_height: usize,
}

impl SquareGrid {
    /// 指定网格的列数和行数，格子大小由图片尺寸整除得到
    pub fn from_grid_size(image: &ColorImage, columns: usize, rows: usize) -> Self {
        let (columns, rows) = (columns.max(1), rows.max(1));
        Self { columns, rows, tile_width: image.width() / columns, tile_height: image.height() / rows }
    }

    /// 指定格子大小，网格列数和行数四舍五入得到
    pub fn from_tile_size(image: &ColorImage, tile_width: usize, tile_height: usize) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(Error::InvalidParameter(format!("invalid tile size {}x{}", tile_width, tile_height)));
        }
        let columns = ((image.width() as f64 / tile_width as f64 + 0.5) as usize).max(1);
        let rows = ((image.height() as f64 / tile_height as f64 + 0.5) as usize).max(1);
        Ok(Self { columns, rows, tile_width, tile_height })
    }

    /// 保持网格列数和行数，按新图片重新计算格子大小
    pub fn resized_for(&self, image: &ColorImage) -> Self {
        Self::from_grid_size(image, self.columns, self.rows)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> (usize, usize) {
        (self.tile_width, self.tile_height)
    }

    pub fn num_tiles(&self) -> usize {
        self.columns * self.rows
    }

    /// 第 `index` 个格子在图片中的位置 (x, y, 宽, 高)
    pub fn tile_rect(&self, image: &ColorImage, index: usize) -> (usize, usize, usize, usize) {
        let x = index / self.rows * self.tile_width;
        let y = index % self.rows * self.tile_height;
        let width = self.tile_width.min(image.width().saturating_sub(x));
        let height = self.tile_height.min(image.height().saturating_sub(y));
        (x, y, width, height)
    }

    pub fn tile(&self, image: &ColorImage, index: usize) -> ColorImage {
        let (x, y, w, h) = self.tile_rect(image, index);
        image.sub_image(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        let img = ColorImage::filled(10, 7, [0, 0, 0]);
        let grid = SquareGrid::from_grid_size(&img, 2, 3);
        assert_eq!(grid.num_tiles(), 6);
        assert_eq!(grid.tile_size(), (5, 2));
        // 列优先编号
        assert_eq!(grid.tile_rect(&img, 1), (0, 2, 5, 2));
        assert_eq!(grid.tile_rect(&img, 3), (5, 0, 5, 2));
    }

    #[test]
    fn test_tile_size_clipped() {
        let img = ColorImage::from_fn(10, 10, |x, y| [x as u8, y as u8, 0]);
        let grid = SquareGrid::from_tile_size(&img, 4, 4).unwrap();
        assert_eq!((grid.columns(), grid.rows()), (3, 3));
        let last = grid.tile(&img, 8);
        assert_eq!((last.width(), last.height()), (2, 2));
        assert_eq!(last.pixel(0, 0), [8, 8, 0]);
        assert!(SquareGrid::from_tile_size(&img, 0, 4).is_err());
    }

    #[test]
    fn test_zero_grid_size() {
        let img = ColorImage::filled(4, 4, [0, 0, 0]);
        let grid = SquareGrid::from_grid_size(&img, 0, 0);
        assert_eq!(grid.num_tiles(), 1);
        assert_eq!(grid.tile(&img, 0).len(), 16);
    }
}

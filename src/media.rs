use crate::error::{Error, Result};

/// RGB 像素，通道顺序为 R、G、B
pub type Rgb = [u8; 3];

/// 以行优先方式存储的 RGB 图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl ColorImage {
    /// 由像素数据创建图片，像素数量必须等于 `width * height`
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::InvalidParameter(format!(
                "expect {} pixels for {}x{} image, got {}",
                width * height,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// 纯色图片
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// 截取子图，超出边界的部分会被裁掉
    pub fn sub_image(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        let x1 = (x + width).min(self.width);
        let y1 = (y + height).min(self.height);
        let (x0, y0) = (x.min(x1), y.min(y1));
        let mut pixels = Vec::with_capacity((x1 - x0) * (y1 - y0));
        for row in y0..y1 {
            pixels.extend_from_slice(&self.pixels[row * self.width + x0..row * self.width + x1]);
        }
        Self { width: x1 - x0, height: y1 - y0, pixels }
    }

    /// 最近邻缩放
    pub fn resize_nearest(&self, width: usize, height: usize) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        if self.is_empty() {
            return Self::filled(width, height, [0, 0, 0]);
        }
        let sx = self.width as f64 / width as f64;
        let sy = self.height as f64 / height as f64;
        Self::from_fn(width, height, |x, y| {
            let ox = ((x as f64 * sx) as usize).min(self.width - 1);
            let oy = ((y as f64 * sy) as usize).min(self.height - 1);
            self.pixel(ox, oy)
        })
    }

    /// 宽度超过 `max_width` 时等比缩小
    pub fn shrink_to_width(&self, max_width: usize) -> Option<Self> {
        if self.width <= max_width || self.width == 0 {
            return None;
        }
        let height = (self.height * max_width / self.width).max(1);
        Some(self.resize_nearest(max_width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(ColorImage::new(2, 2, vec![[0, 0, 0]; 3]).is_err());
        assert!(ColorImage::new(2, 2, vec![[0, 0, 0]; 4]).is_ok());
    }

    #[test]
    fn test_sub_image_clipped() {
        let img = ColorImage::from_fn(5, 3, |x, y| [x as u8, y as u8, 0]);
        let sub = img.sub_image(3, 1, 4, 4);
        assert_eq!((sub.width(), sub.height()), (2, 2));
        assert_eq!(sub.pixel(0, 0), [3, 1, 0]);
        assert_eq!(sub.pixel(1, 1), [4, 2, 0]);
    }

    #[test]
    fn test_shrink_to_width() {
        let img = ColorImage::filled(400, 100, [1, 2, 3]);
        let small = img.shrink_to_width(200).unwrap();
        assert_eq!((small.width(), small.height()), (200, 50));
        assert!(small.pixels().iter().all(|p| *p == [1, 2, 3]));
        assert!(small.shrink_to_width(200).is_none());
    }
}

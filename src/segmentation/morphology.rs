//! Grey-level morphology with square structuring elements.
//!
//! Erosion and dilation over a filled square are separable, so both run as a
//! horizontal pass followed by a vertical pass. Pixels outside the image do
//! not take part in the minimum/maximum.

use image::GrayImage;

/// Filled square kernel of side `2 * radius + 1`, anchored at its centre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    radius: u32,
}

impl StructuringElement {
    pub fn square(radius: u32) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn side(&self) -> u32 {
        2 * self.radius + 1
    }

    /// Anchor position inside the kernel, (column, row)
    pub fn anchor(&self) -> (u32, u32) {
        (self.radius, self.radius)
    }

    /// (dx, dy) offsets of every active cell relative to the anchor
    pub fn offsets(&self) -> Vec<(i64, i64)> {
        let r = self.radius as i64;
        (-r..=r)
            .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
            .collect()
    }
}

pub fn erode(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    separable_extremum(img, se.radius(), u8::min)
}

pub fn dilate(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    separable_extremum(img, se.radius(), u8::max)
}

/// Erosion then dilation: removes bright detail smaller than the kernel
pub fn open(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    dilate(&erode(img, se), se)
}

/// Dilation then erosion: removes dark detail smaller than the kernel
pub fn close(img: &GrayImage, se: &StructuringElement) -> GrayImage {
    erode(&dilate(img, se), se)
}

fn separable_extremum(img: &GrayImage, radius: u32, pick: fn(u8, u8) -> u8) -> GrayImage {
    let (width, height) = img.dimensions();
    if radius == 0 || width == 0 || height == 0 {
        return img.clone();
    }

    let horizontal = GrayImage::from_fn(width, height, |x, y| {
        let lo = x.saturating_sub(radius);
        let hi = (x + radius).min(width - 1);
        (lo..=hi)
            .map(|sx| img.get_pixel(sx, y)[0])
            .reduce(pick)
            .map(|v| image::Luma([v]))
            .unwrap_or(*img.get_pixel(x, y))
    });

    GrayImage::from_fn(width, height, |x, y| {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(height - 1);
        (lo..=hi)
            .map(|sy| horizontal.get_pixel(x, sy)[0])
            .reduce(pick)
            .map(|v| image::Luma([v]))
            .unwrap_or(*horizontal.get_pixel(x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    // Direct evaluation over every kernel offset, clipped at the image border
    fn brute_force(img: &GrayImage, se: &StructuringElement, pick: fn(u8, u8) -> u8) -> GrayImage {
        let (w, h) = img.dimensions();
        GrayImage::from_fn(w, h, |x, y| {
            let v = se
                .offsets()
                .into_iter()
                .map(|(dx, dy)| (x as i64 + dx, y as i64 + dy))
                .filter(|&(sx, sy)| sx >= 0 && sy >= 0 && sx < w as i64 && sy < h as i64)
                .map(|(sx, sy)| img.get_pixel(sx as u32, sy as u32)[0])
                .reduce(pick)
                .unwrap();
            Luma([v])
        })
    }

    fn noisy(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| Luma([((x * 37 + y * 91 + x * y * 13) % 251) as u8]))
    }

    #[test]
    fn test_element_geometry() {
        let se = StructuringElement::square(5);
        assert_eq!(se.side(), 11);
        assert_eq!(se.anchor(), (5, 5));
        assert_eq!(se.offsets().len(), 121);
    }

    #[test]
    fn test_separable_matches_brute_force() {
        let img = noisy(23, 17);
        for radius in [1, 2, 5] {
            let se = StructuringElement::square(radius);
            assert_eq!(erode(&img, &se), brute_force(&img, &se, u8::min));
            assert_eq!(dilate(&img, &se), brute_force(&img, &se, u8::max));
        }
    }

    #[test]
    fn test_open_removes_thin_bright_line() {
        let img = GrayImage::from_fn(20, 20, |x, _| Luma([if (9..12).contains(&x) { 200 } else { 50 }]));
        let opened = open(&img, &StructuringElement::square(2));
        assert!(opened.pixels().all(|p| p[0] == 50));
    }

    #[test]
    fn test_close_fills_thin_dark_line() {
        let img = GrayImage::from_fn(20, 20, |_, y| Luma([if y == 7 { 10 } else { 120 }]));
        let closed = close(&img, &StructuringElement::square(1));
        assert!(closed.pixels().all(|p| p[0] == 120));
    }

    #[test]
    fn test_open_close_bounds() {
        let img = noisy(16, 16);
        let se = StructuringElement::square(2);
        let opened = open(&img, &se);
        let closed = close(&img, &se);
        for ((o, c), v) in opened.pixels().zip(closed.pixels()).zip(img.pixels()) {
            assert!(o[0] <= v[0]);
            assert!(c[0] >= v[0]);
        }
    }
}

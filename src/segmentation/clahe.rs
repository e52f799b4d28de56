//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a grid of equally sized tiles. Each tile gets its
//! own clipped-histogram equalization mapping, and every output pixel blends
//! the mappings of the four nearest tile centres so tile seams do not show.

use image::{DynamicImage, GrayImage, Luma};

use super::preprocessing::require_gray;
use crate::error::Result;

const BINS: usize = 256;

/// Tile-local histogram equalizer with a clip limit.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastEnhancer {
    clip_limit: f32,
    tile_grid: (u32, u32),
}

impl ContrastEnhancer {
    pub fn new(clip_limit: f32, tile_grid: (u32, u32)) -> Self {
        Self {
            clip_limit,
            tile_grid,
        }
    }

    pub fn clip_limit(&self) -> f32 {
        self.clip_limit
    }

    pub fn tile_grid(&self) -> (u32, u32) {
        self.tile_grid
    }

    /// Equalize a single-channel image held in a `DynamicImage`.
    ///
    /// Anything other than 8-bit grayscale is rejected with `InvalidInput`.
    pub fn enhance_dynamic(&self, img: &DynamicImage) -> Result<GrayImage> {
        let gray = require_gray("contrast enhancement", img)?;
        Ok(self.enhance(gray))
    }

    /// Equalize a single channel.
    pub fn enhance(&self, img: &GrayImage) -> GrayImage {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return img.clone();
        }

        let layout = TileLayout::new(width, height, self.tile_grid);
        let luts: Vec<[u8; BINS]> = (0..layout.tiles_y)
            .flat_map(|ty| (0..layout.tiles_x).map(move |tx| (tx, ty)))
            .map(|(tx, ty)| self.tile_lut(img, &layout, tx, ty))
            .collect();

        let columns: Vec<Blend> = (0..width)
            .map(|x| Blend::new(x, layout.tile_w, layout.tiles_x))
            .collect();
        let rows: Vec<Blend> = (0..height)
            .map(|y| Blend::new(y, layout.tile_h, layout.tiles_y))
            .collect();

        let tiles_x = layout.tiles_x as usize;
        GrayImage::from_fn(width, height, |x, y| {
            let v = img.get_pixel(x, y)[0] as usize;
            let col = &columns[x as usize];
            let row = &rows[y as usize];

            let top = &luts[row.first * tiles_x..];
            let bottom = &luts[row.second * tiles_x..];
            let upper = top[col.first][v] as f32 * (1.0 - col.weight)
                + top[col.second][v] as f32 * col.weight;
            let lower = bottom[col.first][v] as f32 * (1.0 - col.weight)
                + bottom[col.second][v] as f32 * col.weight;
            let value = upper * (1.0 - row.weight) + lower * row.weight;
            Luma([value.round().clamp(0.0, 255.0) as u8])
        })
    }

    fn tile_lut(&self, img: &GrayImage, layout: &TileLayout, tx: u32, ty: u32) -> [u8; BINS] {
        let (width, height) = img.dimensions();
        let x0 = tx * layout.tile_w;
        let y0 = ty * layout.tile_h;

        // Tiles overhanging the right/bottom edge read replicated edge pixels
        let mut hist = [0u32; BINS];
        for y in y0..y0 + layout.tile_h {
            let sy = y.min(height - 1);
            for x in x0..x0 + layout.tile_w {
                let sx = x.min(width - 1);
                hist[img.get_pixel(sx, sy)[0] as usize] += 1;
            }
        }

        let area = layout.tile_w * layout.tile_h;
        clip_histogram(&mut hist, self.clip_limit, area);

        let scale = 255.0 / area as f32;
        let mut lut = [0u8; BINS];
        let mut sum = 0u32;
        for (entry, count) in lut.iter_mut().zip(hist.iter()) {
            sum += count;
            *entry = (sum as f32 * scale).round().min(255.0) as u8;
        }
        lut
    }
}

/// Clip every bin at `clip_limit` times the average bin count and spread the
/// clipped excess back over the histogram.
fn clip_histogram(hist: &mut [u32; BINS], clip_limit: f32, area: u32) {
    let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);

    let mut excess = 0u32;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }

    let batch = excess / BINS as u32;
    let mut residual = excess % BINS as u32;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (BINS / residual as usize).max(1);
        for count in hist.iter_mut().step_by(step) {
            if residual == 0 {
                break;
            }
            *count += 1;
            residual -= 1;
        }
    }
}

struct TileLayout {
    tiles_x: u32,
    tiles_y: u32,
    tile_w: u32,
    tile_h: u32,
}

impl TileLayout {
    fn new(width: u32, height: u32, grid: (u32, u32)) -> Self {
        let tile_w = width.div_ceil(grid.0.clamp(1, width));
        let tile_h = height.div_ceil(grid.1.clamp(1, height));
        Self {
            // Recomputed so no tile lies entirely outside the image
            tiles_x: width.div_ceil(tile_w),
            tiles_y: height.div_ceil(tile_h),
            tile_w,
            tile_h,
        }
    }
}

/// Neighbouring tile indices and blend weight along one axis
struct Blend {
    first: usize,
    second: usize,
    weight: f32,
}

impl Blend {
    fn new(pos: u32, tile_size: u32, tiles: u32) -> Self {
        let t = pos as f32 / tile_size as f32 - 0.5;
        let first = t.floor();
        let weight = t - first;
        let first = first as i64;
        let last = tiles as i64 - 1;
        Self {
            first: first.clamp(0, last) as usize,
            second: (first + 1).clamp(0, last) as usize,
            weight,
        }
    }
}

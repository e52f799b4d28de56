use image::{GrayImage, Luma, Rgb, RgbImage};

pub const BACKGROUND: Rgb<u8> = Rgb([90, 40, 30]);
pub const VESSEL: Rgb<u8> = Rgb([230, 190, 170]);

/// Columns covered by the vertical line in `line_and_speck_image`
pub const LINE_COLUMNS: std::ops::RangeInclusive<u32> = 30..=32;
/// Top-left corner of the 2x2 speck in `line_and_speck_image`
pub const SPECK_ORIGIN: (u32, u32) = (8, 50);

/// 64x64 image: one 3-pixel-wide bright vertical line over the full height
/// and one isolated 2x2 bright square, on a uniform darker background.
pub fn line_and_speck_image() -> RgbImage {
    let (sx, sy) = SPECK_ORIGIN;
    RgbImage::from_fn(64, 64, |x, y| {
        let on_line = LINE_COLUMNS.contains(&x);
        let on_speck = (sx..sx + 2).contains(&x) && (sy..sy + 2).contains(&y);
        if on_line || on_speck { VESSEL } else { BACKGROUND }
    })
}

/// Deterministic pseudo-random generator (64-bit LCG)
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u8(&mut self) -> u8 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 56) as u8
    }
}

/// Colour noise, useful for properties that must hold on any input
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = Lcg::new(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb([rng.next_u8(), rng.next_u8(), rng.next_u8()]))
}

/// Fundus-like image: reddish disc with a brighter optic-disc spot and a few
/// darker curved vessels
pub fn fundus_like_image(width: u32, height: u32) -> RgbImage {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = cx.min(cy) * 0.95;
    RgbImage::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let d = ((fx - cx).powi(2) + (fy - cy).powi(2)).sqrt();
        if d > radius {
            return Rgb([0, 0, 0]);
        }
        let disc = ((fx - cx * 1.4).powi(2) + (fy - cy).powi(2)).sqrt() < radius * 0.15;
        let wave = (fy - cy - (fx / 9.0).sin() * 12.0).abs() < 2.0
            || (fx - cx * 0.7 - (fy / 11.0).cos() * 10.0).abs() < 1.5;
        match (disc, wave) {
            (true, _) => Rgb([250, 210, 150]),
            (false, true) => Rgb([110, 30, 20]),
            (false, false) => Rgb([190, 80, 45]),
        }
    })
}

/// Random binary mask with clustered blobs of varied size
pub fn blob_mask(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut rng = Lcg::new(seed);
    let mut mask = GrayImage::new(width, height);
    for _ in 0..40 {
        let x0 = rng.next_u8() as u32 % width;
        let y0 = rng.next_u8() as u32 % height;
        let w = 1 + rng.next_u8() as u32 % 9;
        let h = 1 + rng.next_u8() as u32 % 9;
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
    // Punch a few single-pixel holes
    for _ in 0..30 {
        let x = rng.next_u8() as u32 % width;
        let y = rng.next_u8() as u32 % height;
        mask.put_pixel(x, y, Luma([0]));
    }
    mask
}

pub fn is_binary(mask: &GrayImage) -> bool {
    mask.pixels().all(|p| p[0] == 0 || p[0] == 255)
}

use std::collections::HashSet;

use image::{GrayImage, Luma};
use imageproc::contours::find_contours as trace_contours;
use imageproc::region_labelling::{connected_components, Connectivity};

use super::preprocessing::ensure_not_empty;
use crate::error::Result;
use crate::models::Contour;

/// Trace every outer and hole border in a binary mask (non-zero = foreground)
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    trace_contours::<i32>(mask)
        .into_iter()
        .map(Contour::from)
        .collect()
}

/// Erases foreground regions whose outer contour encloses too little area.
#[derive(Debug, Clone, Copy)]
pub struct BlobFilter {
    min_area: f64,
}

impl BlobFilter {
    pub fn new(min_area: f64) -> Self {
        Self { min_area }
    }

    pub fn min_area(&self) -> f64 {
        self.min_area
    }

    pub fn remove_small_blobs(&self, mask: &GrayImage) -> Result<GrayImage> {
        ensure_not_empty("blob removal", mask.width(), mask.height())?;

        let contours = find_contours(mask);
        // Contours trace 8-connected borders, so label regions the same way
        let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

        // A hole contour bounds background that is already 0, so only outer
        // contours can select anything to erase
        let doomed: HashSet<u32> = contours
            .iter()
            .filter(|c| c.is_outer() && c.area() < self.min_area)
            .filter_map(|c| c.points.first())
            .map(|p| labels.get_pixel(p.x as u32, p.y as u32)[0])
            .filter(|&label| label != 0)
            .collect();

        tracing::debug!(
            contours = contours.len(),
            outer = contours.iter().filter(|c| c.is_outer()).count(),
            removed = doomed.len(),
            min_area = self.min_area,
            "small blobs removed"
        );

        if doomed.is_empty() {
            return Ok(mask.clone());
        }

        Ok(GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            if doomed.contains(&labels.get_pixel(x, y)[0]) {
                Luma([0])
            } else {
                *mask.get_pixel(x, y)
            }
        }))
    }
}

/// Erase every region whose outer contour encloses less than `min_area`
pub fn remove_small_blobs(mask: &GrayImage, min_area: f64) -> Result<GrayImage> {
    BlobFilter::new(min_area).remove_small_blobs(mask)
}

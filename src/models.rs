use imageproc::contours::{BorderType, Contour as TracedContour};
use imageproc::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    /// Outer border of a foreground region
    Outer,
    /// Border of a background hole inside a foreground region
    Hole,
}

/// Boundary of one connected region in a binary mask
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
    pub kind: ContourKind,
    /// Index of the enclosing contour in the list it was traced into
    pub parent: Option<usize>,
}

impl Contour {
    pub fn is_outer(&self) -> bool {
        self.kind == ContourKind::Outer
    }

    /// Area enclosed by the polygon through the boundary pixel centres.
    ///
    /// Single pixels and one-pixel-wide strokes enclose nothing and have
    /// area 0.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    pub fn min_x(&self) -> i32 {
        self.points.iter().map(|p| p.x).min().unwrap_or(0)
    }

    pub fn min_y(&self) -> i32 {
        self.points.iter().map(|p| p.y).min().unwrap_or(0)
    }

    pub fn max_x(&self) -> i32 {
        self.points.iter().map(|p| p.x).max().unwrap_or(0)
    }

    pub fn max_y(&self) -> i32 {
        self.points.iter().map(|p| p.y).max().unwrap_or(0)
    }

    pub fn width(&self) -> u32 {
        if self.points.is_empty() {
            return 0;
        }
        (self.max_x() - self.min_x() + 1) as u32
    }

    pub fn height(&self) -> u32 {
        if self.points.is_empty() {
            return 0;
        }
        (self.max_y() - self.min_y() + 1) as u32
    }
}

impl From<TracedContour<i32>> for Contour {
    fn from(traced: TracedContour<i32>) -> Self {
        Self {
            points: traced.points,
            kind: match traced.border_type {
                BorderType::Outer => ContourKind::Outer,
                BorderType::Hole => ContourKind::Hole,
            },
            parent: traced.parent,
        }
    }
}

//! Dense response surfaces produced by a full template scan.

use crate::search::{Metric, Point};

/// Score for every valid template placement, row-major.
///
/// The surface is `(scene_w - tpl_w + 1) x (scene_h - tpl_h + 1)`; the value
/// at `(x, y)` scores the placement whose top-left corner is `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseMap {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

/// Both extrema of a response surface and where they occur.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxLoc {
    /// Smallest score.
    pub min_val: f32,
    /// Largest score.
    pub max_val: f32,
    /// First placement (raster order) holding `min_val`.
    pub min_loc: Point,
    /// First placement (raster order) holding `max_val`.
    pub max_loc: Point,
}

impl ResponseMap {
    pub(crate) fn from_vec(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the number of horizontal placements.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of vertical placements.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the scores in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the score for placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Locates both extrema; ties resolve to the first position in raster order.
    pub fn min_max_loc(&self) -> MinMaxLoc {
        let mut out = MinMaxLoc {
            min_val: f32::INFINITY,
            max_val: f32::NEG_INFINITY,
            min_loc: Point::default(),
            max_loc: Point::default(),
        };
        for (idx, &score) in self.data.iter().enumerate() {
            let loc = Point::new(idx % self.width, idx / self.width);
            if score < out.min_val {
                out.min_val = score;
                out.min_loc = loc;
            }
            if score > out.max_val {
                out.max_val = score;
                out.max_loc = loc;
            }
        }
        out
    }

    /// Returns the best placement and its score for `metric`.
    ///
    /// Difference metrics take the minimum and similarity metrics the maximum,
    /// so a cached surface can be re-queried without rescanning.
    pub fn best_location(&self, metric: Metric) -> (Point, f32) {
        let extrema = self.min_max_loc();
        match metric.extremum() {
            crate::search::Extremum::Min => (extrema.min_loc, extrema.min_val),
            crate::search::Extremum::Max => (extrema.max_loc, extrema.max_val),
        }
    }
}

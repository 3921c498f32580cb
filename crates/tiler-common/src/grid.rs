//! Channel grid container.
//!
//! A [`ChannelGrid`] holds one satellite channel as a 2-D array of samples
//! together with the 1-D coordinate axes of the source's native projection
//! (for geostationary imagery: scan angle scaled to meters). Axes may run in
//! either direction; full-disk files commonly store `y` descending
//! (north to south).

use serde::{Deserialize, Serialize};

/// A 2-D grid of channel samples with native coordinate axes.
///
/// Data is stored row-major: `data[row * nx + col]`, where `col` indexes the
/// `x` axis and `row` indexes the `y` axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelGrid {
    /// Sample values, row-major, `ny * nx` long.
    pub data: Vec<f32>,
    /// Number of columns (length of the x axis).
    pub nx: usize,
    /// Number of rows (length of the y axis).
    pub ny: usize,
    /// Native x coordinate of each column.
    pub x: Vec<f64>,
    /// Native y coordinate of each row.
    pub y: Vec<f64>,
}

impl ChannelGrid {
    /// Create a grid, checking that data and axis lengths agree.
    pub fn new(data: Vec<f32>, x: Vec<f64>, y: Vec<f64>) -> Result<Self, GridError> {
        let (nx, ny) = (x.len(), y.len());
        if data.len() != nx * ny {
            return Err(GridError::ShapeMismatch {
                data_len: data.len(),
                nx,
                ny,
            });
        }
        if nx < 2 || ny < 2 {
            return Err(GridError::AxisTooShort { nx, ny });
        }
        Ok(Self { data, nx, ny, x, y })
    }

    /// Grid shape as (nx, ny).
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Value at a grid position, or `None` when out of range.
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.nx || row >= self.ny {
            return None;
        }
        self.data.get(row * self.nx + col).copied()
    }

    /// Whether the x axis coordinates increase with column index.
    pub fn x_ascending(&self) -> bool {
        self.x[0] <= self.x[self.nx - 1]
    }

    /// Whether the y axis coordinates increase with row index.
    pub fn y_ascending(&self) -> bool {
        self.y[0] <= self.y[self.ny - 1]
    }

    /// Extract a sub-grid by index ranges (end exclusive).
    ///
    /// Axis coordinates are carried over so the slice remains a valid grid
    /// in the same native coordinate system.
    pub fn slice(
        &self,
        col_range: std::ops::Range<usize>,
        row_range: std::ops::Range<usize>,
    ) -> Result<Self, GridError> {
        if col_range.end > self.nx || row_range.end > self.ny {
            return Err(GridError::SliceOutOfRange {
                nx: self.nx,
                ny: self.ny,
            });
        }

        let x: Vec<f64> = self.x[col_range.clone()].to_vec();
        let y: Vec<f64> = self.y[row_range.clone()].to_vec();

        let mut data = Vec::with_capacity(x.len() * y.len());
        for row in row_range {
            let start = row * self.nx + col_range.start;
            data.extend_from_slice(&self.data[start..start + x.len()]);
        }

        Self::new(data, x, y)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("data length {data_len} does not match axes {nx}x{ny}")]
    ShapeMismatch { data_len: usize, nx: usize, ny: usize },

    #[error("grid axes must have at least 2 points, got {nx}x{ny}")]
    AxisTooShort { nx: usize, ny: usize },

    #[error("slice range exceeds grid shape {nx}x{ny}")]
    SliceOutOfRange { nx: usize, ny: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x3() -> ChannelGrid {
        let data: Vec<f32> = (0..9).map(|i| i as f32).collect();
        ChannelGrid::new(data, vec![0.0, 1.0, 2.0], vec![10.0, 11.0, 12.0]).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_shape() {
        let err = ChannelGrid::new(vec![0.0; 5], vec![0.0, 1.0], vec![0.0, 1.0]);
        assert!(matches!(err, Err(GridError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_get() {
        let g = grid_3x3();
        assert_eq!(g.get(0, 0), Some(0.0));
        assert_eq!(g.get(2, 1), Some(5.0));
        assert_eq!(g.get(3, 0), None);
    }

    #[test]
    fn test_axis_direction() {
        let g = grid_3x3();
        assert!(g.x_ascending());
        assert!(g.y_ascending());

        let desc = ChannelGrid::new(
            vec![0.0; 9],
            vec![2.0, 1.0, 0.0],
            vec![12.0, 11.0, 10.0],
        )
        .unwrap();
        assert!(!desc.x_ascending());
        assert!(!desc.y_ascending());
    }

    #[test]
    fn test_slice() {
        let g = grid_3x3();
        let s = g.slice(1..3, 0..2).unwrap();
        assert_eq!(s.shape(), (2, 2));
        assert_eq!(s.x, vec![1.0, 2.0]);
        assert_eq!(s.y, vec![10.0, 11.0]);
        assert_eq!(s.data, vec![1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_slice_out_of_range() {
        let g = grid_3x3();
        assert!(matches!(
            g.slice(0..4, 0..3),
            Err(GridError::SliceOutOfRange { .. })
        ));
    }
}

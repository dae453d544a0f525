use anyhow::{bail, Result};
use glam::{Vec2, Vec3};

/// Floats per emitted vertex: 3 position + 2 texture coordinate.
pub const FLOATS_PER_VERTEX: usize = 5;

/// Dense grid of terrain vertex data sampled from a greyscale heightmap.
/// Built once at startup and turned into a flat triangle stream for upload.
///
/// Column index maps to X in [-1,1], row index to Z in [-1,1]. Height maps
/// to Y as `-h/2 - 0.5` with `h` the intensity normalized to [0,1]; the
/// sign and offset are part of the mesh contract.
pub struct Heightfield {
    rows: usize,
    cols: usize,
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
}

impl Heightfield {
    /// Samples a row-major 8-bit intensity buffer of `width * height` bytes.
    ///
    /// An axis with a single sample has no span to normalize over; its
    /// scale is pinned to 0 and the grid yields an empty triangle stream.
    pub fn from_luma(samples: &[u8], width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("heightmap must be at least 1x1, got {width}x{height}");
        }
        if samples.len() != width * height {
            bail!(
                "heightmap buffer holds {} samples, expected {width}x{height} = {}",
                samples.len(),
                width * height
            );
        }

        let mut positions = Vec::with_capacity(width * height);
        let mut tex_coords = Vec::with_capacity(width * height);
        for i in 0..height {
            let scale_r = if height > 1 {
                i as f32 / (height - 1) as f32
            } else {
                0.0
            };
            for j in 0..width {
                let scale_c = if width > 1 {
                    j as f32 / (width - 1) as f32
                } else {
                    0.0
                };
                let h = samples[i * width + j] as f32 / 255.0;
                positions.push(Vec3::new(
                    scale_c * 2.0 - 1.0,
                    -h / 2.0 - 0.5,
                    scale_r * 2.0 - 1.0,
                ));
                tex_coords.push(Vec2::new(scale_c, scale_r));
            }
        }

        Ok(Self {
            rows: height,
            cols: width,
            positions,
            tex_coords,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn position(&self, row: usize, col: usize) -> Vec3 {
        self.positions[row * self.cols + col]
    }

    pub fn tex_coord(&self, row: usize, col: usize) -> Vec2 {
        self.tex_coords[row * self.cols + col]
    }

    /// Number of vertices `triangle_stream` emits: 6 per interior cell.
    pub fn triangle_vertex_count(&self) -> usize {
        6 * (self.rows - 1) * (self.cols - 1)
    }

    /// Flattens the grid into a non-indexed triangle list, 5 floats per
    /// vertex, two triangles per cell, row-major over cells.
    ///
    /// Winding per cell is (i,j) -> (i+1,j) -> (i+1,j+1) followed by
    /// (i+1,j+1) -> (i,j+1) -> (i,j) and must not be reordered; it decides
    /// which side is the front face under culling.
    pub fn triangle_stream(&self) -> Vec<f32> {
        let mut stream = Vec::with_capacity(self.triangle_vertex_count() * FLOATS_PER_VERTEX);
        for i in 0..self.rows - 1 {
            for j in 0..self.cols - 1 {
                let corners = [
                    (i, j),
                    (i + 1, j),
                    (i + 1, j + 1),
                    (i + 1, j + 1),
                    (i, j + 1),
                    (i, j),
                ];
                for (row, col) in corners {
                    let p = self.position(row, col);
                    let t = self.tex_coord(row, col);
                    stream.extend_from_slice(&[p.x, p.y, p.z, t.x, t.y]);
                }
            }
        }
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn height_to_y(sample: u8) -> f32 {
        -(sample as f32 / 255.0) / 2.0 - 0.5
    }

    #[test]
    fn vertex_count_matches_grid_dimensions() {
        for (width, height) in [(2, 2), (3, 4), (7, 2), (16, 16)] {
            let field = Heightfield::from_luma(&vec![0; width * height], width, height).unwrap();
            assert_eq!(field.triangle_vertex_count(), 6 * (height - 1) * (width - 1));
            let stream = field.triangle_stream();
            assert_eq!(
                stream.len(),
                field.triangle_vertex_count() * FLOATS_PER_VERTEX
            );
            assert!(stream.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn constant_intensity_maps_to_constant_height() {
        let field = Heightfield::from_luma(&[128; 12], 4, 3).unwrap();
        let expected = height_to_y(128);
        for chunk in field.triangle_stream().chunks(FLOATS_PER_VERTEX) {
            assert!((chunk[1] - expected).abs() < EPS);
        }
    }

    #[test]
    fn corner_cell_regression() {
        // Row-major 2x2 samples: (0,0)=0, (0,1)=64, (1,0)=128, (1,1)=255.
        let field = Heightfield::from_luma(&[0, 64, 128, 255], 2, 2).unwrap();
        let stream = field.triangle_stream();
        assert_eq!(stream.len(), 6 * FLOATS_PER_VERTEX);

        let expected = [
            // Triangle A: (0,0) -> (1,0) -> (1,1)
            [-1.0, height_to_y(0), -1.0, 0.0, 0.0],
            [-1.0, height_to_y(128), 1.0, 0.0, 1.0],
            [1.0, height_to_y(255), 1.0, 1.0, 1.0],
            // Triangle B: (1,1) -> (0,1) -> (0,0)
            [1.0, height_to_y(255), 1.0, 1.0, 1.0],
            [1.0, height_to_y(64), -1.0, 1.0, 0.0],
            [-1.0, height_to_y(0), -1.0, 0.0, 0.0],
        ];
        for (vertex, want) in stream.chunks(FLOATS_PER_VERTEX).zip(expected) {
            for (got, want) in vertex.iter().zip(want) {
                assert!((got - want).abs() < EPS, "got {vertex:?}, want {want:?}");
            }
        }
    }

    #[test]
    fn winding_is_consistent_across_cells() {
        let samples: Vec<u8> = (0..5 * 4).map(|n| (n * 13 % 256) as u8).collect();
        let field = Heightfield::from_luma(&samples, 5, 4).unwrap();
        let stream = field.triangle_stream();

        let mut signs = Vec::new();
        for triangle in stream.chunks(3 * FLOATS_PER_VERTEX) {
            let (ax, az) = (triangle[0], triangle[2]);
            let (bx, bz) = (triangle[5], triangle[7]);
            let (cx, cz) = (triangle[10], triangle[12]);
            let area = (bx - ax) * (cz - az) - (bz - az) * (cx - ax);
            assert!(area.abs() > EPS);
            signs.push(area.signum());
        }
        assert!(signs.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn single_sample_axis_yields_no_triangles() {
        let row = Heightfield::from_luma(&[10, 20, 30, 40, 50], 5, 1).unwrap();
        assert_eq!(row.triangle_vertex_count(), 0);
        assert!(row.triangle_stream().is_empty());
        assert!((row.position(0, 0).z - -1.0).abs() < EPS);

        let col = Heightfield::from_luma(&[10, 20, 30], 1, 3).unwrap();
        assert_eq!(col.triangle_vertex_count(), 0);
        assert!(col.triangle_stream().is_empty());
        assert!((col.position(2, 0).x - -1.0).abs() < EPS);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Heightfield::from_luma(&[], 0, 3).is_err());
        assert!(Heightfield::from_luma(&[], 3, 0).is_err());
        assert!(Heightfield::from_luma(&[1, 2, 3], 2, 2).is_err());
    }
}

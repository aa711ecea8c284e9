use crate::{
    config::EngineConfig,
    grid::{EMPTY, Grid, tile_coords},
};

/// Denominators below this are treated as parallel segments.
const PARALLEL_EPS: f32 = 1e-10;

/// Result of a single cast. `u` is the position along the struck cell edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub tile: u8,
    pub u: f32,
}

impl RayHit {
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.tile != EMPTY
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: [f32; 2],
    pub t: f32, // along the first segment
    pub u: f32, // along the second segment
}

/// Exact crossing of segments `p1 -> p2` and `p3 -> p4`, if both parameters
/// land in `[0, 1]`.
pub fn segment_intersection(
    p1: [f32; 2],
    p2: [f32; 2],
    p3: [f32; 2],
    p4: [f32; 2],
) -> Option<Intersection> {
    let [x1, y1] = p1;
    let [x2, y2] = p2;
    let [x3, y3] = p3;
    let [x4, y4] = p4;

    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }

    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: [x1 + t * (x2 - x1), y1 + t * (y2 - y1)],
            t,
            u,
        })
    } else {
        None
    }
}

/// Edges of cell `(x, y)` in hit-test order: top, right, bottom, left.
/// Each edge runs clockwise around the cell; `u` is measured from its start.
#[inline]
fn cell_edges(x: i32, y: i32) -> [([f32; 2], [f32; 2]); 4] {
    let (x0, y0) = (x as f32, y as f32);
    let (x1, y1) = (x0 + 1.0, y0 + 1.0);
    [
        ([x0, y0], [x1, y0]),
        ([x1, y0], [x1, y1]),
        ([x1, y1], [x0, y1]),
        ([x0, y1], [x0, y0]),
    ]
}

/// Marches from `origin` (tile units) along `angle` until it enters a wall
/// cell, then resolves the exact boundary crossing. The returned distance is
/// in world units.
pub fn cast(grid: &Grid, config: &EngineConfig, origin: [f32; 2], angle: f32) -> RayHit {
    let scale = config.tile_size;
    let dir = [angle.cos(), angle.sin()];
    let range = config.max_range / scale;
    let step = config.march_step;

    // Multiply instead of accumulating so long rays don't drift
    let steps = (range / step).ceil() as u32;
    for k in 0..steps {
        let t = k as f32 * step;
        let sample = [origin[0] + dir[0] * t, origin[1] + dir[1] * t];
        let [mx, my] = tile_coords(sample);

        let tile = match grid.tile(mx, my) {
            Some(tile) if tile != EMPTY => tile,
            _ => continue,
        };

        for (a, b) in cell_edges(mx, my) {
            if let Some(hit) = segment_intersection(origin, sample, a, b) {
                let dx = hit.point[0] - origin[0];
                let dy = hit.point[1] - origin[1];
                return RayHit {
                    distance: (dx * dx + dy * dy).sqrt() * scale,
                    tile,
                    u: hit.u,
                };
            }
        }
        // Entered a wall without a clean crossing: keep marching
    }

    RayHit {
        distance: config.max_range,
        tile: EMPTY,
        u: 0.0,
    }
}

use crate::grid::{EMPTY, Grid, tile_coords};

/// Samples per tile unit along a line-of-sight probe.
const LOS_SAMPLES_PER_TILE: f32 = 10.0;

/// True when any of the nine points at `{-r, 0, +r}` offsets around `p`
/// lands on a wall or off the map.
pub fn is_colliding(grid: &Grid, p: [f32; 2], radius: f32) -> bool {
    let offsets = [-radius, 0.0, radius];
    offsets.iter().any(|&oy| {
        offsets.iter().any(|&ox| {
            let [x, y] = tile_coords([p[0] + ox, p[1] + oy]);
            grid.is_blocking(x, y)
        })
    })
}

/// Coarse visibility probe at roughly 0.1 tile resolution. Cheaper than a
/// cast and allowed to disagree with it near cell boundaries.
pub fn has_line_of_sight(grid: &Grid, a: [f32; 2], b: [f32; 2]) -> bool {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let steps = ((dx * dx + dy * dy).sqrt() * LOS_SAMPLES_PER_TILE).ceil() as u32;

    if steps == 0 {
        return grid.tile_at(a) == Some(EMPTY);
    }

    (0..=steps).all(|i| {
        let t = i as f32 / steps as f32;
        grid.tile_at([a[0] + dx * t, a[1] + dy * t]) == Some(EMPTY)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn room() -> Grid {
        Grid::parse(
            "11111
             10001
             10101
             10001
             11111",
        )
        .unwrap()
    }

    #[test]
    fn free_center_does_not_collide() {
        assert!(!is_colliding(&room(), [1.5, 1.5], 0.3));
    }

    #[rstest]
    #[case::touching_west_wall([1.2, 1.5])]
    #[case::touching_pillar_diagonally([1.8, 1.8])]
    #[case::inside_pillar([2.5, 2.5])]
    fn near_walls_collide(#[case] p: [f32; 2]) {
        assert!(is_colliding(&room(), p, 0.3));
    }

    #[test]
    fn matches_nine_sample_definition() {
        let grid = room();
        let r = 0.3;
        for iy in 0..50 {
            for ix in 0..50 {
                let p = [ix as f32 * 0.1, iy as f32 * 0.1];
                let expected = [-r, 0.0, r].iter().any(|&oy| {
                    [-r, 0.0, r].iter().any(|&ox| {
                        let x = (p[0] + ox).floor() as i32;
                        let y = (p[1] + oy).floor() as i32;
                        grid.tile(x, y) != Some(EMPTY)
                    })
                });
                assert_eq!(is_colliding(&grid, p, r), expected, "at {p:?}");
            }
        }
    }

    #[test]
    fn off_map_counts_as_blocked() {
        let open = Grid::parse("000\n000\n000").unwrap();
        assert!(!is_colliding(&open, [1.5, 1.5], 0.3));
        assert!(is_colliding(&open, [0.2, 1.5], 0.3));
        assert!(is_colliding(&open, [1.5, 2.9], 0.3));
        assert!(is_colliding(&open, [-4.0, -4.0], 0.0));
    }

    #[test]
    fn clear_corridor_has_line_of_sight() {
        assert!(has_line_of_sight(&room(), [1.5, 1.5], [3.5, 1.5]));
        assert!(has_line_of_sight(&room(), [1.5, 1.5], [1.5, 3.5]));
    }

    #[test]
    fn pillar_blocks_line_of_sight() {
        assert!(!has_line_of_sight(&room(), [1.5, 1.5], [3.5, 3.5]));
        assert!(!has_line_of_sight(&room(), [2.5, 1.5], [2.5, 3.5]));
    }

    #[test]
    fn thin_wall_blocks_both_directions() {
        let grid = Grid::parse(
            "0000000
             0001000
             0000000",
        )
        .unwrap();
        let west = [0.5, 1.5];
        let east = [6.5, 1.5];
        assert!(!has_line_of_sight(&grid, west, east));
        assert!(!has_line_of_sight(&grid, east, west));
    }

    #[test]
    fn leaving_the_map_blocks_sight() {
        let open = Grid::parse("000\n000\n000").unwrap();
        assert!(!has_line_of_sight(&open, [1.5, 1.5], [4.5, 1.5]));
    }

    #[test]
    fn zero_length_probe_checks_the_point() {
        assert!(has_line_of_sight(&room(), [1.5, 1.5], [1.5, 1.5]));
        assert!(!has_line_of_sight(&room(), [2.5, 2.5], [2.5, 2.5]));
    }
}

use crate::{
    camera::Camera,
    collision::is_colliding,
    grid::{EMPTY, Grid, tile_coords},
    input::Input,
};

/// Footprint used to gate player moves.
pub const PLAYER_RADIUS: f32 = 0.3;

/// Applies one tick of player intent. Turning and walking are exclusive:
/// a tick that turns does not translate. Blocked moves are dropped whole.
pub fn apply_input(grid: &Grid, camera: &mut Camera, input: &Input) {
    if input.is_turning() {
        camera.rotate(input.turn() * camera.turn_speed);
        return;
    }

    let strafe = Input::axis(input.strafe_left, input.strafe_right);
    let forward = Input::axis(input.backward, input.forward);
    let mag = (strafe * strafe + forward * forward).sqrt();
    if mag == 0.0 {
        return;
    }

    let strafe = strafe / mag * camera.move_speed;
    let forward = forward / mag * camera.move_speed;

    // Rotate (strafe, forward) by heading; forward maps onto the view ray
    let (s, c) = camera.heading.sin_cos();
    let dx = c * forward - s * strafe;
    let dy = c * strafe + s * forward;

    let next = [camera.pos[0] + dx, camera.pos[1] + dy];
    if !is_colliding(grid, next, PLAYER_RADIUS) {
        camera.pos = next;
    }
}

/// True once the player stands off the map or on an opening in its outer ring.
pub fn check_escape(grid: &Grid, pos: [f32; 2]) -> bool {
    let [x, y] = tile_coords(pos);
    match grid.tile(x, y) {
        None => true,
        Some(tile) => tile == EMPTY && grid.is_boundary(x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn grid() -> Grid {
        Grid::parse(
            "11111
             10001
             10000
             10001
             11111",
        )
        .unwrap()
    }

    fn camera(pos: [f32; 2], heading: f32) -> Camera {
        Camera {
            pos,
            heading,
            move_speed: 0.1,
            turn_speed: 0.05,
        }
    }

    #[test]
    fn forward_follows_heading() {
        let mut cam = camera([2.5, 2.5], FRAC_PI_2);
        let input = Input {
            forward: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        assert_abs_diff_eq!(cam.pos[0], 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.pos[1], 2.6, epsilon = 1e-6);
    }

    #[test]
    fn strafe_right_is_perpendicular_to_view() {
        let mut cam = camera([2.5, 2.5], 0.0);
        let input = Input {
            strafe_right: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        assert_abs_diff_eq!(cam.pos[0], 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(cam.pos[1], 2.6, epsilon = 1e-6);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut cam = camera([2.5, 2.5], 0.0);
        let input = Input {
            forward: true,
            strafe_left: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        let dx = cam.pos[0] - 2.5;
        let dy = cam.pos[1] - 2.5;
        assert_abs_diff_eq!((dx * dx + dy * dy).sqrt(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn turning_skips_translation() {
        let mut cam = camera([2.5, 2.5], 0.0);
        let input = Input {
            forward: true,
            turn_left: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        assert_eq!(cam.pos, [2.5, 2.5]);
        assert_abs_diff_eq!(cam.heading, -0.05);
    }

    #[test]
    fn zero_intent_is_a_no_op() {
        let mut cam = camera([2.5, 2.5], 0.7);
        let before = cam;
        let input = Input {
            forward: true,
            backward: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        assert_eq!(cam, before);
    }

    #[test]
    fn blocked_move_is_rejected_whole() {
        // Moving diagonally into the north wall: no sliding along x
        let mut cam = camera([2.5, 1.35], -PI / 4.0);
        let input = Input {
            forward: true,
            ..Input::default()
        };
        apply_input(&grid(), &mut cam, &input);
        assert_eq!(cam.pos, [2.5, 1.35]);
    }

    #[test]
    fn escape_on_boundary_opening_only() {
        let grid = grid();
        assert!(!check_escape(&grid, [3.5, 2.5]));
        assert!(check_escape(&grid, [4.2, 2.5]));
        assert!(check_escape(&grid, [5.1, 2.5]));
        assert!(check_escape(&grid, [-0.1, 2.5]));
    }
}

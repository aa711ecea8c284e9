use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: [f32; 2],    // (x, y) in tile units
    pub heading: f32,     // radians, 0 looks along +X, grows towards +Y
    pub move_speed: f32,  // tile units per tick
    pub turn_speed: f32,  // radians per tick
}

impl Camera {
    /// Distance and heading-relative bearing from the camera to `p`.
    /// The bearing is wrapped into `(-pi, pi]`.
    #[inline]
    pub fn bearing_to(&self, p: [f32; 2]) -> (f32, f32) {
        let dx = p[0] - self.pos[0];
        let dy = p[1] - self.pos[1];
        let distance = (dx * dx + dy * dy).sqrt();
        (distance, wrap_angle(dy.atan2(dx) - self.heading))
    }

    /// Angle of the ray through screen column `col` of a `screen_width`
    /// wide view spanning `fov` radians.
    #[inline]
    pub fn column_angle(&self, col: usize, screen_width: usize, fov: f32) -> f32 {
        self.heading - fov / 2.0 + (col as f32 / screen_width as f32) * fov
    }

    pub fn rotate(&mut self, delta: f32) {
        self.heading = wrap_angle(self.heading + delta);
    }
}

/// Wraps an angle into `(-pi, pi]`.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let mut a = a % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f32::consts::FRAC_PI_2;

    fn camera(heading: f32) -> Camera {
        Camera {
            pos: [1.0, 1.0],
            heading,
            move_speed: 0.05,
            turn_speed: 0.05,
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(PI, PI)]
    #[case(-PI, PI)]
    #[case(3.0 * PI, PI)]
    #[case(-FRAC_PI_2 - TAU, -FRAC_PI_2)]
    fn wraps_into_half_open_range(#[case] input: f32, #[case] expected: f32) {
        assert_abs_diff_eq!(wrap_angle(input), expected, epsilon = 1e-5);
    }

    #[test]
    fn bearing_is_relative_to_heading() {
        let cam = camera(FRAC_PI_2);
        let (d, a) = cam.bearing_to([1.0, 3.0]);
        assert_abs_diff_eq!(d, 2.0);
        assert_abs_diff_eq!(a, 0.0, epsilon = 1e-6);

        let (_, behind) = cam.bearing_to([1.0, -1.0]);
        assert_abs_diff_eq!(behind.abs(), PI, epsilon = 1e-5);
    }

    #[test]
    fn column_angles_span_the_fov() {
        let cam = camera(0.5);
        let fov = PI / 3.0;
        assert_abs_diff_eq!(cam.column_angle(0, 160, fov), 0.5 - fov / 2.0);
        assert_abs_diff_eq!(cam.column_angle(80, 160, fov), 0.5, epsilon = 1e-6);
        assert!(cam.column_angle(159, 160, fov) < 0.5 + fov / 2.0);
        // Narrower views only change the spread, not the center
        assert_abs_diff_eq!(cam.column_angle(40, 80, 0.2), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rotate_keeps_heading_wrapped() {
        let mut cam = camera(PI - 0.01);
        cam.rotate(0.02);
        assert!(cam.heading <= PI && cam.heading > -PI);
        assert_abs_diff_eq!(cam.heading, -PI + 0.01, epsilon = 1e-5);
    }
}

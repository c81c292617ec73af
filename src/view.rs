//! Orbit camera for drawing 3D wireframes on a 2D plot.

use crate::parser::Point3;
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Rotation about the vertical (Z) axis, radians.
    pub yaw: f64,
    /// Tilt toward the viewer, radians, within ±π/2.
    pub pitch: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw: -0.6,
            pitch: 0.5,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Orthographic projection of `p` onto the screen plane.
    ///
    /// Z is up. Yaw turns the model about Z, pitch then tips it toward the
    /// viewer about the screen's horizontal axis.
    pub fn project(&self, p: Point3) -> [f64; 2] {
        let [x, y, z] = p;
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let xr = x * cy - y * sy;
        let depth = x * sy + y * cy;
        let up = z * cp + depth * sp;
        [xr * self.zoom, up * self.zoom]
    }

    pub fn project_all(&self, points: &[Point3], center: Point3) -> Vec<[f64; 2]> {
        points
            .iter()
            .map(|p| self.project([p[0] - center[0], p[1] - center[1], p[2] - center[2]]))
            .collect()
    }

    /// Screen-space tips of the world X, Y and Z axes drawn from the origin
    /// with `length` model units.
    pub fn axis_triad(&self, length: f64) -> [(&'static str, [f64; 2]); 3] {
        [
            ("X", self.project([length, 0.0, 0.0])),
            ("Y", self.project([0.0, length, 0.0])),
            ("Z", self.project([0.0, 0.0, length])),
        ]
    }

    /// Applies a drag of `(dx, dy)` radians.
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        self.yaw += dx;
        self.pitch = (self.pitch + dy).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(0.05, 50.0);
        }
    }

    pub fn reset(&mut self) {
        *self = Camera::default();
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds {
    pub fn of<'a, I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut b = Bounds {
            min: first,
            max: first,
        };
        for p in iter {
            for i in 0..3 {
                b.min[i] = b.min[i].min(p[i]);
                b.max[i] = b.max[i].max(p[i]);
            }
        }
        Some(b)
    }

    pub fn center(&self) -> Point3 {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn extent(&self) -> f64 {
        (0..3)
            .map(|i| self.max[i] - self.min[i])
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn test_front_view_drops_depth() {
        let cam = Camera {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
        };
        assert!(close(cam.project([1.0, 5.0, 2.0]), [1.0, 2.0]));
    }

    #[test]
    fn test_top_view_shows_xy() {
        let cam = Camera {
            yaw: 0.0,
            pitch: FRAC_PI_2,
            zoom: 2.0,
        };
        assert!(close(cam.project([1.0, 3.0, 7.0]), [2.0, 6.0]));
    }

    #[test]
    fn test_axis_triad_follows_camera() {
        let front = Camera {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
        };
        let [x, y, z] = front.axis_triad(2.0);
        assert_eq!(x.0, "X");
        assert!(close(x.1, [2.0, 0.0]));
        // Y points away from the viewer
        assert!(close(y.1, [0.0, 0.0]));
        assert!(close(z.1, [0.0, 2.0]));

        let top = Camera {
            yaw: 0.0,
            pitch: FRAC_PI_2,
            zoom: 1.0,
        };
        let [_, y, _] = top.axis_triad(1.0);
        assert!(close(y.1, [0.0, 1.0]));
    }

    #[test]
    fn test_orbit_clamps_pitch() {
        let mut cam = Camera::default();
        cam.orbit(0.1, 10.0);
        assert_eq!(cam.pitch, FRAC_PI_2);
        cam.reset();
        assert_eq!(cam, Camera::default());
    }

    #[test]
    fn test_bounds() {
        let pts = [[0.0, -2.0, 1.0], [4.0, 2.0, 1.0]];
        let b = Bounds::of(&pts).unwrap();
        assert_eq!(b.center(), [2.0, 0.0, 1.0]);
        assert_eq!(b.extent(), 4.0);
        assert!(Bounds::of(&[]).is_none());
    }
}

//! Perspective projection of the carousel's camera-space quads.
//!
//! The camera looks down −z with y up. Every carousel quad is parallel to
//! the image plane, so it projects to an axis-aligned screen rectangle.

use std::ops::{Add, Mul};

/// Point or offset in camera space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}

/// Projected quad in pixels, with its distance from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    pub depth: f32,
}

/// Symmetric perspective frustum mapped onto a `width` x `height` viewport.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    width: f32,
    height: f32,
    /// Cotangent of half the vertical field of view.
    focal: f32,
    near: f32,
    far: f32,
}

impl Projection {
    pub const FOV_Y_DEGREES: f32 = 45.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    pub fn new(width: u32, height: u32) -> Self {
        Self::with_frustum(width, height, Self::FOV_Y_DEGREES, Self::NEAR, Self::FAR)
    }

    pub fn with_frustum(width: u32, height: u32, fov_y_degrees: f32, near: f32, far: f32) -> Self {
        let half = (fov_y_degrees.to_radians() / 2.0).tan();
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
            focal: 1.0 / half,
            near,
            far,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Pixel coordinates of `p`, or `None` outside the near/far range.
    pub fn project_point(&self, p: Vec3) -> Option<(f32, f32)> {
        let depth = -p.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let ndc_x = self.focal / self.aspect() * p.x / depth;
        let ndc_y = self.focal * p.y / depth;
        Some((
            (ndc_x + 1.0) * 0.5 * self.width,
            (1.0 - ndc_y) * 0.5 * self.height,
        ))
    }

    /// Project the rectangle spanned by `min` and `max` at depth `min.z`.
    pub fn project_rect(&self, min: Vec3, max: Vec3) -> Option<ScreenRect> {
        let (left, bottom) = self.project_point(Vec3::new(min.x, min.y, min.z))?;
        let (right, top) = self.project_point(Vec3::new(max.x, max.y, min.z))?;
        let x = left.round();
        let y = top.round();
        let w = (right.round() - x).max(0.0);
        let h = (bottom.round() - y).max(0.0);
        Some(ScreenRect {
            x: x as i32,
            y: y as i32,
            w: w as u32,
            h: h as u32,
            depth: -min.z,
        })
    }
}

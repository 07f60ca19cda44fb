//! 刚体变换 - 朝向、缩放、平移与变换矩阵

mod matrix;
mod orientation;

pub use matrix::TransformMatrix;
pub use orientation::{EulerAngles, Orientation, OrientationKind, Quaternion};

use glam::DVec3;

/// 缩放向量
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingVec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ScalingVec {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_vector(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl Default for ScalingVec {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// 平移向量
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TranslationVec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TranslationVec {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_vector(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }
}

impl From<DVec3> for TranslationVec {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

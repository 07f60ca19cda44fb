//! 4x4 齐次变换矩阵（列主序）

use std::fmt;

use glam::{DMat4, DVec3};

use super::{EulerAngles, Orientation, Quaternion, ScalingVec, TranslationVec};

/// 变换矩阵
///
/// 16 个元素按列主序存放，和固定管线 `glMultMatrixd` 的布局一致。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformMatrix {
    mat: DMat4,
}

impl TransformMatrix {
    pub const IDENTITY: Self = Self { mat: DMat4::IDENTITY };

    pub fn from_cols_array(cols: &[f64; 16]) -> Self {
        Self {
            mat: DMat4::from_cols_array(cols),
        }
    }

    /// `diag(s.x, s.y, s.z, 1)`
    pub fn from_scale(s: &ScalingVec) -> Self {
        let mut m = [0.0; 16];
        m[0] = s.x;
        m[5] = s.y;
        m[10] = s.z;
        m[15] = 1.0;
        Self::from_cols_array(&m)
    }

    /// 单位阵，最后一列为 `(t.x, t.y, t.z, 1)`
    pub fn from_translation(t: &TranslationVec) -> Self {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        m[12] = t.x;
        m[13] = t.y;
        m[14] = t.z;
        Self::from_cols_array(&m)
    }

    /// 单位四元数旋转矩阵
    ///
    /// 调用方负责保证 `q` 为单位长度；插值得到的四元数不会自动归一化。
    pub fn from_quaternion(q: &Quaternion) -> Self {
        let (w, x, y, z) = (q.w(), q.x(), q.y(), q.z());
        Self::from_cols_array(&[
            1.0 - 2.0 * y * y - 2.0 * z * z,
            2.0 * (x * y + w * z),
            2.0 * (x * z - w * y),
            0.0,
            2.0 * (x * y - w * z),
            1.0 - 2.0 * x * x - 2.0 * z * z,
            2.0 * (y * z + w * x),
            0.0,
            2.0 * (x * z + w * y),
            2.0 * (y * z - w * x),
            1.0 - 2.0 * x * x - 2.0 * y * y,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// `Rz · Ry · Rx`
    ///
    /// 列布局必须保持不变，已有关键帧文件按此约定调校。
    pub fn from_euler(e: &EulerAngles) -> Self {
        let (sin_x, cos_x) = e.x.sin_cos();
        let (sin_y, cos_y) = e.y.sin_cos();
        let (sin_z, cos_z) = e.z.sin_cos();

        let mut m = [0.0; 16];
        m[0] = cos_z * cos_y;
        m[1] = sin_z * cos_y;
        m[2] = -sin_y;
        m[4] = cos_z * sin_y * sin_x - sin_z * cos_x;
        m[5] = sin_z * sin_y * sin_x + cos_z * cos_x;
        m[6] = cos_y * sin_x;
        m[8] = cos_z * sin_y * cos_x + sin_z * sin_x;
        m[9] = sin_z * sin_y * cos_x - cos_z * sin_x;
        m[10] = cos_y * cos_x;
        m[15] = 1.0;
        Self::from_cols_array(&m)
    }

    pub fn from_orientation(o: &Orientation) -> Self {
        match o {
            Orientation::Quaternion(q) => Self::from_quaternion(q),
            Orientation::Euler(e) => Self::from_euler(e),
        }
    }

    /// 列主序的 16 个元素
    pub fn to_cols_array(&self) -> [f64; 16] {
        self.mat.to_cols_array()
    }

    pub fn as_dmat4(&self) -> &DMat4 {
        &self.mat
    }

    pub fn transform_point(&self, p: DVec3) -> DVec3 {
        self.mat.transform_point3(p)
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<TransformMatrix> for DMat4 {
    fn from(m: TransformMatrix) -> Self {
        m.mat
    }
}

impl fmt::Display for TransformMatrix {
    /// 按行输出，便于调试日志
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.to_cols_array();
        for row in 0..4 {
            write!(f, "| ")?;
            for col in 0..4 {
                write!(f, "{} ", m[col * 4 + row])?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_mat_eq(a: &TransformMatrix, b: &DMat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-12, "{} != {}\n{}", x, y, a);
        }
    }

    #[test]
    fn test_scale_matrix() {
        let m = TransformMatrix::from_scale(&ScalingVec::new(2.0, 3.0, 4.0));
        assert_mat_eq(&m, &DMat4::from_scale(DVec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_translation_matrix_last_column() {
        let m = TransformMatrix::from_translation(&TranslationVec::new(1.0, -2.0, 3.5));
        let cols = m.to_cols_array();
        assert_eq!(&cols[12..16], &[1.0, -2.0, 3.5, 1.0]);
        assert_eq!(m.transform_point(DVec3::ZERO), DVec3::new(1.0, -2.0, 3.5));
    }

    #[test]
    fn test_identity_quaternion() {
        let m = TransformMatrix::from_quaternion(&Quaternion::IDENTITY);
        assert_mat_eq(&m, &DMat4::IDENTITY);
    }

    #[test]
    fn test_quaternion_matches_glam() {
        let q = Quaternion::new(0.3, -0.5, 0.7, 0.1).unwrap();
        let m = TransformMatrix::from_quaternion(&q);
        assert_mat_eq(&m, &DMat4::from_quat(q.to_dquat()));
    }

    #[test]
    fn test_euler_layout_is_rz_ry_rx() {
        let e = EulerAngles::from_radians(0.4, -1.1, 2.3);
        let m = TransformMatrix::from_euler(&e);
        let expected = DMat4::from_rotation_z(e.z)
            * DMat4::from_rotation_y(e.y)
            * DMat4::from_rotation_x(e.x);
        assert_mat_eq(&m, &expected);

        let cols = m.to_cols_array();
        assert!((cols[0] - e.z.cos() * e.y.cos()).abs() < 1e-15);
        assert!((cols[1] - e.z.sin() * e.y.cos()).abs() < 1e-15);
        assert!((cols[2] + e.y.sin()).abs() < 1e-15);
    }

    #[test]
    fn test_euler_and_quaternion_agree_on_single_axis() {
        let half = FRAC_PI_2 / 2.0;
        let q = Quaternion::new(half.cos(), 0.0, 0.0, half.sin()).unwrap();
        let e = EulerAngles::from_degrees(0.0, 0.0, 90.0);
        let mq = TransformMatrix::from_quaternion(&q);
        let me = TransformMatrix::from_euler(&e);
        assert_mat_eq(&mq, me.as_dmat4());

        let p = mq.transform_point(DVec3::X);
        assert!((p - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_display_prints_rows() {
        let m = TransformMatrix::from_translation(&TranslationVec::new(7.0, 0.0, 0.0));
        let text = m.to_string();
        assert_eq!(text.lines().next(), Some("| 1 0 0 7 |"));
        assert_eq!(text.lines().count(), 4);
    }
}

//! 关键帧位姿

use glam::DMat4;

use crate::render::MatrixStack;
use crate::transform::{
    EulerAngles, Orientation, OrientationKind, Quaternion, ScalingVec, TransformMatrix,
    TranslationVec,
};
use crate::{EngineError, Result};

/// 物体在某一时刻的完整位姿
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub orientation: Orientation,
    pub translation: TranslationVec,
    pub scale: ScalingVec,
}

/// 一帧对应的三个变换矩阵
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMatrices {
    pub translation: TransformMatrix,
    pub rotation: TransformMatrix,
    pub scale: TransformMatrix,
}

impl FrameMatrices {
    /// `T · R · S`
    pub fn compose(&self) -> DMat4 {
        *self.translation.as_dmat4() * *self.rotation.as_dmat4() * *self.scale.as_dmat4()
    }
}

impl Frame {
    pub fn new(orientation: impl Into<Orientation>, translation: TranslationVec) -> Self {
        Self {
            orientation: orientation.into(),
            translation,
            scale: ScalingVec::default(),
        }
    }

    pub fn with_scale(mut self, scale: ScalingVec) -> Self {
        self.scale = scale;
        self
    }

    pub fn orientation_kind(&self) -> OrientationKind {
        self.orientation.kind()
    }

    /// 扁平向量的通道数（7 或 6）
    pub fn channel_count(&self) -> usize {
        self.orientation_kind().record_len()
    }

    /// 从扁平向量构建
    ///
    /// - 7 个值：`[tx, ty, tz, qw, qx, qy, qz]`，四元数会被归一化
    /// - 6 个值：`[tx, ty, tz, ex, ey, ez]`，`angle_is_radian` 为 false 时按角度换算
    ///
    /// 缩放不在向量中，始终为默认值。
    pub fn from_vector(v: &[f64], angle_is_radian: bool) -> Result<Self> {
        let orientation = match v.len() {
            7 => Orientation::Quaternion(Quaternion::new(v[3], v[4], v[5], v[6])?),
            6 => Orientation::Euler(EulerAngles::new(v[3], v[4], v[5], angle_is_radian)),
            len => {
                log::error!("无法解析长度为 {} 的关键帧向量", len);
                return Err(EngineError::MalformedKeyframeRecord { len });
            }
        };
        Ok(Self::new(orientation, TranslationVec::new(v[0], v[1], v[2])))
    }

    /// 插值结果还原为 Frame：角度为弧度，四元数分量保持原样
    pub(crate) fn from_interpolated(v: &[f64], renormalize: bool) -> Result<Self> {
        if v.len() == 7 && !renormalize {
            let q = Quaternion::from_raw(v[3], v[4], v[5], v[6]);
            return Ok(Self::new(q, TranslationVec::new(v[0], v[1], v[2])));
        }
        Self::from_vector(v, true)
    }

    /// 平移 ++ 朝向参数（不含缩放）
    pub fn data(&self) -> Vec<f64> {
        let mut ret = self.translation.as_vector().to_vec();
        ret.extend(self.orientation.as_vector());
        ret
    }

    pub fn transform_matrices(&self) -> FrameMatrices {
        FrameMatrices {
            translation: TransformMatrix::from_translation(&self.translation),
            rotation: TransformMatrix::from_orientation(&self.orientation),
            scale: TransformMatrix::from_scale(&self.scale),
        }
    }

    /// 模型矩阵 `T · R · S`
    pub fn model_matrix(&self) -> DMat4 {
        self.transform_matrices().compose()
    }

    /// 依次把平移、旋转、缩放乘到矩阵栈上
    pub fn apply_to<S: MatrixStack + ?Sized>(&self, stack: &mut S) {
        let matrices = self.transform_matrices();
        stack.mult_matrix(&matrices.translation);
        stack.mult_matrix(&matrices.rotation);
        stack.mult_matrix(&matrices.scale);
    }
}

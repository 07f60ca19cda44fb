//! 朝向表示 - 四元数与欧拉角
//!
//! 两种表示都能展开为扁平参数向量，插值引擎只按通道处理，不区分朝向类型。

use std::f64::consts::PI;

use glam::DQuat;

use crate::{EngineError, Result};

/// 朝向类型
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrientationKind {
    Quaternion,
    Euler,
}

impl OrientationKind {
    /// 朝向参数的通道数
    pub fn channel_count(self) -> usize {
        match self {
            OrientationKind::Quaternion => 4,
            OrientationKind::Euler => 3,
        }
    }

    /// 整个关键帧向量的长度（平移 3 + 朝向）
    pub fn record_len(self) -> usize {
        3 + self.channel_count()
    }
}

/// 单位四元数
///
/// 构造时归一化；插值结果可能通过 [`Quaternion::from_raw`] 保留未归一化的分量。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Quaternion {
    pub const IDENTITY: Self = Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    /// 创建并归一化，零向量返回 `InvalidOrientation`
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Result<Self> {
        let norm = (w * w + x * x + y * y + z * z).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(EngineError::InvalidOrientation);
        }
        Ok(Self {
            w: w / norm,
            x: x / norm,
            y: y / norm,
            z: z / norm,
        })
    }

    /// 按原样保存分量，不做归一化
    pub(crate) fn from_raw(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// 重新归一化
    pub fn normalized(&self) -> Result<Self> {
        Self::new(self.w, self.x, self.y, self.z)
    }

    /// 参数向量 `[w, x, y, z]`
    pub fn as_vector(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    pub fn to_dquat(&self) -> DQuat {
        DQuat::from_xyzw(self.x, self.y, self.z, self.w)
    }

    pub fn from_dquat(q: DQuat) -> Result<Self> {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 欧拉角（弧度）
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerAngles {
    /// `is_radian` 为 false 时按角度输入换算为弧度，不做范围折叠
    pub fn new(x: f64, y: f64, z: f64, is_radian: bool) -> Self {
        if is_radian {
            Self { x, y, z }
        } else {
            Self {
                x: degrees_to_radians(x),
                y: degrees_to_radians(y),
                z: degrees_to_radians(z),
            }
        }
    }

    pub fn from_radians(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, true)
    }

    pub fn from_degrees(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, false)
    }

    /// 参数向量 `[x, y, z]`
    pub fn as_vector(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

fn degrees_to_radians(v: f64) -> f64 {
    v / 360.0 * 2.0 * PI
}

/// 朝向
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    Quaternion(Quaternion),
    Euler(EulerAngles),
}

impl Orientation {
    pub fn kind(&self) -> OrientationKind {
        match self {
            Orientation::Quaternion(_) => OrientationKind::Quaternion,
            Orientation::Euler(_) => OrientationKind::Euler,
        }
    }

    /// 扁平参数向量（四元数 4 个通道，欧拉角 3 个通道）
    pub fn as_vector(&self) -> Vec<f64> {
        match self {
            Orientation::Quaternion(q) => q.as_vector().to_vec(),
            Orientation::Euler(e) => e.as_vector().to_vec(),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Euler(EulerAngles::default())
    }
}

impl From<Quaternion> for Orientation {
    fn from(q: Quaternion) -> Self {
        Orientation::Quaternion(q)
    }
}

impl From<EulerAngles> for Orientation {
    fn from(e: EulerAngles) -> Self {
        Orientation::Euler(e)
    }
}

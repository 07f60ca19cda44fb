//! 关键帧插值
//!
//! 所有算法都在 Frame 的扁平通道向量上逐通道计算，朝向分量也当作独立标量处理。
//! 需要真正的旋转插值时使用 [`Interpolation::LinearSlerp`]。

use crate::transform::{Orientation, Quaternion, TranslationVec};
use crate::{EngineError, Result};

use super::Frame;

/// 关键帧窗口越界时的索引策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// 插值时对关键帧数量取模，循环播放整个序列
    #[default]
    ModuloWrap,
    /// 不取模，窗口越界即报错，由播放器把索引重置回起点
    ResetToStart,
}

/// 插值算法
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// 直接返回当前关键帧
    Identity,
    /// 两点线性插值
    Linear,
    /// 四点 Catmull-Rom 样条
    CatmullRom,
    /// 四点均匀三次 B 样条
    BSpline,
    /// 平移线性插值，四元数球面插值
    LinearSlerp,
}

impl Interpolation {
    /// 解析控制文件中的插值标记（区分大小写）
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "Linear" => Some(Self::Linear),
            "CatmullRom" | "CATMULLROM" => Some(Self::CatmullRom),
            "BSpline" | "BSPLINE" => Some(Self::BSpline),
            "Identity" => Some(Self::Identity),
            "LinearSlerp" => Some(Self::LinearSlerp),
            _ => {
                log::warn!("未知的插值方式: {}", token);
                None
            }
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Linear => "Linear",
            Self::CatmullRom => "CatmullRom",
            Self::BSpline => "BSpline",
            Self::LinearSlerp => "LinearSlerp",
        }
    }

    /// 一次插值读取的关键帧数量
    pub fn window_size(&self) -> usize {
        match self {
            Self::Identity => 1,
            Self::Linear | Self::LinearSlerp => 2,
            Self::CatmullRom | Self::BSpline => 4,
        }
    }

    /// 插值段左端点之前需要保留的关键帧数量，也是循环的起始索引
    pub fn lead(&self) -> usize {
        match self {
            Self::CatmullRom | Self::BSpline => 1,
            _ => 0,
        }
    }

    /// 按取模策略插值
    pub fn interpolate(&self, keyframes: &[Frame], position: usize, t: f64) -> Result<Frame> {
        self.interpolate_with_policy(keyframes, position, t, IndexPolicy::ModuloWrap)
    }

    pub fn interpolate_with_policy(
        &self,
        keyframes: &[Frame],
        position: usize,
        t: f64,
        policy: IndexPolicy,
    ) -> Result<Frame> {
        self.evaluate(keyframes, position, t, policy, false)
    }

    /// 计算窗口第一个关键帧的索引
    pub fn window_start(&self, len: usize, position: usize, policy: IndexPolicy) -> Result<usize> {
        self.resolve_window(len, position, policy).ok_or_else(|| {
            log::error!(
                "插值窗口 {} 在位置 {} 超出 {} 个关键帧",
                self.window_size(),
                position,
                len
            );
            EngineError::KeyframeIndexOutOfRange { index: position, len }
        })
    }

    /// 窗口是否落在关键帧序列内
    pub fn window_fits(&self, len: usize, position: usize, policy: IndexPolicy) -> bool {
        self.resolve_window(len, position, policy).is_some()
    }

    fn resolve_window(&self, len: usize, position: usize, policy: IndexPolicy) -> Option<usize> {
        let window = self.window_size();
        let lead = self.lead();
        if len < window {
            return None;
        }

        // 插值段左端点
        let anchor = match policy {
            // 两点：position mod (n-1)；四点：position mod (n-3) + 1
            IndexPolicy::ModuloWrap => position % (len - window + 1) + lead,
            IndexPolicy::ResetToStart => position,
        };

        // 窗口左端点最大为 len - window
        if anchor < lead || anchor - lead > len - window {
            return None;
        }
        Some(anchor - lead)
    }

    pub(crate) fn evaluate(
        &self,
        keyframes: &[Frame],
        position: usize,
        t: f64,
        policy: IndexPolicy,
        renormalize: bool,
    ) -> Result<Frame> {
        let start = self.window_start(keyframes.len(), position, policy)?;
        let window = &keyframes[start..start + self.window_size()];

        let channels = window[0].channel_count();
        if let Some(other) = window.iter().find(|f| f.channel_count() != channels) {
            log::error!(
                "同一窗口内混用了 {} 与 {} 分量的关键帧",
                channels,
                other.channel_count()
            );
            return Err(EngineError::MalformedKeyframeRecord {
                len: other.channel_count(),
            });
        }

        match self {
            Self::Identity => Ok(window[0]),
            Self::Linear => {
                let a = window[0].data();
                let b = window[1].data();
                let v: Vec<f64> = (0..channels).map(|i| lerp(a[i], b[i], t)).collect();
                Frame::from_interpolated(&v, renormalize)
            }
            Self::CatmullRom | Self::BSpline => {
                let p: Vec<Vec<f64>> = window.iter().map(Frame::data).collect();
                let curve = if *self == Self::CatmullRom { catmull_rom } else { b_spline };
                let v: Vec<f64> = (0..channels)
                    .map(|i| curve(p[0][i], p[1][i], p[2][i], p[3][i], t))
                    .collect();
                Frame::from_interpolated(&v, renormalize)
            }
            Self::LinearSlerp => slerp_frames(&window[0], &window[1], t),
        }
    }
}

/// 线性插值
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Catmull-Rom 样条，在 p1 与 p2 之间插值
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// 均匀三次 B 样条（不经过控制点）
pub fn b_spline(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    (p0 + 4.0 * p1 + p2) / 6.0 - (p0 - p2) / 2.0 * t + (p0 - 2.0 * p1 + p2) / 2.0 * t2
        - (p0 - 3.0 * p1 + 3.0 * p2 - p3) / 6.0 * t3
}

fn slerp_frames(a: &Frame, b: &Frame, t: f64) -> Result<Frame> {
    let translation: TranslationVec = a
        .translation
        .to_dvec3()
        .lerp(b.translation.to_dvec3(), t)
        .into();

    let orientation = match (a.orientation, b.orientation) {
        (Orientation::Quaternion(qa), Orientation::Quaternion(qb)) => {
            let q = qa.to_dquat().normalize().slerp(qb.to_dquat().normalize(), t);
            Orientation::Quaternion(Quaternion::from_dquat(q)?)
        }
        // 欧拉角没有球面插值，退化为逐通道线性插值
        _ => {
            let v: Vec<f64> = a
                .data()
                .iter()
                .zip(b.data())
                .map(|(x, y)| lerp(*x, y, t))
                .collect();
            return Frame::from_interpolated(&v, false);
        }
    };

    Ok(Frame::new(orientation, translation))
}

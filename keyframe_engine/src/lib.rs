//! Keyframe Engine - 关键帧插值与刚体变换引擎
//!
//! 提供：
//! - 四元数 / 欧拉角朝向表示
//! - 缩放、平移、旋转的 4x4 列主序变换矩阵
//! - 关键帧（Frame）与扁平通道向量的互相转换
//! - 线性、Catmull-Rom、均匀三次 B 样条插值
//! - 关键帧文件解析与逐 tick 播放

pub mod animation;
pub mod config;
pub mod render;
pub mod transform;

pub use animation::{
    AnimationClock, AnimationPlayer, Frame, FrameMatrices, IndexPolicy, Interpolation,
    KeyframeFile, KeyframeTrack, PlaybackState,
};
pub use config::{get_config, reset_config, set_config, AnimationConfig};
pub use render::{MatrixStack, SoftwareMatrixStack};
pub use transform::{
    EulerAngles, Orientation, OrientationKind, Quaternion, ScalingVec, TransformMatrix,
    TranslationVec,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed keyframe record: expected 6 or 7 values, got {len}")]
    MalformedKeyframeRecord { len: usize },

    #[error("Keyframe index out of range: window at {index} does not fit {len} keyframes")]
    KeyframeIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid orientation: quaternion has zero norm")]
    InvalidOrientation,

    #[error("Keyframe parse error at line {line}: {message}")]
    KeyframeParse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

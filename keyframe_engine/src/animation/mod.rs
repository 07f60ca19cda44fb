//! 动画系统
//!
//! 提供关键帧位姿、插值算法、关键帧文件解析以及逐 tick 播放。

mod clock;
mod frame;
mod interpolation;
mod keyframe_file;
mod player;
mod track;

pub use clock::{AnimationClock, PlaybackState};
pub use frame::{Frame, FrameMatrices};
pub use interpolation::{b_spline, catmull_rom, lerp, IndexPolicy, Interpolation};
pub use keyframe_file::KeyframeFile;
pub use player::AnimationPlayer;
pub use track::KeyframeTrack;

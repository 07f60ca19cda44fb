//! 动画配置
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。

use std::sync::RwLock;
use std::time::Duration;

use once_cell::sync::Lazy;

use crate::animation::{IndexPolicy, Interpolation};

/// 动画配置（扁平化，不嵌套）
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    // ========== 时间轴 ==========
    /// 每个 tick 推进的关键帧间隔比例，默认 0.01
    pub delta_t: f64,
    /// 刷新帧率，默认 60
    pub fps: u32,

    // ========== 插值 ==========
    /// 关键帧窗口越界时的处理策略，默认 ModuloWrap
    pub index_policy: IndexPolicy,
    /// 控制文件未指定插值方式时使用的默认值，默认 CatmullRom
    pub default_interpolation: Interpolation,
    /// 插值后是否重新归一化四元数，默认 false
    pub renormalize_quaternions: bool,

    // ========== 加载 ==========
    /// 关键帧文件中的欧拉角是否为角度，默认 true
    pub angles_in_degrees: bool,

    // ========== 调试 ==========
    /// 是否输出逐 tick 调试日志，默认 false
    pub debug_log: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            // 每 100 个 tick 走完一段关键帧
            delta_t: 0.01,
            fps: 60,

            // 取模索引可以让多个物体共用一个时钟循环播放
            index_policy: IndexPolicy::ModuloWrap,
            default_interpolation: Interpolation::CatmullRom,
            // 保持逐通道插值的原始结果
            renormalize_quaternions: false,

            angles_in_degrees: true,

            debug_log: false,
        }
    }
}

impl AnimationConfig {
    /// 两次 tick 之间的时间间隔
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// 全局配置实例
static ANIMATION_CONFIG: Lazy<RwLock<AnimationConfig>> =
    Lazy::new(|| RwLock::new(AnimationConfig::default()));

/// 获取当前配置（只读）
pub fn get_config() -> AnimationConfig {
    match ANIMATION_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// 手动设置配置（用于运行时调试）
pub fn set_config(config: AnimationConfig) {
    match ANIMATION_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(AnimationConfig::default());
}

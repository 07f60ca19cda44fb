//! 关键帧轨道 - 单个物体的关键帧序列与当前插值结果

use crate::config::get_config;
use crate::{EngineError, Result};

use super::{Frame, IndexPolicy, Interpolation, KeyframeFile};

/// 关键帧轨道
#[derive(Clone, Debug)]
pub struct KeyframeTrack {
    /// 轨道名称
    pub name: String,
    /// 关键帧（加载后只读）
    keyframes: Vec<Frame>,
    interpolation: Interpolation,
    /// 相对共享时钟的关键帧偏移
    phase: usize,
    /// 最近一次插值结果
    current: Frame,
}

impl KeyframeTrack {
    pub fn new(
        name: impl Into<String>,
        keyframes: Vec<Frame>,
        interpolation: Interpolation,
    ) -> Self {
        let current = keyframes.first().copied().unwrap_or_default();
        Self {
            name: name.into(),
            keyframes,
            interpolation,
            phase: 0,
            current,
        }
    }

    /// 创建并检查所有关键帧使用同一种朝向表示
    pub fn try_new(
        name: impl Into<String>,
        keyframes: Vec<Frame>,
        interpolation: Interpolation,
    ) -> Result<Self> {
        let track = Self::new(name, keyframes, interpolation);
        track.validate()?;
        Ok(track)
    }

    /// 从关键帧文件创建，文件未指定插值方式时使用全局配置的默认值
    pub fn from_file(name: impl Into<String>, file: KeyframeFile) -> Result<Self> {
        Self::from_file_with(name, file, get_config().default_interpolation)
    }

    /// 从关键帧文件创建，文件未指定插值方式时使用 `default_interpolation`
    pub fn from_file_with(
        name: impl Into<String>,
        file: KeyframeFile,
        default_interpolation: Interpolation,
    ) -> Result<Self> {
        let interpolation = file.interpolation.unwrap_or(default_interpolation);
        Self::try_new(name, file.keyframes, interpolation)
    }

    /// 关键帧分量数必须一致
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.keyframes.first() else {
            return Ok(());
        };
        let channels = first.channel_count();
        match self.keyframes.iter().find(|f| f.channel_count() != channels) {
            Some(other) => {
                log::error!(
                    "轨道 {} 混用了 {} 与 {} 分量的关键帧",
                    self.name,
                    channels,
                    other.channel_count()
                );
                Err(EngineError::MalformedKeyframeRecord {
                    len: other.channel_count(),
                })
            }
            None => Ok(()),
        }
    }

    pub fn with_phase(mut self, phase: usize) -> Self {
        self.phase = phase;
        self
    }

    pub fn keyframes(&self) -> &[Frame] {
        &self.keyframes
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn current_frame(&self) -> &Frame {
        &self.current
    }

    /// 时钟索引加上相位后，插值窗口是否仍在序列内
    pub fn fits_window(&self, key_index: usize, policy: IndexPolicy) -> bool {
        let position = key_index.saturating_add(self.phase);
        self.interpolation.window_fits(self.keyframes.len(), position, policy)
    }

    /// 求值，不修改当前帧
    pub fn evaluate(
        &self,
        key_index: usize,
        offset: f64,
        policy: IndexPolicy,
        renormalize: bool,
    ) -> Result<Frame> {
        let position = key_index.saturating_add(self.phase);
        self.interpolation.evaluate(&self.keyframes, position, offset, policy, renormalize)
    }

    /// 求值并替换当前帧
    pub fn update(
        &mut self,
        key_index: usize,
        offset: f64,
        policy: IndexPolicy,
        renormalize: bool,
    ) -> Result<&Frame> {
        self.current = self.evaluate(key_index, offset, policy, renormalize)?;
        Ok(&self.current)
    }

    pub(crate) fn set_current(&mut self, frame: Frame) {
        self.current = frame;
    }
}

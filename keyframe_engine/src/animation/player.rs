//! 动画播放器 - 共享时钟驱动多条关键帧轨道
//!
//! 外部事件循环每个 tick 调用一次 [`AnimationPlayer::update`]，渲染时读取各轨道的当前帧。

use std::time::Duration;

use glam::DMat4;

use crate::config::{get_config, AnimationConfig};
use crate::render::{MatrixStack, SoftwareMatrixStack};
use crate::{EngineError, Result};

use super::{AnimationClock, Frame, IndexPolicy, KeyframeTrack};

/// 动画播放器
pub struct AnimationPlayer {
    clock: AnimationClock,
    tracks: Vec<KeyframeTrack>,
    policy: IndexPolicy,
    renormalize_quaternions: bool,
    tick_interval: Duration,
    debug_log: bool,
}

impl AnimationPlayer {
    /// 使用全局配置创建
    pub fn new() -> Self {
        Self::with_config(&get_config())
    }

    pub fn with_config(config: &AnimationConfig) -> Self {
        Self {
            clock: AnimationClock::new(config.delta_t, 0),
            tracks: Vec::new(),
            policy: config.index_policy,
            renormalize_quaternions: config.renormalize_quaternions,
            tick_interval: config.tick_interval(),
            debug_log: config.debug_log,
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn policy(&self) -> IndexPolicy {
        self.policy
    }

    /// 外部事件循环两次调用 [`update`](Self::update) 之间的间隔
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn tracks(&self) -> &[KeyframeTrack] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&KeyframeTrack> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut KeyframeTrack> {
        self.tracks.get_mut(index)
    }

    /// 添加轨道并生成第一帧，返回轨道索引
    ///
    /// 失败时轨道不会被加入，循环起点保持不变。
    pub fn add_track(&mut self, track: KeyframeTrack) -> Result<usize> {
        track.validate()?;

        let previous_start = self.clock.start_index();
        self.tracks.push(track);
        self.clock.set_start_index(self.loop_start());

        if let Err(e) = self.refresh_after_add() {
            if let Some(track) = self.tracks.pop() {
                log::error!("添加轨道 {} 失败: {}", track.name, e);
            }
            self.clock.set_start_index(previous_start);
            return Err(e);
        }

        let index = self.tracks.len() - 1;
        log::info!(
            "添加轨道 {}: {} 个关键帧, 插值方式 {}",
            self.tracks[index].name,
            self.tracks[index].keyframes().len(),
            self.tracks[index].interpolation().token()
        );
        Ok(index)
    }

    /// 所有轨道都必须能从循环起点播放，然后按当前位置重新求值
    fn refresh_after_add(&mut self) -> Result<()> {
        let start = self.clock.start_index();
        if let Some(track) = self.tracks.iter().find(|t| !t.fits_window(start, self.policy)) {
            log::error!("轨道 {} 无法从关键帧 {} 开始播放", track.name, start);
            return Err(EngineError::KeyframeIndexOutOfRange {
                index: start.saturating_add(track.phase()),
                len: track.keyframes().len(),
            });
        }

        let (key_index, offset) = self.clock.position();
        let frames = self.evaluate_all(key_index, offset)?;
        self.commit(frames);
        Ok(())
    }

    /// 循环起点：取模策略从 0 开始，重置策略从四点窗口的中心开始
    fn loop_start(&self) -> usize {
        match self.policy {
            IndexPolicy::ModuloWrap => 0,
            IndexPolicy::ResetToStart => self
                .tracks
                .iter()
                .map(|t| t.interpolation().lead())
                .max()
                .unwrap_or(0),
        }
    }

    /// 全部轨道求值成功后才写回
    fn evaluate_all(&self, key_index: usize, offset: f64) -> Result<Vec<Frame>> {
        self.tracks
            .iter()
            .map(|t| t.evaluate(key_index, offset, self.policy, self.renormalize_quaternions))
            .collect()
    }

    fn commit(&mut self, frames: Vec<Frame>) {
        for (track, frame) in self.tracks.iter_mut().zip(frames) {
            track.set_current(frame);
        }
    }

    /// 推进一个 tick 并更新所有轨道
    ///
    /// 任一轨道求值失败时所有轨道都保留上一帧。
    pub fn update(&mut self) -> Result<()> {
        self.clock.tick();
        let (key_index, offset) = self.clock.position();

        if self.policy == IndexPolicy::ResetToStart
            && self.tracks.iter().any(|t| !t.fits_window(key_index, self.policy))
        {
            // 本 tick 只重置索引，保留上一帧
            self.clock.rewind();
            if self.debug_log {
                log::debug!(
                    "关键帧索引 {} 越界，重置到 {}",
                    key_index,
                    self.clock.start_index()
                );
            }
            return Ok(());
        }

        let frames = self.evaluate_all(key_index, offset)?;
        self.commit(frames);

        if self.debug_log {
            log::debug!(
                "tick {}: 关键帧 {}, 偏移 {:.3}",
                self.clock.frame_counter(),
                key_index,
                offset
            );
        }
        Ok(())
    }

    /// 停止播放并回到第一帧
    pub fn reset(&mut self) -> Result<()> {
        self.clock.stop();
        let (key_index, offset) = self.clock.position();
        let frames = self.evaluate_all(key_index, offset)?;
        self.commit(frames);
        Ok(())
    }

    /// 把每条轨道的当前帧压入矩阵栈求出模型矩阵
    pub fn model_matrices(&self) -> Vec<DMat4> {
        let mut stack = SoftwareMatrixStack::new();
        self.tracks
            .iter()
            .map(|track| {
                stack.push_matrix();
                track.current_frame().apply_to(&mut stack);
                let m = stack.current();
                stack.pop_matrix();
                m
            })
            .collect()
    }
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Frame, Interpolation};
    use glam::DVec3;

    fn config(policy: IndexPolicy, delta_t: f64) -> AnimationConfig {
        AnimationConfig {
            delta_t,
            index_policy: policy,
            ..AnimationConfig::default()
        }
    }

    fn ramp_track(n: usize, interpolation: Interpolation) -> KeyframeTrack {
        let keyframes = (0..n)
            .map(|i| Frame::from_vector(&[i as f64, 0.0, 0.0, 0.0, 0.0, 0.0], true).unwrap())
            .collect();
        KeyframeTrack::new("ramp", keyframes, interpolation)
    }

    #[test]
    fn test_first_frame_generated_on_add() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        let index = player.add_track(ramp_track(5, Interpolation::CatmullRom)).unwrap();
        let frame = player.track(index).unwrap().current_frame();
        // 取模策略下位置 0 对应中心关键帧 1
        assert!((frame.translation.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_add_track_rejects_short_sequence() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        assert!(player.add_track(ramp_track(3, Interpolation::BSpline)).is_err());
        assert!(player.tracks().is_empty());
    }

    #[test]
    fn test_modulo_playback_loops() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        player.add_track(ramp_track(3, Interpolation::Linear)).unwrap();

        let mut xs = Vec::new();
        for _ in 0..8 {
            player.update().unwrap();
            xs.push(player.tracks()[0].current_frame().translation.x);
        }
        assert_eq!(xs, vec![0.5, 1.0, 1.5, 0.0, 0.5, 1.0, 1.5, 0.0]);
    }

    #[test]
    fn test_reset_to_start_playback() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ResetToStart, 0.5));
        player.add_track(ramp_track(5, Interpolation::CatmullRom)).unwrap();
        assert_eq!(player.clock().position(), (1, 0.0));

        let mut indices = Vec::new();
        for _ in 0..6 {
            player.update().unwrap();
            indices.push(player.clock().key_index());
        }
        // 中心索引只能在 1、2 之间，越界的 tick 直接回到 1
        assert_eq!(indices, vec![1, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_phase_offsets_tracks() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.25));
        player.add_track(ramp_track(4, Interpolation::Linear)).unwrap();
        player
            .add_track(ramp_track(4, Interpolation::Linear).with_phase(1))
            .unwrap();
        player.update().unwrap();
        let a = player.tracks()[0].current_frame().translation.x;
        let b = player.tracks()[1].current_frame().translation.x;
        assert!((a - 0.25).abs() < 1e-12);
        assert!((b - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_reset_returns_to_first_frame() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        player.add_track(ramp_track(4, Interpolation::Linear)).unwrap();
        for _ in 0..3 {
            player.update().unwrap();
        }
        player.reset().unwrap();
        assert_eq!(player.clock().frame_counter(), 0);
        assert_eq!(player.tracks()[0].current_frame().translation.x, 0.0);
    }

    #[test]
    fn test_add_track_rejects_mixed_orientation_kinds() {
        let keyframes = vec![
            Frame::from_vector(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0], true).unwrap(),
            Frame::from_vector(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0], true).unwrap(),
            Frame::from_vector(&[2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], true).unwrap(),
        ];
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        let track = KeyframeTrack::new("mixed", keyframes, Interpolation::Linear);
        let result = player.add_track(track);
        assert!(matches!(result, Err(EngineError::MalformedKeyframeRecord { len: 7 })));
        assert!(player.tracks().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_every_track() {
        let mut config = config(IndexPolicy::ModuloWrap, 0.5);
        config.renormalize_quaternions = true;
        let mut player = AnimationPlayer::with_config(&config);
        player.add_track(ramp_track(3, Interpolation::Linear)).unwrap();

        // q 与 -q 的中点是零四元数，无法归一化
        let flip = [[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0]];
        let keyframes = [flip[0], flip[1], flip[0]]
            .iter()
            .map(|v| Frame::from_vector(v, true).unwrap())
            .collect();
        player
            .add_track(KeyframeTrack::new("flip", keyframes, Interpolation::Linear))
            .unwrap();

        let result = player.update();
        assert!(matches!(result, Err(EngineError::InvalidOrientation)));
        assert_eq!(player.tracks()[0].current_frame().translation.x, 0.0);
        assert_eq!(player.tracks()[1].current_frame(), &player.tracks()[1].keyframes()[0]);

        // 下一个 tick 到达关键帧 1，两条轨道一起前进
        player.update().unwrap();
        assert_eq!(player.tracks()[0].current_frame().translation.x, 1.0);
    }

    #[test]
    fn test_add_track_keeps_existing_tracks_playable() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ResetToStart, 0.25));
        player.add_track(ramp_track(2, Interpolation::Linear)).unwrap();

        // 四点窗口会把循环起点移到 1，两帧的线性轨道无法从 1 开始
        let result = player.add_track(ramp_track(4, Interpolation::CatmullRom));
        assert!(matches!(
            result,
            Err(EngineError::KeyframeIndexOutOfRange { index: 1, len: 2 })
        ));
        assert_eq!(player.tracks().len(), 1);
        assert_eq!(player.clock().start_index(), 0);
        assert_eq!(player.clock().position(), (0, 0.0));

        let mut xs = Vec::new();
        for _ in 0..4 {
            player.update().unwrap();
            xs.push(player.tracks()[0].current_frame().translation.x);
        }
        assert_eq!(xs, vec![0.25, 0.5, 0.75, 0.75]);
    }

    #[test]
    fn test_tick_interval_follows_fps() {
        let config = AnimationConfig {
            fps: 50,
            ..AnimationConfig::default()
        };
        let player = AnimationPlayer::with_config(&config);
        assert!((player.tick_interval().as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_model_matrices() {
        let mut player = AnimationPlayer::with_config(&config(IndexPolicy::ModuloWrap, 0.5));
        player.add_track(ramp_track(3, Interpolation::Linear)).unwrap();
        player.update().unwrap();
        let matrices = player.model_matrices();
        assert_eq!(matrices.len(), 1);
        let p = matrices[0].transform_point3(DVec3::ZERO);
        assert!((p - DVec3::new(0.5, 0.0, 0.0)).length() < 1e-12);
    }
}

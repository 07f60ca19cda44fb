//! 动画时钟 - 把 tick 映射为（关键帧索引, 段内偏移）

/// 播放状态
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// 尚未开始
    Idle,
    /// 播放中
    Playing,
}

/// 动画时钟
#[derive(Clone, Debug)]
pub struct AnimationClock {
    /// 每个 tick 的偏移增量
    delta_t: f64,
    /// 当前段内偏移 [0, 1)
    offset: f64,
    /// 当前关键帧索引
    key_index: usize,
    /// 循环起点
    start_index: usize,
    /// 累计 tick 数
    frame_counter: u64,
    state: PlaybackState,
}

impl AnimationClock {
    pub fn new(delta_t: f64, start_index: usize) -> Self {
        Self {
            delta_t,
            offset: 0.0,
            key_index: start_index,
            start_index,
            frame_counter: 0,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    pub fn set_delta_t(&mut self, delta_t: f64) {
        self.delta_t = delta_t;
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// （关键帧索引, 段内偏移）
    pub fn position(&self) -> (usize, f64) {
        (self.key_index, self.offset)
    }

    /// 推进一个 tick，进入下一段时返回 true
    pub fn tick(&mut self) -> bool {
        self.state = PlaybackState::Playing;
        self.frame_counter += 1;
        self.offset += self.delta_t;
        if self.offset >= 1.0 {
            self.offset = 0.0;
            self.key_index += 1;
            return true;
        }
        false
    }

    /// 索引回到循环起点
    pub fn rewind(&mut self) {
        self.key_index = self.start_index;
        self.offset = 0.0;
    }

    /// 修改循环起点，仅在 Idle 时同时移动当前索引
    pub fn set_start_index(&mut self, start_index: usize) {
        self.start_index = start_index;
        if self.state == PlaybackState::Idle {
            self.key_index = start_index;
        }
    }

    /// 停止并回到初始状态
    pub fn stop(&mut self) {
        self.rewind();
        self.frame_counter = 0;
        self.state = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let clock = AnimationClock::new(0.01, 1);
        assert_eq!(clock.state(), PlaybackState::Idle);
        assert_eq!(clock.position(), (1, 0.0));
    }

    #[test]
    fn test_tick_advances_segment() {
        let mut clock = AnimationClock::new(0.25, 0);
        assert!(!clock.tick());
        assert_eq!(clock.state(), PlaybackState::Playing);
        assert!(!clock.tick());
        assert!(!clock.tick());
        assert!(clock.tick());
        assert_eq!(clock.position(), (1, 0.0));
        assert_eq!(clock.frame_counter(), 4);
    }

    #[test]
    fn test_offset_stays_below_one() {
        let mut clock = AnimationClock::new(0.01, 0);
        for _ in 0..1000 {
            clock.tick();
            assert!(clock.offset() < 1.0);
        }
        // 浮点累加可能多走或少走一个 tick，但段数应接近 10
        assert!((9..=10).contains(&clock.key_index()));
    }

    #[test]
    fn test_rewind_and_stop() {
        let mut clock = AnimationClock::new(0.5, 1);
        clock.tick();
        clock.tick();
        assert_eq!(clock.key_index(), 2);
        clock.rewind();
        assert_eq!(clock.position(), (1, 0.0));
        assert_eq!(clock.state(), PlaybackState::Playing);

        clock.set_start_index(0);
        assert_eq!(clock.key_index(), 1);
        clock.stop();
        assert_eq!(clock.position(), (0, 0.0));
        assert_eq!(clock.state(), PlaybackState::Idle);
        assert_eq!(clock.frame_counter(), 0);
    }
}

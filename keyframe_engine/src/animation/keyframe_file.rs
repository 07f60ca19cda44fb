//! 关键帧文件解析
//!
//! 支持两种文本格式：
//! - 每行一个关键帧记录：`tx ty tz ex ey ez` 或 `tx ty tz qw qx qy qz`
//! - 控制文件：`# 注释`、`interpolater <插值方式>`、`kf <关键帧记录>`
//!
//! 欧拉角默认按角度书写。

use std::fs;
use std::path::Path;

use crate::config::get_config;
use crate::{EngineError, Result};

use super::{Frame, Interpolation};

/// 关键帧文件数据
#[derive(Clone, Debug, Default)]
pub struct KeyframeFile {
    pub keyframes: Vec<Frame>,
    /// 控制文件中指定的插值方式
    pub interpolation: Option<Interpolation>,
}

impl KeyframeFile {
    /// 从文件加载
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("无法打开关键帧文件 {}: {}", path.display(), e);
            EngineError::Io(e)
        })?;
        Self::parse(&content)
    }

    /// 按全局配置的角度单位解析
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_with(content, get_config().angles_in_degrees)
    }

    /// 解析文本内容
    pub fn parse_with(content: &str, angles_in_degrees: bool) -> Result<Self> {
        let mut keyframes = Vec::new();
        let mut interpolation = None;

        for (i, raw_line) in content.lines().enumerate() {
            let line_no = i + 1;
            let line = raw_line.trim();

            // 跳过空行和注释
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let record = match tokens.clone().next() {
                Some("interpolater") | Some("interpolation") => {
                    tokens.next();
                    match tokens.next() {
                        Some(token) => {
                            interpolation = Interpolation::from_token(token).or(interpolation)
                        }
                        None => log::warn!("第 {} 行缺少插值方式", line_no),
                    }
                    continue;
                }
                Some("kf") => {
                    tokens.next();
                    tokens
                }
                _ => tokens,
            };

            let values = Self::parse_record(record, line_no)?;
            let frame = Frame::from_vector(&values, !angles_in_degrees).map_err(|e| {
                log::error!("第 {} 行关键帧无效: {}", line_no, e);
                e
            })?;

            // 同一序列只能使用一种朝向表示
            if let Some(first) = keyframes.first().map(Frame::channel_count) {
                if frame.channel_count() != first {
                    log::error!(
                        "第 {} 行关键帧有 {} 个分量，与首个关键帧的 {} 个不一致",
                        line_no,
                        frame.channel_count(),
                        first
                    );
                    return Err(EngineError::MalformedKeyframeRecord {
                        len: frame.channel_count(),
                    });
                }
            }
            keyframes.push(frame);
        }

        log::info!(
            "关键帧解析完成: {} 个关键帧, 插值方式 {:?}",
            keyframes.len(),
            interpolation.map(|i: Interpolation| i.token())
        );

        Ok(Self {
            keyframes,
            interpolation,
        })
    }

    /// 解析一行数值记录
    fn parse_record<'a>(tokens: impl Iterator<Item = &'a str>, line_no: usize) -> Result<Vec<f64>> {
        tokens
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    log::error!("第 {} 行数值无效: {:?}", line_no, token);
                    EngineError::KeyframeParse {
                        line: line_no,
                        message: format!("invalid number {:?}", token),
                    }
                })
            })
            .collect()
    }

    /// 关键帧数量
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::OrientationKind;
    use std::f64::consts::PI;

    #[test]
    fn test_parse_plain_records() {
        let content = "0 0 0 0 0 0\n\n1 2 3 90 0 0\n  \n4 5 6 0 0 0\n";
        let file = KeyframeFile::parse_with(content, true).unwrap();
        assert_eq!(file.keyframe_count(), 3);
        assert_eq!(file.interpolation, None);
        assert_eq!(file.keyframes[1].orientation_kind(), OrientationKind::Euler);
        assert!((file.keyframes[1].data()[3] - PI / 2.0).abs() < 1e-9);

        let file = KeyframeFile::parse_with("4 5 6 1 0 0 0\n", true).unwrap();
        assert_eq!(file.keyframes[0].orientation_kind(), OrientationKind::Quaternion);
    }

    #[test]
    fn test_mixed_orientation_kinds_rejected() {
        let content = "0 0 0 0 0 0\n1 0 0 0 0 0\n2 0 0 1 0 0 0\n";
        let result = KeyframeFile::parse_with(content, true);
        assert!(matches!(result, Err(EngineError::MalformedKeyframeRecord { len: 7 })));
    }

    #[test]
    fn test_parse_control_file() {
        let content = "\
# walking cycle
interpolater BSPLINE
kf 0 0 0 0 0 0
kf 1 0 0 0 45 0
kf 2 0 0 0 90 0
kf 3 0 0 0 135 0
";
        let file = KeyframeFile::parse_with(content, true).unwrap();
        assert_eq!(file.interpolation, Some(Interpolation::BSpline));
        assert_eq!(file.keyframe_count(), 4);
        assert!((file.keyframes[3].translation.x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_interpolation_is_not_fatal() {
        let file = KeyframeFile::parse_with("interpolater Cubic\nkf 0 0 0 0 0 0\n", true).unwrap();
        assert_eq!(file.interpolation, None);
        assert_eq!(file.keyframe_count(), 1);
    }

    #[test]
    fn test_radian_angles() {
        let file = KeyframeFile::parse_with("0 0 0 1.5 0 0\n", false).unwrap();
        assert!((file.keyframes[0].data()[3] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_token_count_is_fatal() {
        let result = KeyframeFile::parse_with("0 0 0 0 0 0\n1 2 3 4 5\n", true);
        assert!(matches!(result, Err(EngineError::MalformedKeyframeRecord { len: 5 })));
    }

    #[test]
    fn test_invalid_number() {
        match KeyframeFile::parse_with("0 0 0 0 0 0\n0 0 x 0 0 0\n", true) {
            Err(EngineError::KeyframeParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = KeyframeFile::load("/nonexistent/keyframes.in");
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}

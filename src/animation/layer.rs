//! 非破坏性动画层栈（NLA 等价物）
//!
//! 推送一个剪辑会新建一条轨道并在其上放一个条带，
//! 条带记录起始帧，剪辑数据原样保留，不合并进单一轨道。

use super::Clip;

/// 动画条带：一个剪辑在层栈上的放置
#[derive(Clone, Debug)]
pub struct NlaStrip {
    pub name: String,
    pub start_frame: i32,
    pub clip: Clip,
}

/// 动画轨道：有序的条带容器
#[derive(Clone, Debug)]
pub struct NlaTrack {
    pub name: String,
    pub strips: Vec<NlaStrip>,
}

/// 动画层栈
#[derive(Clone, Debug, Default)]
pub struct NlaStack {
    tracks: Vec<NlaTrack>,
}

impl NlaStack {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// 推送剪辑：新建轨道 + 条带
    ///
    /// 轨道名称可由调用方指定，缺省时取剪辑名称；
    /// 条带名称始终取剪辑名称。
    pub fn push(&mut self, clip: Clip, track_name: Option<String>, start_frame: i32) {
        let strip_name = clip.name.clone();
        let track_name = track_name.unwrap_or_else(|| clip.name.clone());
        self.tracks.push(NlaTrack {
            name: track_name,
            strips: vec![NlaStrip {
                name: strip_name,
                start_frame,
                clip,
            }],
        });
    }

    pub fn tracks(&self) -> &[NlaTrack] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [NlaTrack] {
        &mut self.tracks
    }

    /// 所有条带的可变迭代器（按轨道顺序）
    pub fn strips_mut(&mut self) -> impl Iterator<Item = &mut NlaStrip> {
        self.tracks.iter_mut().flat_map(|t| t.strips.iter_mut())
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_creates_track_per_clip() {
        let mut stack = NlaStack::new();
        stack.push(Clip::new("walk"), None, 0);
        stack.push(Clip::new("run"), Some("locomotion".to_string()), 30);

        assert_eq!(stack.track_count(), 2);
        assert_eq!(stack.tracks()[0].name, "walk");
        assert_eq!(stack.tracks()[0].strips[0].name, "walk");
        assert_eq!(stack.tracks()[1].name, "locomotion");
        assert_eq!(stack.tracks()[1].strips[0].start_frame, 30);
        assert_eq!(stack.tracks()[1].strips[0].clip.name, "run");
    }
}

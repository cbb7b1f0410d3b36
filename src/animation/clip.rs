//! 剪辑 - 单个导入文件的全部关键帧数据

use std::collections::HashMap;

use super::track::{Channel, ChannelTrack};
use crate::{Result, RootMotionError};

/// 动画剪辑
///
/// 轨道表按骨骼名称分组（对应宿主曲线路径中的骨骼名），
/// 每个骨骼下按通道存放标量轨道。
#[derive(Clone, Debug, Default)]
pub struct Clip {
    /// 剪辑名称（导入文件的主干名）
    pub name: String,
    tracks: HashMap<String, HashMap<Channel, ChannelTrack>>,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: HashMap::new(),
        }
    }

    /// 查找轨道
    pub fn track(&self, bone: &str, channel: Channel) -> Option<&ChannelTrack> {
        self.tracks.get(bone).and_then(|t| t.get(&channel))
    }

    pub fn track_mut(&mut self, bone: &str, channel: Channel) -> Option<&mut ChannelTrack> {
        self.tracks.get_mut(bone).and_then(|t| t.get_mut(&channel))
    }

    /// 获取或创建轨道
    pub fn ensure_track(&mut self, bone: &str, channel: Channel) -> &mut ChannelTrack {
        self.tracks
            .entry(bone.to_string())
            .or_default()
            .entry(channel)
            .or_default()
    }

    /// 移除单条轨道
    pub fn remove_track(&mut self, bone: &str, channel: Channel) -> Option<ChannelTrack> {
        let channels = self.tracks.get_mut(bone)?;
        let removed = channels.remove(&channel);
        if channels.is_empty() {
            self.tracks.remove(bone);
        }
        removed
    }

    /// 移除骨骼的所有轨道
    pub fn remove_bone_tracks(&mut self, bone: &str) -> Option<HashMap<Channel, ChannelTrack>> {
        self.tracks.remove(bone)
    }

    /// 插入关键帧（轨道不存在时创建）
    pub fn insert_keyframe(&mut self, bone: &str, channel: Channel, frame: u32, value: f32) {
        self.ensure_track(bone, channel).insert_keyframe(frame, value);
    }

    pub fn contains_bone_track(&self, bone: &str) -> bool {
        self.tracks.contains_key(bone)
    }

    /// 轨道表中的骨骼名称
    pub fn bone_track_names(&self) -> impl Iterator<Item = &String> {
        self.tracks.keys()
    }

    /// 骨骼的通道列表（任意顺序）
    pub fn bone_channels(&self, bone: &str) -> Vec<Channel> {
        self.tracks
            .get(bone)
            .map(|t| t.keys().copied().collect())
            .unwrap_or_default()
    }

    /// 剥离轨道路径里的骨骼名称前缀
    ///
    /// 已剥离的名称不再匹配前缀，重复执行是空操作。
    /// 剥离后与现有轨道键冲突时报 NameCollision，不合并轨道。
    pub fn strip_track_prefix(&mut self, prefix: &str) -> Result<()> {
        if prefix.is_empty() {
            return Ok(());
        }
        let renames: Vec<(String, String)> = self
            .tracks
            .keys()
            .filter(|name| name.contains(prefix))
            .map(|name| (name.clone(), name.replace(prefix, "")))
            .collect();
        for (old, new) in &renames {
            if self.tracks.contains_key(new) {
                return Err(RootMotionError::NameCollision(new.clone()));
            }
            if let Some(channels) = self.tracks.remove(old) {
                self.tracks.insert(new.clone(), channels);
            }
        }
        Ok(())
    }

    /// 所有位移轨道的关键帧值乘以系数（旋转轨道不动）
    pub fn scale_location_values(&mut self, factor: f32) {
        for channels in self.tracks.values_mut() {
            for (channel, track) in channels.iter_mut() {
                if channel.is_location() {
                    track.scale_values(factor);
                }
            }
        }
    }

    /// 剪辑时长（最大帧号）
    pub fn duration(&self) -> u32 {
        self.tracks
            .values()
            .flat_map(|channels| channels.values())
            .filter_map(|t| t.max_frame_index())
            .max()
            .unwrap_or(0)
    }

    /// 所有轨道中的最小帧号
    pub fn first_frame(&self) -> Option<u32> {
        self.tracks
            .values()
            .flat_map(|channels| channels.values())
            .filter_map(|t| t.min_frame_index())
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_clip() -> Clip {
        let mut clip = Clip::new("walk");
        clip.insert_keyframe("mixamorig:Hips", Channel::LocationX, 0, 1.0);
        clip.insert_keyframe("mixamorig:Hips", Channel::LocationX, 10, 2.0);
        clip.insert_keyframe("mixamorig:Spine", Channel::RotationW, 0, 1.0);
        clip
    }

    #[test]
    fn test_strip_track_prefix_idempotent() {
        let mut clip = walk_clip();
        clip.strip_track_prefix("mixamorig:").unwrap();
        assert!(clip.contains_bone_track("Hips"));
        assert!(clip.contains_bone_track("Spine"));
        assert!(!clip.contains_bone_track("mixamorig:Hips"));

        // 第二次执行没有匹配的前缀，数据不变
        let before = clip.clone();
        clip.strip_track_prefix("mixamorig:").unwrap();
        assert_eq!(
            before.bone_channels("Hips").len(),
            clip.bone_channels("Hips").len()
        );
        assert_eq!(before.duration(), clip.duration());
    }

    #[test]
    fn test_strip_track_prefix_collision() {
        let mut clip = walk_clip();
        clip.insert_keyframe("Hips", Channel::LocationY, 0, 0.5);
        assert!(matches!(
            clip.strip_track_prefix("mixamorig:"),
            Err(RootMotionError::NameCollision(_))
        ));
    }

    #[test]
    fn test_scale_location_leaves_rotation() {
        let mut clip = walk_clip();
        clip.scale_location_values(0.01);
        let x = clip.track("mixamorig:Hips", Channel::LocationX).unwrap();
        assert!((x.value_at(0).unwrap() - 0.01).abs() < 1e-6);
        assert!((x.value_at(10).unwrap() - 0.02).abs() < 1e-6);
        let w = clip.track("mixamorig:Spine", Channel::RotationW).unwrap();
        assert!((w.value_at(0).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_remove_track_prunes_empty_bone() {
        let mut clip = walk_clip();
        clip.remove_track("mixamorig:Spine", Channel::RotationW);
        assert!(!clip.contains_bone_track("mixamorig:Spine"));
    }

    #[test]
    fn test_duration_and_first_frame() {
        let clip = walk_clip();
        assert_eq!(clip.duration(), 10);
        assert_eq!(clip.first_frame(), Some(0));
        assert_eq!(Clip::new("empty").first_frame(), None);
    }
}

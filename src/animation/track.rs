//! 通道关键帧轨道
//!
//! 每条轨道对应一个 (骨骼, 通道) 对，存储帧号到标量值的有序映射。
//! 帧号是平移/旋转编辑之间的连接键，任何操作都不做重采样。

use std::collections::BTreeMap;

/// 动画通道
///
/// 旋转分量顺序与宿主曲线数组一致：w=0, x=1, y=2, z=3。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    LocationX,
    LocationY,
    LocationZ,
    RotationW,
    RotationX,
    RotationY,
    RotationZ,
}

impl Channel {
    /// 位移通道，按数组下标顺序
    pub const LOCATION: [Channel; 3] = [Channel::LocationX, Channel::LocationY, Channel::LocationZ];
    /// 旋转通道，按数组下标顺序 (w, x, y, z)
    pub const ROTATION: [Channel; 4] = [
        Channel::RotationW,
        Channel::RotationX,
        Channel::RotationY,
        Channel::RotationZ,
    ];

    /// 下标对应的位移通道
    pub fn location(axis_index: usize) -> Channel {
        Self::LOCATION[axis_index]
    }

    /// 下标对应的旋转通道
    pub fn rotation(component_index: usize) -> Channel {
        Self::ROTATION[component_index]
    }

    pub fn is_location(self) -> bool {
        matches!(
            self,
            Channel::LocationX | Channel::LocationY | Channel::LocationZ
        )
    }

    pub fn is_rotation(self) -> bool {
        !self.is_location()
    }

    /// 通道在宿主曲线数组中的下标
    pub fn array_index(self) -> usize {
        match self {
            Channel::LocationX | Channel::RotationW => 0,
            Channel::LocationY | Channel::RotationX => 1,
            Channel::LocationZ | Channel::RotationY => 2,
            Channel::RotationZ => 3,
        }
    }
}

/// 单通道关键帧轨道
#[derive(Clone, Debug, Default)]
pub struct ChannelTrack {
    keyframes: BTreeMap<u32, f32>,
}

impl ChannelTrack {
    pub fn new() -> Self {
        Self {
            keyframes: BTreeMap::new(),
        }
    }

    /// 插入关键帧，同帧覆盖并返回旧值
    pub fn insert_keyframe(&mut self, frame: u32, value: f32) -> Option<f32> {
        self.keyframes.insert(frame, value)
    }

    /// 移除关键帧
    pub fn remove_keyframe(&mut self, frame: u32) -> Option<f32> {
        self.keyframes.remove(&frame)
    }

    pub fn value_at(&self, frame: u32) -> Option<f32> {
        self.keyframes.get(&frame).copied()
    }

    /// 按帧序迭代 (帧, 值)
    pub fn keyframes(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.keyframes.iter().map(|(f, v)| (*f, *v))
    }

    /// 按帧序迭代帧号
    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.keyframes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn min_frame_index(&self) -> Option<u32> {
        self.keyframes.keys().next().copied()
    }

    pub fn max_frame_index(&self) -> Option<u32> {
        self.keyframes.keys().last().copied()
    }

    /// 所有关键帧值乘以系数
    pub fn scale_values(&mut self, factor: f32) {
        for value in self.keyframes.values_mut() {
            *value *= factor;
        }
    }

    /// 钳制所有值不小于 floor
    pub fn clamp_values_min(&mut self, floor: f32) {
        for value in self.keyframes.values_mut() {
            if *value < floor {
                *value = floor;
            }
        }
    }

    /// 钳制所有值不大于 ceiling
    pub fn clamp_values_max(&mut self, ceiling: f32) {
        for value in self.keyframes.values_mut() {
            if *value > ceiling {
                *value = ceiling;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites_same_frame() {
        let mut track = ChannelTrack::new();
        assert_eq!(track.insert_keyframe(5, 1.0), None);
        assert_eq!(track.insert_keyframe(5, 2.0), Some(1.0));
        assert_eq!(track.len(), 1);
        assert_eq!(track.value_at(5), Some(2.0));
    }

    #[test]
    fn test_frame_order_and_bounds() {
        let mut track = ChannelTrack::new();
        track.insert_keyframe(30, 0.3);
        track.insert_keyframe(1, 0.1);
        track.insert_keyframe(12, 0.2);
        let frames: Vec<u32> = track.frames().collect();
        assert_eq!(frames, vec![1, 12, 30]);
        assert_eq!(track.min_frame_index(), Some(1));
        assert_eq!(track.max_frame_index(), Some(30));
    }

    #[test]
    fn test_clamp_mixed_signs() {
        let mut track = ChannelTrack::new();
        track.insert_keyframe(0, 0.5);
        track.insert_keyframe(10, -0.2);
        let mut below = track.clone();
        below.clamp_values_max(0.0);
        assert_eq!(below.value_at(0), Some(0.0));
        assert_eq!(below.value_at(10), Some(-0.2));
        let mut above = track;
        above.clamp_values_min(0.0);
        assert_eq!(above.value_at(0), Some(0.5));
        assert_eq!(above.value_at(10), Some(0.0));
    }

    #[test]
    fn test_channel_array_index() {
        assert_eq!(Channel::location(1), Channel::LocationY);
        assert_eq!(Channel::rotation(0), Channel::RotationW);
        assert_eq!(Channel::RotationZ.array_index(), 3);
        assert!(Channel::LocationZ.is_location());
        assert!(Channel::RotationY.is_rotation());
    }
}

//! 骨骼节点

use glam::{Quat, Vec3};

/// 骨骼节点
///
/// 子骨骼通过索引引用父骨骼，父骨骼不持有子列表。
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    /// 父骨骼索引（树根为 None）
    pub parent: Option<usize>,
    /// 绑定姿态本地平移（相对父骨骼）
    pub rest_translation: Vec3,
    /// 绑定姿态本地旋转（相对父骨骼）
    pub rest_rotation: Quat,
    /// 静止长度（骨骼尾端沿竖直轴的偏移，仅用于可视化/导出）
    pub rest_length: f32,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            rest_translation: Vec3::ZERO,
            rest_rotation: Quat::IDENTITY,
            rest_length: 0.0,
        }
    }

    /// 带绑定姿态创建
    ///
    /// 静止旋转立即归一化，后续四元数运算依赖单位范数。
    pub fn with_rest(
        name: impl Into<String>,
        parent: Option<usize>,
        rest_translation: Vec3,
        rest_rotation: Quat,
    ) -> Self {
        Self {
            name: name.into(),
            parent,
            rest_translation,
            rest_rotation: rest_rotation.normalize(),
            rest_length: 0.0,
        }
    }
}

impl Default for Bone {
    fn default() -> Self {
        Self::new(String::new())
    }
}

//! 骨架（骨骼表 + 名称索引）

use std::collections::HashMap;

use glam::{Quat, Vec3};

use super::Bone;
use crate::config::ProcessConfig;
use crate::{Result, RootMotionError};

/// 骨架
///
/// 持有骨骼表和名称到索引的映射。顶点组按名称绑定骨骼，
/// 前缀剥离时需要与骨骼同步改名。
#[derive(Clone, Debug, Default)]
pub struct Armature {
    pub name: String,
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
    /// 绑定到该骨架的网格顶点组名称
    pub vertex_groups: Vec<String>,
}

impl Armature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: Vec::new(),
            name_to_index: HashMap::new(),
            vertex_groups: Vec::new(),
        }
    }

    /// 添加骨骼，返回索引
    ///
    /// 名称重复时报 NameCollision。
    pub fn add_bone(&mut self, bone: Bone) -> Result<usize> {
        if self.name_to_index.contains_key(&bone.name) {
            return Err(RootMotionError::NameCollision(bone.name.clone()));
        }
        let index = self.bones.len();
        self.name_to_index.insert(bone.name.clone(), index);
        self.bones.push(bone);
        Ok(index)
    }

    /// 通过名称查找骨骼索引
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn bone(&self, index: usize) -> &Bone {
        &self.bones[index]
    }

    pub fn bone_mut(&mut self, index: usize) -> &mut Bone {
        &mut self.bones[index]
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_index(name).map(|i| &self.bones[i])
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// 骨骼名称迭代器（按索引顺序）
    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|b| b.name.as_str())
    }

    /// 重命名骨骼
    ///
    /// 新名称已被其他骨骼占用时报 NameCollision，不静默覆盖。
    pub fn rename_bone(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let index = self
            .bone_index(old)
            .ok_or_else(|| RootMotionError::NameCollision(format!("no such bone: {}", old)))?;
        if self.name_to_index.contains_key(new) {
            return Err(RootMotionError::NameCollision(new.to_string()));
        }
        self.name_to_index.remove(old);
        self.name_to_index.insert(new.to_string(), index);
        self.bones[index].name = new.to_string();
        Ok(())
    }

    /// 骨骼的世界空间绑定姿态（沿父链累积）
    pub fn world_rest_transform(&self, index: usize) -> (Vec3, Quat) {
        let bone = &self.bones[index];
        match bone.parent {
            Some(parent) => {
                let (pt, pq) = self.world_rest_transform(parent);
                (pt + pq * bone.rest_translation, (pq * bone.rest_rotation).normalize())
            }
            None => (bone.rest_translation, bone.rest_rotation),
        }
    }

    /// 合成根骨骼：插入到髋骨正上方
    ///
    /// 新骨骼接管髋骨原来的父骨骼，髋骨改为根骨骼的子骨骼，
    /// 并重算髋骨本地绑定姿态使其世界空间绑定姿态保持不变。
    /// 髋骨已经挂在同名根骨骼下时报 DuplicateRootBone。
    pub fn insert_root_bone(&mut self, cfg: &ProcessConfig) -> Result<usize> {
        let hip_index = self.bone_index(&cfg.hip_bone_name).ok_or_else(|| {
            RootMotionError::NameCollision(format!("hip bone not found: {}", cfg.hip_bone_name))
        })?;
        let root_name = cfg.prefixed_root_name();

        if let Some(parent) = self.bones[hip_index].parent {
            let parent_name = &self.bones[parent].name;
            if parent_name == &root_name || parent_name == &cfg.root_bone_name {
                return Err(RootMotionError::DuplicateRootBone(parent_name.clone()));
            }
        }

        let (hip_world_t, hip_world_q) = self.world_rest_transform(hip_index);

        let mut root = Bone::new(root_name);
        root.parent = self.bones[hip_index].parent;
        root.rest_length = cfg.root_bone_length;
        let root_index = self.add_bone(root)?;

        let (root_world_t, root_world_q) = self.world_rest_transform(root_index);
        let inv = root_world_q.inverse();
        let hip = &mut self.bones[hip_index];
        hip.parent = Some(root_index);
        hip.rest_translation = inv * (hip_world_t - root_world_t);
        hip.rest_rotation = (inv * hip_world_q).normalize();

        Ok(root_index)
    }
}

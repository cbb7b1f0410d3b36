//! 处理配置
//!
//! 竖直轴和水平轴不硬编码为曲线数组下标，
//! 坐标系约定通过显式的 [`UpAxis`] 配置给出。

use crate::{Result, RootMotionError};

/// 竖直轴约定
///
/// 决定位移通道中哪个下标是"上"，以及旋转分解时保留四元数的哪个分量。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpAxis {
    /// Y 轴向上（Mixamo 姿态空间约定，下标 1）
    Y,
    /// Z 轴向上（下标 2）
    Z,
}

impl UpAxis {
    /// 竖直轴的数组下标
    pub fn vertical_index(self) -> usize {
        match self {
            UpAxis::Y => 1,
            UpAxis::Z => 2,
        }
    }

    /// 两个水平轴的数组下标
    pub fn horizontal_indices(self) -> [usize; 2] {
        match self {
            UpAxis::Y => [0, 2],
            UpAxis::Z => [0, 1],
        }
    }
}

impl Default for UpAxis {
    fn default() -> Self {
        UpAxis::Y
    }
}

/// 批量处理配置
#[derive(Clone, Debug)]
pub struct ProcessConfig {
    /// 根骨骼名称（不含前缀）
    pub root_bone_name: String,
    /// 髋骨名称（导入时带前缀）
    pub hip_bone_name: String,
    /// 骨骼名称前缀
    pub name_prefix: String,
    /// 是否剥离名称前缀
    pub remove_prefix: bool,
    /// 是否插入根骨骼并执行运动分解
    pub insert_root: bool,
    /// 合并后是否丢弃中间骨架
    pub delete_armatures: bool,
    /// 位移关键帧的统一缩放（厘米 -> 米）
    pub unit_scale: f32,
    /// 髋骨水平位移复制到根骨骼时的缩放
    pub root_motion_scale: f32,
    /// 竖直轴约定
    pub up_axis: UpAxis,
    /// 根骨骼静止长度（沿竖直轴）
    pub root_bone_length: f32,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            root_bone_name: "Root".to_string(),
            hip_bone_name: "mixamorig:Hips".to_string(),
            name_prefix: "mixamorig:".to_string(),
            remove_prefix: false,
            insert_root: false,
            delete_armatures: false,
            unit_scale: 0.01,
            root_motion_scale: 100.0,
            up_axis: UpAxis::default(),
            root_bone_length: 0.25,
        }
    }
}

impl ProcessConfig {
    /// 校验配置一致性
    ///
    /// 统一缩放和根骨骼位移缩放互为倒数，否则单位不一致。
    pub fn validate(&self) -> Result<()> {
        let product = self.unit_scale * self.root_motion_scale;
        if (product - 1.0).abs() > 1e-4 {
            return Err(RootMotionError::InvalidConfig(format!(
                "unit_scale * root_motion_scale must equal 1, got {}",
                product
            )));
        }
        if self.root_bone_length <= 0.0 {
            return Err(RootMotionError::InvalidConfig(format!(
                "root_bone_length must be positive, got {}",
                self.root_bone_length
            )));
        }
        Ok(())
    }

    /// 带前缀的根骨骼名称（插入时使用，剥离前缀后变为裸名称）
    pub fn prefixed_root_name(&self) -> String {
        format!("{}{}", self.name_prefix, self.root_bone_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scales_are_inverse() {
        let cfg = ProcessConfig::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_inconsistent_scales_rejected() {
        let cfg = ProcessConfig {
            root_motion_scale: 50.0,
            ..ProcessConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RootMotionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_up_axis_indices() {
        assert_eq!(UpAxis::Y.vertical_index(), 1);
        assert_eq!(UpAxis::Y.horizontal_indices(), [0, 2]);
        assert_eq!(UpAxis::Z.vertical_index(), 2);
        assert_eq!(UpAxis::Z.horizontal_indices(), [0, 1]);
    }
}

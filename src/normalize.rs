//! 骨骼/轨道规范化
//!
//! 剥离导入时带上的名称前缀（骨骼、顶点组、轨道路径三处同步），
//! 并对位移关键帧做统一单位缩放。两个操作都是幂等的。

use crate::animation::Clip;
use crate::skeleton::Armature;
use crate::Result;

/// 剥离名称前缀
///
/// 骨骼改名是破坏性的，原始前缀不在别处保留。
/// 剥离后名称冲突时报 NameCollision 而不是静默覆盖。
pub fn strip_prefix(armature: &mut Armature, clip: &mut Clip, prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Ok(());
    }

    let renames: Vec<(String, String)> = armature
        .bone_names()
        .filter(|name| name.contains(prefix))
        .map(|name| (name.to_string(), name.replace(prefix, "")))
        .collect();
    for (old, new) in &renames {
        armature.rename_bone(old, new)?;
    }

    for group in armature.vertex_groups.iter_mut() {
        if group.contains(prefix) {
            *group = group.replace(prefix, "");
        }
    }

    clip.strip_track_prefix(prefix)
}

/// 位移关键帧统一缩放
///
/// 对应编辑器里对所有 Location 曲线做的 0.01 缩放（厘米 -> 米），
/// 旋转通道不受影响。
pub fn apply_unit_scale(clip: &mut Clip, unit_scale: f32) {
    clip.scale_location_values(unit_scale);
}

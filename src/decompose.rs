//! 髋骨运动分解 - 核心算法
//!
//! 把髋骨的关键帧逐帧拆分为两部分：
//! - 根骨骼分量：水平位移（按单位缩放复制）和绕竖直轴的旋转，
//!   供游戏引擎做物理一致的根运动
//! - 髋骨余项：竖直位移和剩余旋转，换算回髋骨本地静止坐标系
//!
//! 帧号是平移/旋转编辑的连接键，全程不做重采样。
//! 每次提取或复合后立即归一化四元数，抵消浮点漂移。

use std::collections::BTreeMap;

use glam::Quat;

use crate::animation::{Channel, Clip, NlaStack};
use crate::config::{ProcessConfig, UpAxis};
use crate::skeleton::Armature;
use crate::{Result, RootMotionError};

/// 对整个剪辑执行髋骨运动分解（动作作用域）
///
/// `hip_name` / `root_name` 必须是剪辑当前轨道路径里的名称
/// （前缀剥离之后调用时传裸名称）。
pub fn decompose_hip_motion(
    armature: &Armature,
    clip: &mut Clip,
    hip_name: &str,
    root_name: &str,
    cfg: &ProcessConfig,
) -> Result<()> {
    let hip_index = armature.bone_index(hip_name).ok_or_else(|| {
        RootMotionError::NameCollision(format!("hip bone not found: {}", hip_name))
    })?;

    split_translation(clip, hip_name, root_name, cfg);
    split_rotation(clip, armature.bone(hip_index).rest_rotation, hip_name, root_name, cfg.up_axis);
    Ok(())
}

/// 对层栈上每个条带执行同一分解（轨道作用域）
///
/// 动作作用域和轨道作用域共用同一例程，只是迭代范围不同。
pub fn decompose_hip_motion_nla(
    armature: &Armature,
    stack: &mut NlaStack,
    hip_name: &str,
    root_name: &str,
    cfg: &ProcessConfig,
) -> Result<()> {
    for strip in stack.strips_mut() {
        decompose_hip_motion(armature, &mut strip.clip, hip_name, root_name, cfg)?;
    }
    Ok(())
}

/// 平移拆分
///
/// 水平轴关键帧按缩放复制到根骨骼后从髋骨删除，髋骨只保留竖直轨道。
/// 根骨骼竖直轨道钳制为非负，髋骨竖直轨道钳制为非正，
/// 分别消除悬浮和下陷伪影。
fn split_translation(clip: &mut Clip, hip_name: &str, root_name: &str, cfg: &ProcessConfig) {
    // 清空即将改写的根骨骼水平位移轨道；
    // 竖直轨道可能由前置步骤写入，保留并在下方钳制
    for axis in cfg.up_axis.horizontal_indices() {
        clip.remove_track(root_name, Channel::location(axis));
    }

    for axis in cfg.up_axis.horizontal_indices() {
        let channel = Channel::location(axis);
        if let Some(track) = clip.remove_track(hip_name, channel) {
            let root_track = clip.ensure_track(root_name, channel);
            for (frame, value) in track.keyframes() {
                root_track.insert_keyframe(frame, value * cfg.root_motion_scale);
            }
        }
    }

    let vertical = Channel::location(cfg.up_axis.vertical_index());
    if let Some(track) = clip.track_mut(root_name, vertical) {
        track.clamp_values_min(0.0);
    }
    if let Some(track) = clip.track_mut(hip_name, vertical) {
        track.clamp_values_max(0.0);
    }
}

/// 旋转拆分
///
/// 髋骨本地四元数先复合静止旋转换算到根骨骼坐标系，
/// 提取绕竖直轴分量作为根骨骼旋转，余项换算回髋骨本地坐标系。
fn split_rotation(
    clip: &mut Clip,
    hip_rest: Quat,
    hip_name: &str,
    root_name: &str,
    up_axis: UpAxis,
) {
    let hip_quats = assemble_rotation_frames(clip, hip_name);
    if hip_quats.is_empty() {
        // 纯平移剪辑，没有旋转可拆
        return;
    }

    // 换算到根骨骼坐标系：hip_root = hip_local * rest
    // 组装数组是 (w, x, y, z) 分量序，glam 构造函数按 xyzw 取参
    let hip_root_frame: BTreeMap<u32, Quat> = hip_quats
        .iter()
        .map(|(frame, q)| (*frame, Quat::from_xyzw(q[1], q[2], q[3], q[0]) * hip_rest))
        .collect();

    // 提取绕竖直轴分量
    let mut root_quats: BTreeMap<u32, Quat> = hip_root_frame
        .iter()
        .map(|(frame, q)| (*frame, up_component(*q, up_axis)))
        .collect();

    // 朝向稳定：以首个关键帧的竖直分量为参考，
    // 起始就转了身的剪辑（如横移）不会烘焙出根骨骼朝向偏移，
    // 被扣除的初始朝向留在髋骨余项里。
    // 单关键帧剪辑退化为恒等，参考分量先归一化再求逆，无除零风险。
    let first_frame = match root_quats.keys().next() {
        Some(frame) => *frame,
        None => return,
    };
    let heading_inv = root_quats[&first_frame].normalize().inverse();
    for q in root_quats.values_mut() {
        *q = (heading_inv * *q).normalize();
    }

    // 余项：hip_root = root_quat * remainder_root，再换算回髋骨本地坐标系
    let rest_inv = hip_rest.inverse();
    let remainder: BTreeMap<u32, Quat> = hip_root_frame
        .iter()
        .map(|(frame, q)| {
            let in_root = (root_quats[frame].inverse() * *q).normalize();
            (*frame, (in_root * rest_inv).normalize())
        })
        .collect();

    // 根骨骼得到四条新旋转轨道，髋骨旋转轨道改写为余项，帧号原样保留
    for (component, channel) in Channel::ROTATION.into_iter().enumerate() {
        let track = clip.ensure_track(root_name, channel);
        for (frame, q) in &root_quats {
            track.insert_keyframe(*frame, quat_component(*q, component));
        }
    }
    for (component, channel) in Channel::ROTATION.into_iter().enumerate() {
        let track = clip.ensure_track(hip_name, channel);
        for (frame, q) in &remainder {
            track.insert_keyframe(*frame, quat_component(*q, component));
        }
    }
}

/// 把四条旋转通道轨道组装为逐帧四元数
///
/// 帧集合取四个通道的并集；某帧缺失的分量按 0 计。
/// 组装结果不归一化，归一化由后续提取/复合步骤负责。
fn assemble_rotation_frames(clip: &Clip, bone: &str) -> BTreeMap<u32, [f32; 4]> {
    let mut frames: BTreeMap<u32, [f32; 4]> = BTreeMap::new();
    for (component, channel) in Channel::ROTATION.into_iter().enumerate() {
        if let Some(track) = clip.track(bone, channel) {
            for (frame, value) in track.keyframes() {
                frames.entry(frame).or_insert([0.0; 4])[component] = value;
            }
        }
    }
    frames
}

/// 提取绕竖直轴的旋转分量：保留 (w, 竖直) 子空间并归一化
fn up_component(q: Quat, up_axis: UpAxis) -> Quat {
    let v = match up_axis {
        UpAxis::Y => Quat::from_xyzw(0.0, q.y, 0.0, q.w),
        UpAxis::Z => Quat::from_xyzw(0.0, 0.0, q.z, q.w),
    };
    v.normalize()
}

fn quat_component(q: Quat, component: usize) -> f32 {
    // 通道顺序 (w, x, y, z)
    match component {
        0 => q.w,
        1 => q.x,
        2 => q.y,
        _ => q.z,
    }
}

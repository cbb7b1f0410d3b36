//! 批量导入驱动
//!
//! 遍历目录中的动画文件，逐个导入为独立骨架并执行
//! 根骨骼合成、规范化和运动分解，然后可选地合并进控制绑定。
//! 单个文件出错立即中止整批，错误里带上出错文件路径。

use std::path::{Path, PathBuf};

use crate::animation::{Clip, NlaStack};
use crate::config::ProcessConfig;
use crate::decompose;
use crate::normalize;
use crate::skeleton::Armature;
use crate::{Result, RootMotionError};

/// 批量导入识别的文件扩展名
const MOTION_FILE_EXT: &str = "fbx";

/// FBX 导入协作方
///
/// 文件解析由宿主环境完成并产出骨架 + 剪辑，本 crate 不解析 FBX。
pub trait ClipImporter {
    fn import(&mut self, path: &Path) -> Result<ImportedArmature>;
}

/// 一次导入的产物：骨架和它携带的剪辑
#[derive(Clone, Debug)]
pub struct ImportedArmature {
    pub armature: Armature,
    pub clip: Clip,
}

/// 控制绑定：动作库 + 非破坏性动画层栈
#[derive(Clone, Debug, Default)]
pub struct ControlRig {
    pub name: String,
    pub armature: Armature,
    /// 合并进来的动作，按 ctrl_ 前缀命名
    pub actions: Vec<Clip>,
    pub nla: NlaStack,
}

/// 单文件处理管线
///
/// 根骨骼合成和前缀剥离必须先于分解执行，
/// 分解读取的是结构编辑之后的静止姿态。
pub fn process_armature(
    armature: &mut Armature,
    clip: &mut Clip,
    cfg: &ProcessConfig,
) -> Result<()> {
    cfg.validate()?;
    if !cfg.insert_root {
        return Ok(());
    }
    armature.insert_root_bone(cfg)?;

    let (hip_name, root_name) = if cfg.remove_prefix {
        normalize::strip_prefix(armature, clip, &cfg.name_prefix)?;
        (
            cfg.hip_bone_name.replace(&cfg.name_prefix, ""),
            cfg.root_bone_name.clone(),
        )
    } else {
        (cfg.hip_bone_name.clone(), cfg.prefixed_root_name())
    };

    normalize::apply_unit_scale(clip, cfg.unit_scale);
    decompose::decompose_hip_motion(armature, clip, &hip_name, &root_name, cfg)
}

/// 批量导入目录中的所有动画文件
///
/// 按文件名排序保证处理顺序确定。第一个出错的文件中止整批，
/// 返回 BatchFile 错误并带上文件路径，不做跳过续批。
pub fn import_all(
    source_dir: &Path,
    importer: &mut dyn ClipImporter,
    cfg: &ProcessConfig,
) -> Result<Vec<ImportedArmature>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(source_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case(MOTION_FILE_EXT))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    let mut imported = Vec::with_capacity(files.len());
    for path in files {
        log::info!("importing motion file: {}", path.display());
        match import_one(&path, importer, cfg) {
            Ok(result) => imported.push(result),
            Err(source) => {
                return Err(RootMotionError::BatchFile {
                    path,
                    source: Box::new(source),
                });
            }
        }
    }
    Ok(imported)
}

fn import_one(
    path: &Path,
    importer: &mut dyn ClipImporter,
    cfg: &ProcessConfig,
) -> Result<ImportedArmature> {
    let mut result = importer.import(path)?;
    // 剪辑以文件主干名命名
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        result.clip.name = stem.to_string();
    }
    process_armature(&mut result.armature, &mut result.clip, cfg)?;
    Ok(result)
}

/// 把导入结果合并进控制绑定的动作库
///
/// 每个剪辑复制为 ctrl_ 前缀的动作，push_nla 为真时同时推送到
/// 层栈，起始帧取剪辑首帧。没有控制绑定时记录警告后直接返回，
/// 不报错（降级继续，见 DESIGN.md 遗留问题）。
/// delete_applied_armatures 为真时清空导入的骨架，只保留合并结果。
pub fn merge_into_control_rig(
    control_rig: Option<&mut ControlRig>,
    imports: &mut Vec<ImportedArmature>,
    push_nla: bool,
    delete_applied_armatures: bool,
) {
    let rig = match control_rig {
        Some(rig) => rig,
        None => {
            log::warn!("no control rig armature selected, skipping merge");
            return;
        }
    };

    for import in imports.iter() {
        let mut action = import.clip.clone();
        let start_frame = action.first_frame().unwrap_or(0) as i32;
        action.name = format!("ctrl_{}", action.name);
        log::info!("merging action {} into {}", action.name, rig.name);
        if push_nla {
            rig.nla.push(action.clone(), None, start_frame);
        }
        rig.actions.push(action);
    }

    if delete_applied_armatures {
        imports.clear();
    }
}

//! Root Motion Engine - Mixamo 动画根骨骼处理引擎
//!
//! 将 Mixamo 导出的角色动画离线转换为带根骨骼位移的游戏引擎动画：
//! - 骨骼名称/轨道路径前缀规范化
//! - 根骨骼合成（插入到髋骨上方，保持绑定姿态不变）
//! - 髋骨运动分解：把髋骨的平移和绕竖直轴的旋转拆分到根骨骼，
//!   余项保留在髋骨本地坐标系
//! - 目录批量导入与控制绑定合并（含非破坏性动画层推送）
//!
//! FBX 解析由宿主环境完成，通过 [`batch::ClipImporter`] 接入。

pub mod animation;
pub mod batch;
pub mod config;
pub mod decompose;
pub mod normalize;
pub mod skeleton;

pub use animation::{Channel, ChannelTrack, Clip, NlaStack, NlaStrip, NlaTrack};
pub use batch::{ClipImporter, ControlRig, ImportedArmature};
pub use config::{ProcessConfig, UpAxis};
pub use skeleton::{Armature, Bone};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RootMotionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing armature: {0}")]
    MissingArmature(String),

    #[error("bone name collision: {0}")]
    NameCollision(String),

    #[error("duplicate root bone: {0}")]
    DuplicateRootBone(String),

    #[error("malformed track: {0}")]
    MalformedTrack(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("batch import failed on {}: {source}", path.display())]
    BatchFile {
        path: PathBuf,
        #[source]
        source: Box<RootMotionError>,
    },
}

pub type Result<T> = std::result::Result<T, RootMotionError>;

//! 骨架系统
//!
//! 提供骨骼树、名称索引、重设父骨骼和根骨骼合成。

mod armature;
mod bone;

pub use armature::Armature;
pub use bone::Bone;

//! 动画数据
//!
//! 提供通道关键帧轨道、剪辑（每个导入文件一个）和非破坏性动画层栈。

mod clip;
mod layer;
mod track;

pub use clip::Clip;
pub use layer::{NlaStack, NlaStrip, NlaTrack};
pub use track::{Channel, ChannelTrack};

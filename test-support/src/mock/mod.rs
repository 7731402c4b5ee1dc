//! Mock 实现模块
//!
//! 提供架构与宿主环境的 Mock 实现，用于测试

pub mod arch;
pub mod host;

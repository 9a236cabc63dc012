//! 核心功能模块
//!
//! 本模块提供查看器的基础功能，包括数学库、日志系统、配置管理、错误处理，
//! 以及相机 / 输入状态。这些模块独立于具体的图形 API。
//!
//! # 模块组织
//!
//! - `math`：数学库，`nalgebra` 类型别名和矩阵辅助函数
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件加载设置
//! - `error`：错误处理，定义统一的错误类型
//! - `trackball`：虚拟轨迹球旋转
//! - `input`：`ViewerState` 与输入事件处理

pub mod config;
pub mod error;
pub mod input;
pub mod log;
pub mod math;
pub mod trackball;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use error::{Result, ViewerError};
pub use input::{KeyAction, ViewerState};
pub use math::{Matrix4, Quaternion, Vector3};

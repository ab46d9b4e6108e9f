//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize` 和 `Deserialize`，用于 Tauri IPC 传输和 JSON 文件读写。
//! - `report` - 课程空间、实验报告和各章节载荷的数据结构
//! - `settings` - 全局设置的数据结构
//! - `defaults` - 新建对象的默认值工厂和演示空间

pub mod defaults;
pub mod report;
pub mod settings;

//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `settings` - 全局设置与 API 密钥的读写 commands
//! - `spaces` - 课程空间与报告生命周期 commands
//! - `sections` - 章节开关、条目与附件操作 commands
//! - `ai` - AI 草稿生成与应用 commands
//! - `export` - DOCX/JSON 导出与导入 commands

pub mod ai;
pub mod export;
pub mod sections;
pub mod settings;
pub mod spaces;

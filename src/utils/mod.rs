//! # 通用工具模块
//!
//! - `path` - Reporter 数据目录路径解析
//! - `id` - 基于时间戳的标识符生成
//! - `filename` - 导出文件名推导与安全字符过滤

pub mod filename;
pub mod id;
pub mod path;

//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `store` - 文档库：设置/空间/密钥的唯一内存副本 + 写透持久化
//! - `sections` - 章节结构操作：条目增删、附件校验与原子开关
//! - `ai` - AI 草稿助手：提示词组装、Gemini 调用、变体拆分与应用
//! - `docx` - DOCX 导出：文档模型到 ДСТУ 版式字节流的确定性映射
//! - `snapshot` - JSON 快照：单份报告的导出与容错导入

pub mod ai;
pub mod docx;
pub mod sections;
pub mod snapshot;
pub mod store;

//! # 全局设置数据模型
//!
//! 定义跨所有课程空间共享的全局设置（GlobalSettings）结构体。
//!
//! 对应前端 TypeScript 中的 `GlobalSettings` 接口。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 全局设置数据结构
///
/// 进程级单例：应用启动时从 `~/.mo/Reporter/settings.json` 加载一次，
/// 此后仅通过设置对话框的显式保存操作整体替换。
///
/// 设计决策：
/// - 每个字段都带 serde 默认值，存储文件中缺失的字段不会导致整体解析失败，
///   旧版本写入的设置对象在新版本中仍然可读（尽力合并而非整体丢弃）。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface GlobalSettings {
///   faculty: string;
///   studentName: string;
///   studentGroup: string;
///   useOldReportsAsExamples?: boolean;
///   customPrompt?: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSettings {
    /// 院系名称：打印在标题页的第三行
    pub faculty: String,

    /// 学生姓名：标题页"Виконав:"栏
    pub student_name: String,

    /// 学生班组：标题页"Ст. {група}"栏
    pub student_group: String,

    /// 是否将已完成的旧报告作为 AI 生成的风格示例
    pub use_old_reports_as_examples: bool,

    /// 用户自定义的附加 AI 规则，附加到每一次生成请求
    pub custom_prompt: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            faculty: "Факультет електроніки та комп'ютерних технологій".to_string(),
            student_name: String::new(),
            student_group: String::new(),
            use_old_reports_as_examples: false,
            custom_prompt: String::new(),
        }
    }
}

impl GlobalSettings {
    /// 从任意 JSON 值尽力恢复设置
    ///
    /// 存储文件损坏（字段类型错误等）导致常规反序列化失败时的兜底路径：
    /// 如果顶层是 JSON 对象，则逐字段提取类型正确的值，其余回落到默认值；
    /// 顶层不是对象时整体返回默认值。
    ///
    /// # 参数
    /// - `value` - 从存储读到的原始 JSON 值
    pub fn from_partial_value(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(obj) = value.as_object() else {
            return settings;
        };

        if let Some(s) = obj.get("faculty").and_then(Value::as_str) {
            settings.faculty = s.to_string();
        }
        if let Some(s) = obj.get("studentName").and_then(Value::as_str) {
            settings.student_name = s.to_string();
        }
        if let Some(s) = obj.get("studentGroup").and_then(Value::as_str) {
            settings.student_group = s.to_string();
        }
        if let Some(b) = obj.get("useOldReportsAsExamples").and_then(Value::as_bool) {
            settings.use_old_reports_as_examples = b;
        }
        if let Some(s) = obj.get("customPrompt").and_then(Value::as_str) {
            settings.custom_prompt = s.to_string();
        }
        settings
    }
}

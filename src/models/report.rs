//! # 课程空间与实验报告数据模型
//!
//! 定义课程空间（Space）、实验报告（LabReport）以及各章节载荷的 Rust 结构体，
//! 对应前端 TypeScript 中的 `Space`、`LabReport` 及各 `*Data` 接口。
//!
//! 这些结构体通过 `serde` 的 Serialize/Deserialize 特征实现：
//! - Tauri IPC 序列化（Rust ↔ JS）：与前端交换完整的文档模型
//! - 文件系统读写：`spaces.json` 持久化和 JSON 快照导出/导入
//!
//! ## 模型约束
//! - 章节文本字段永不为 `null`：缺失一律表示为空字符串/空列表
//! - 附件字段（代码/图片及其标题）用 `Option` 表示，缺失时从 JSON 中省略
//! - 禁用某章节只隐藏它，载荷原样保留，重新启用后数据完整恢复

use serde::{Deserialize, Serialize};

/// 报告章节类型标签
///
/// 封闭枚举：标题页固定存在，其余四种可以逐报告开关。
/// 所有对该枚举的 match 都是穷尽的，新增章节时编译器会逐处提醒。
///
/// 对应前端 TypeScript 类型：
/// ```typescript
/// type BlockType = 'titlePage' | 'abstract' | 'workProgress' | 'conclusion' | 'appendix';
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    /// 标题页：隐式永远启用，不出现在 `enabledBlocks` 中
    TitlePage,
    /// 工作目的（Мета роботи）
    Abstract,
    /// 工作进度（Хід роботи）
    WorkProgress,
    /// 结论（Висновок）
    Conclusion,
    /// 附录（Додаток）
    Appendix,
}

/// 工作目的章节载荷
///
/// 对应前端 `interface AbstractData { content: string; }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbstractData {
    /// 目的叙述文本
    pub content: String,
}

/// 工作进度章节的单个条目
///
/// 每个条目一段文本，可选携带一段代码附件和/或一张图片附件（各带可选标题）。
/// 代码与标题、图片与标题分别构成原子对：关闭附件时两者一起清空。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface WorkProgressItem {
///   id: string;
///   text: string;
///   itemCode?: string;
///   codeCaption?: string;
///   imageBase64?: string;   // data URL
///   imageCaption?: string;
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkProgressItem {
    /// 唯一标识符：基于时间戳生成
    pub id: String,

    /// 条目文本
    pub text: String,

    /// 代码附件内容
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,

    /// 代码附件标题
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_caption: Option<String>,

    /// 图片附件：自包含的 `data:{mime};base64,...` URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,

    /// 图片附件标题
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_caption: Option<String>,
}

/// 工作进度章节载荷
///
/// 条目列表永不为空：删除最后一个条目时用一个空条目替补。
///
/// 对应前端 `interface WorkProgressData { items: WorkProgressItem[]; }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkProgressData {
    /// 有序条目列表（插入顺序 = 展示顺序 = 导出编号顺序）
    pub items: Vec<WorkProgressItem>,
}

/// 结论章节载荷
///
/// 对应前端 `interface ConclusionData { content: string; }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclusionData {
    /// 结论叙述文本
    pub content: String,
}

/// 附录章节载荷
///
/// 对应前端 `interface AppendixData { title: string; code: string; }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendixData {
    /// 附录标题（如 "Код програми"）
    pub title: String,

    /// 附录正文：代码或其它逐行排版的文本
    pub code: String,
}

/// 实验报告数据结构
///
/// 每份报告持有全部四种可选章节的载荷，无论该章节当前是否启用；
/// `enabledBlocks` 仅控制可见性，开关操作是非破坏性的。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface LabReport {
///   id: string;
///   labNumber: string;
///   topic: string;
///   methodicalText?: string;
///   isDone?: boolean;
///   enabledBlocks: OptionalBlockType[];
///   abstract: AbstractData;
///   workProgress: WorkProgressData;
///   conclusion: ConclusionData;
///   appendix: AppendixData;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabReport {
    /// 唯一标识符：基于时间戳生成
    pub id: String,

    /// 实验编号：自由文本，不强制为数字（如 "3" 或 "3а"）
    pub lab_number: String,

    /// 实验主题
    pub topic: String,

    /// 方法指导文本：仅作为 AI 生成的上下文，不参与导出
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodical_text: Option<String>,

    /// 完成标记：已完成的报告可作为 AI 的风格示例
    #[serde(default)]
    pub is_done: bool,

    /// 当前启用的可选章节集合（标题页隐式启用，不在此列）
    pub enabled_blocks: Vec<BlockType>,

    /// 工作目的载荷（`abstract` 是 Rust 保留字，字段名带下划线后缀）
    #[serde(rename = "abstract")]
    pub abstract_: AbstractData,

    /// 工作进度载荷
    pub work_progress: WorkProgressData,

    /// 结论载荷
    pub conclusion: ConclusionData,

    /// 附录载荷
    pub appendix: AppendixData,
}

impl LabReport {
    /// 判断某可选章节当前是否启用
    pub fn is_enabled(&self, block: BlockType) -> bool {
        self.enabled_blocks.contains(&block)
    }
}

/// 课程空间数据结构
///
/// 一个空间对应一门课程（предмет），包含该课程的全部实验报告。
/// 删除空间时级联删除其中所有报告。
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface Space {
///   id: string;
///   courseName: string;
///   teacherTitle: string;
///   teacherName: string;
///   reports: LabReport[];
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// 唯一标识符：基于时间戳生成
    pub id: String,

    /// 课程名称：标题页"з курсу"行
    pub course_name: String,

    /// 教师职称（如 "Асист." / "Доц."）
    pub teacher_title: String,

    /// 教师姓名：标题页"Перевірив:"栏
    pub teacher_name: String,

    /// 有序报告列表（插入顺序 = 展示顺序）
    pub reports: Vec<LabReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults;

    #[test]
    fn test_block_type_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&BlockType::WorkProgress).unwrap(),
            r#""workProgress""#
        );
        assert_eq!(
            serde_json::from_str::<BlockType>(r#""titlePage""#).unwrap(),
            BlockType::TitlePage
        );
    }

    #[test]
    fn test_report_json_round_trip_with_attachments() {
        // 含全部附件组合的报告：序列化再解析必须深度相等
        let mut report = defaults::new_report("3");
        report.topic = "Сортування".to_string();
        report.methodical_text = Some("Методичні вказівки".to_string());
        report.is_done = true;
        report.work_progress.items = vec![
            WorkProgressItem {
                id: "10".to_string(),
                text: "Реалізувати бульбашкове сортування".to_string(),
                item_code: Some("print(sorted(xs))".to_string()),
                code_caption: Some("Лістинг 1".to_string()),
                image_base64: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
                image_caption: Some("Графік".to_string()),
            },
            WorkProgressItem {
                id: "11".to_string(),
                text: String::new(),
                ..WorkProgressItem::default()
            },
        ];

        let json = serde_json::to_string_pretty(&report).unwrap();
        let back: LabReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_absent_attachments_are_omitted_from_json() {
        let report = defaults::new_report("1");
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("itemCode"));
        assert!(!json.contains("imageBase64"));
        // 章节载荷字段则始终存在
        assert!(json.contains(r#""abstract""#));
        assert!(json.contains(r#""workProgress""#));
    }

    #[test]
    fn test_report_without_optional_fields_parses() {
        // 前端旧数据可能没有 methodicalText/isDone
        let json = r#"{
            "id": "1", "labNumber": "1", "topic": "",
            "enabledBlocks": ["abstract", "workProgress", "conclusion"],
            "abstract": {"content": ""},
            "workProgress": {"items": [{"id": "2", "text": ""}]},
            "conclusion": {"content": ""},
            "appendix": {"title": "Код програми", "code": ""}
        }"#;
        let report: LabReport = serde_json::from_str(json).unwrap();
        assert!(!report.is_done);
        assert!(report.methodical_text.is_none());
        assert!(report.is_enabled(BlockType::Abstract));
        assert!(!report.is_enabled(BlockType::Appendix));
    }
}

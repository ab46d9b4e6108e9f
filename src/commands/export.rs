//! # 导出与导入 Tauri Commands
//!
//! 提供报告的文件级导出/导入 command 处理函数：
//! - `export_report_docx` - 生成 ДСТУ 版式的 DOCX，返回 base64 字节流
//! - `export_report_json` - 生成美化缩进的 JSON 快照字符串
//! - `import_report_json` - 解析快照并插入目标空间
//!
//! 二进制内容经 base64 编码通过 IPC 返回，文件保存对话框与实际写盘
//! 由前端通过 dialog/fs 插件完成（对应浏览器下载语义）。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tauri::State;

use crate::models::report::LabReport;
use crate::services::docx;
use crate::services::snapshot;
use crate::services::store::DocumentStore;
use crate::utils::filename;

/// DOCX 导出结果
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface DocxExport {
///   fileName: string;    // 含 .docx 扩展名
///   dataBase64: string;  // 文件内容
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocxExport {
    /// 推导出的文件名（含扩展名）
    pub file_name: String,

    /// base64 编码的 DOCX 字节流
    pub data_base64: String,
}

/// JSON 快照导出结果
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface JsonExport {
///   fileName: string;  // 含 .json 扩展名
///   content: string;   // 美化缩进的 JSON 文本
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport {
    /// 推导出的文件名（含扩展名）
    pub file_name: String,

    /// 快照 JSON 文本
    pub content: String,
}

/// 导出报告为 DOCX
///
/// 文件名从实验编号和主题推导（`Лаб_{номер}_{тема}.docx`），
/// 非安全字符被剥离，推导结果为空时回落到通用名称。
///
/// # 参数
/// - `space_id` - 所属空间 id（课程名与教师来自空间）
/// - `report_id` - 要导出的报告 id
///
/// # 错误
/// 目标不存在或 DOCX 打包失败时返回错误
#[tauri::command]
pub async fn export_report_docx(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<DocxExport, String> {
    let settings = store.settings();
    let space = store.space(&space_id)?;
    let report = store.report(&space_id, &report_id)?;

    let bytes = docx::build_report_docx(&settings, &space, &report)?;
    Ok(DocxExport {
        file_name: format!(
            "{}.docx",
            filename::report_file_name(&report.lab_number, &report.topic)
        ),
        data_base64: BASE64.encode(bytes),
    })
}

/// 导出报告为 JSON 快照
///
/// # 错误
/// 目标不存在或序列化失败时返回错误
#[tauri::command]
pub async fn export_report_json(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<JsonExport, String> {
    let report = store.report(&space_id, &report_id)?;
    Ok(JsonExport {
        file_name: format!("{}.json", filename::snapshot_file_name(&report.lab_number)),
        content: snapshot::export_report_json(&report)?,
    })
}

/// 从 JSON 快照导入报告
///
/// 解析失败时返回用户可见错误，当前状态不变；
/// 解析成功后报告插入目标空间末尾（id 冲突时重新生成）并写透落盘。
///
/// # 参数
/// - `space_id` - 目标空间 id
/// - `content` - 用户所选文件的文本内容
///
/// # 返回值
/// 返回实际插入的报告
#[tauri::command]
pub async fn import_report_json(
    space_id: String,
    content: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let report = snapshot::parse_report_json(&content)?;
    store.insert_report(&space_id, report).await
}

//! # 课程空间与报告生命周期 Tauri Commands
//!
//! 提供空间和报告的创建、删除、整体替换等 command 处理函数：
//! - `list_spaces` - 列出全部课程空间
//! - `create_space` / `delete_space` - 空间的创建与删除（删除级联）
//! - `add_report` / `delete_report` - 报告的创建与删除
//! - `toggle_report_done` - 切换报告的完成标记
//! - `update_report` - 按 id 整体替换一份报告（章节编辑器的统一落点）
//!
//! 删除类操作的确认对话框由前端负责，后端收到调用即认为已确认。
//! 所有变更都经文档库写透落盘后才返回。

use tauri::State;

use crate::models::report::{LabReport, Space};
use crate::services::store::DocumentStore;

/// 列出全部课程空间（含各自的报告列表）
///
/// 前端在主屏渲染和每次变更后调用，直接返回内存快照。
///
/// # 参数
/// - `store` - Tauri managed state，文档库
#[tauri::command]
pub async fn list_spaces(store: State<'_, DocumentStore>) -> Result<Vec<Space>, String> {
    Ok(store.spaces())
}

/// 创建一个新的课程空间
///
/// # 参数
/// - `course_name` - 课程名称
/// - `teacher_title` - 教师职称（如 "Асист."）
/// - `teacher_name` - 教师姓名
/// - `store` - Tauri managed state，文档库
///
/// # 返回值
/// 返回新建的空间（含生成的 id），前端据此展开新卡片
#[tauri::command]
pub async fn create_space(
    course_name: String,
    teacher_title: String,
    teacher_name: String,
    store: State<'_, DocumentStore>,
) -> Result<Space, String> {
    store
        .create_space(course_name.trim(), teacher_title.trim(), teacher_name.trim())
        .await
}

/// 删除课程空间及其全部报告
///
/// # 参数
/// - `space_id` - 要删除的空间 id
/// - `store` - Tauri managed state，文档库
#[tauri::command]
pub async fn delete_space(
    space_id: String,
    store: State<'_, DocumentStore>,
) -> Result<(), String> {
    store.delete_space(&space_id).await
}

/// 在指定空间内新建一份默认报告
///
/// 实验编号默认为该空间现有报告数 + 1（自由文本，之后可改）。
///
/// # 返回值
/// 返回新建的报告，前端直接打开编辑器
#[tauri::command]
pub async fn add_report(
    space_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    store.add_report(&space_id).await
}

/// 删除指定空间内的一份报告
#[tauri::command]
pub async fn delete_report(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<(), String> {
    store.delete_report(&space_id, &report_id).await
}

/// 切换报告的完成标记
///
/// 已完成的报告可作为 AI 生成的风格示例（见 `useOldReportsAsExamples`）。
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn toggle_report_done(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    store.toggle_report_done(&space_id, &report_id).await
}

/// 按 id 整体替换一份报告
///
/// 章节编辑器对每次输入回传完整的报告替换（载荷边界内没有增量补丁协议）。
/// 只有目标报告被重建，兄弟报告与其余空间原样保留。
///
/// # 参数
/// - `space_id` - 所属空间 id
/// - `report` - 替换后的完整报告
///
/// # 返回值
/// 返回已持久化的报告
///
/// # 错误
/// 空间或报告不存在、落盘失败时返回错误，不做任何变更
#[tauri::command]
pub async fn update_report(
    space_id: String,
    report: LabReport,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    store.replace_report(&space_id, report).await
}

//! # 章节结构操作 Tauri Commands
//!
//! 提供章节开关与工作进度条目/附件的 command 处理函数：
//! - `toggle_section` - 开关可选章节（非破坏性，载荷保留）
//! - `add_progress_item` / `remove_progress_item` - 条目追加与删除
//! - `attach_progress_image` / `detach_progress_image` - 图片附件
//! - `set_code_attachment` - 代码附件开关
//!
//! 每个 command 都是"读报告 → 纯函数变换 → 写透替换"的三步：
//! 变换失败（校验不通过、条目不存在）时不触碰文档库。
//! 文本层面的编辑不走这里——前端直接用 `update_report` 整体替换。

use tauri::State;

use crate::models::report::{BlockType, LabReport};
use crate::services::sections;
use crate::services::store::DocumentStore;

/// 开关报告的可选章节
///
/// 禁用只是隐藏：载荷原样保留，重新启用后数据完整恢复。
///
/// # 参数
/// - `space_id` - 所属空间 id
/// - `report_id` - 目标报告 id
/// - `block` - 要切换的章节标签
///
/// # 返回值
/// 返回更新后的报告
///
/// # 错误
/// 标题页不可切换；目标不存在或落盘失败时返回错误
#[tauri::command]
pub async fn toggle_section(
    space_id: String,
    report_id: String,
    block: BlockType,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let report = store.report(&space_id, &report_id)?;
    let updated = sections::toggle_block(&report, block)?;
    store.replace_report(&space_id, updated).await
}

/// 在工作进度列表末尾追加一个空条目
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn add_progress_item(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let mut report = store.report(&space_id, &report_id)?;
    report.work_progress = sections::add_progress_item(&report.work_progress);
    store.replace_report(&space_id, report).await
}

/// 按 id 删除一个工作进度条目
///
/// 删除最后一个条目时用一个新的空条目替补，列表永不为空。
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn remove_progress_item(
    space_id: String,
    report_id: String,
    item_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let mut report = store.report(&space_id, &report_id)?;
    report.work_progress = sections::remove_progress_item(&report.work_progress, &item_id);
    store.replace_report(&space_id, report).await
}

/// 给工作进度条目附加图片
///
/// 前端把所选文件的 MIME 类型和原始字节传过来；
/// 校验（仅 image/*、不超过 5 MB）失败时返回用户可见错误，状态不变。
/// 文件读取是一次性异步操作，前端用 pending 引用防止选择串扰，
/// 完成或失败后必须清除该引用。
///
/// # 参数
/// - `space_id` - 所属空间 id
/// - `report_id` - 目标报告 id
/// - `item_id` - 目标条目 id
/// - `mime` - 所选文件的 MIME 类型
/// - `bytes` - 所选文件的原始内容
///
/// # 返回值
/// 返回更新后的报告（目标条目的 `imageBase64` 已填入 data URL）
#[tauri::command]
pub async fn attach_progress_image(
    space_id: String,
    report_id: String,
    item_id: String,
    mime: String,
    bytes: Vec<u8>,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let mut report = store.report(&space_id, &report_id)?;
    report.work_progress =
        sections::attach_progress_image(&report.work_progress, &item_id, &mime, &bytes)?;
    store.replace_report(&space_id, report).await
}

/// 移除工作进度条目的图片附件
///
/// 图片与其标题一起清空（原子对）。
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn detach_progress_image(
    space_id: String,
    report_id: String,
    item_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let mut report = store.report(&space_id, &report_id)?;
    report.work_progress = sections::detach_progress_image(&report.work_progress, &item_id)?;
    store.replace_report(&space_id, report).await
}

/// 开关工作进度条目的代码附件
///
/// 开启 → 空代码串 + 空标题；关闭 → 两者一起清空。
///
/// # 参数
/// - `enabled` - `true` 开启附件，`false` 关闭并清空
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn set_code_attachment(
    space_id: String,
    report_id: String,
    item_id: String,
    enabled: bool,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let mut report = store.report(&space_id, &report_id)?;
    report.work_progress =
        sections::set_code_attachment(&report.work_progress, &item_id, enabled)?;
    store.replace_report(&space_id, report).await
}

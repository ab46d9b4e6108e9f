//! # AI 草稿助手 Tauri Commands
//!
//! 提供章节文本生成相关的 command 处理函数：
//! - `generate_variants` - 为单个章节生成变体列表
//! - `apply_variant` - 把选中的变体应用到章节并持久化
//! - `fill_all_sections` - 按固定顺序依次填充全部已启用的可填充章节
//!
//! 凭据校验在发起任何网络请求之前完成；服务端错误原样透传，
//! 文档状态保持不变。前端在请求进行中禁用对应按钮，
//! 因此同一目标同一时刻至多一个未完成的生成请求。

use tauri::State;

use crate::models::report::{BlockType, LabReport};
use crate::services::ai;
use crate::services::store::DocumentStore;

/// 凭据缺失时的校验错误信息
const MISSING_KEY_ERROR: &str = "Будь ласка, введіть API ключ Gemini у налаштуваннях.";

/// 校验并返回 API 密钥
///
/// # 错误
/// 密钥为空时返回用户可见的校验错误——不发起网络调用
fn require_api_key(store: &DocumentStore) -> Result<String, String> {
    let api_key = store.api_key();
    if api_key.trim().is_empty() {
        return Err(MISSING_KEY_ERROR.to_string());
    }
    Ok(api_key)
}

/// 组装目标章节的提示词并调用 Gemini
///
/// 风格示例仅在全局设置开启 `useOldReportsAsExamples` 时嵌入，
/// 且只取同一空间内已完成、非当前的报告。
async fn generate_for_block(
    store: &DocumentStore,
    api_key: &str,
    space_id: &str,
    report_id: &str,
    block: BlockType,
) -> Result<Vec<String>, String> {
    let report = store.report(space_id, report_id)?;
    let settings = store.settings();
    let space = store.space(space_id)?;

    let examples = if settings.use_old_reports_as_examples {
        ai::example_reports(&space.reports, report_id)
    } else {
        vec![]
    };

    let prompt = ai::build_prompt(block, &report, &examples, &settings.custom_prompt)?;
    let raw = ai::generate_text(api_key, &prompt).await?;
    Ok(ai::split_variants(&raw))
}

/// 为单个章节生成文本变体
///
/// 正常情况返回 3 个变体；模型没有按约定输出分隔符时
/// 退化为 1 个变体（整个响应）。变体只返回给前端预览，
/// 不触碰文档状态——应用由 `apply_variant` 单独完成。
///
/// # 参数
/// - `space_id` - 所属空间 id
/// - `report_id` - 目标报告 id
/// - `block` - 目标章节标签
///
/// # 错误
/// - 密钥为空：校验错误，不发起网络调用
/// - Gemini 服务错误：错误信息原样透传
#[tauri::command]
pub async fn generate_variants(
    space_id: String,
    report_id: String,
    block: BlockType,
    store: State<'_, DocumentStore>,
) -> Result<Vec<String>, String> {
    let api_key = require_api_key(&store)?;
    generate_for_block(&store, &api_key, &space_id, &report_id, block).await
}

/// 把选中的变体文本应用到目标章节
///
/// 整个章节载荷被替换（映射规则逐章节不同，见 `services::ai::apply_variant`），
/// 随后写透持久化。
///
/// # 返回值
/// 返回更新后的报告
#[tauri::command]
pub async fn apply_variant(
    space_id: String,
    report_id: String,
    block: BlockType,
    text: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let report = store.report(&space_id, &report_id)?;
    let updated = ai::apply_variant(&report, block, &text)?;
    store.replace_report(&space_id, updated).await
}

/// 按固定顺序填充全部已启用的可填充章节
///
/// 顺序：目的 → 工作进度 → 结论；禁用的章节跳过。
/// 每个章节：重新读取文档库的当前状态组装提示词（后面的章节
/// 能看到前面章节刚写入的内容）→ 生成 → 取第一个变体 → 应用并持久化。
/// 请求严格串行，全程至多一个未完成的生成请求。
///
/// # 错误
/// 中途失败即中止：已完成的章节保持已提交状态，未开始的章节不受影响
///
/// # 返回值
/// 返回全部章节填充完成后的报告
#[tauri::command]
pub async fn fill_all_sections(
    space_id: String,
    report_id: String,
    store: State<'_, DocumentStore>,
) -> Result<LabReport, String> {
    let api_key = require_api_key(&store)?;

    for block in ai::FILL_ORDER {
        // 每轮都重取最新状态：上一轮的产出要成为这一轮的上下文
        let report = store.report(&space_id, &report_id)?;
        if !report.is_enabled(block) {
            continue;
        }

        let variants =
            generate_for_block(&store, &api_key, &space_id, &report_id, block).await?;
        let Some(first) = variants.into_iter().next() else {
            continue;
        };

        let updated = ai::apply_variant(&report, block, &first)?;
        store.replace_report(&space_id, updated).await?;
    }

    store.report(&space_id, &report_id)
}

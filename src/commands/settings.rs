//! # 全局设置与凭据 Tauri Commands
//!
//! 提供全局设置和 Gemini API 密钥的读写 command 处理函数：
//! - `read_settings` / `save_settings` - 读写全局设置
//! - `read_api_key` / `save_api_key` - 读写 API 密钥
//!
//! 读取直接返回文档库的内存快照（启动时已完成加载与容错合并）；
//! 保存走文档库的写透路径，落盘成功才返回。

use tauri::State;

use crate::models::settings::GlobalSettings;
use crate::services::store::DocumentStore;

/// 读取全局设置
///
/// 前端在应用启动和打开设置对话框时调用。
/// 存储缺失或损坏的情况在启动加载时已被默认值/逐字段合并消化，
/// 此处永远返回一个完整的设置对象。
///
/// # 参数
/// - `store` - Tauri managed state，文档库
#[tauri::command]
pub async fn read_settings(store: State<'_, DocumentStore>) -> Result<GlobalSettings, String> {
    Ok(store.settings())
}

/// 整体保存全局设置
///
/// 设置只通过设置对话框的显式保存动作整体替换，没有逐字段更新协议。
///
/// # 参数
/// - `settings` - 完整的新设置对象
/// - `store` - Tauri managed state，文档库
///
/// # 错误
/// 落盘失败时返回错误，内存与磁盘均保持旧值
#[tauri::command]
pub async fn save_settings(
    settings: GlobalSettings,
    store: State<'_, DocumentStore>,
) -> Result<(), String> {
    store.save_settings(settings).await
}

/// 读取 Gemini API 密钥
///
/// # 参数
/// - `store` - Tauri managed state，文档库
#[tauri::command]
pub async fn read_api_key(store: State<'_, DocumentStore>) -> Result<String, String> {
    Ok(store.api_key())
}

/// 保存 Gemini API 密钥
///
/// 密钥与设置是两个独立的存储键，设置对话框保存时分别调用两个 command。
///
/// # 参数
/// - `api_key` - 新的密钥字符串（可为空，表示清除）
/// - `store` - Tauri managed state，文档库
///
/// # 错误
/// 落盘失败时返回错误
#[tauri::command]
pub async fn save_api_key(
    api_key: String,
    store: State<'_, DocumentStore>,
) -> Result<(), String> {
    store.save_api_key(api_key).await
}

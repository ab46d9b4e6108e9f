//! # Reporter - Tauri 应用核心初始化模块
//!
//! 本模块负责 Tauri 应用的完整初始化流程，包括：
//! - 注册 Tauri 官方插件（文件系统、对话框、Opener、日志）
//! - 加载文档库（全局设置、课程空间、API 密钥）并注册为应用状态
//! - 注册自定义 Tauri commands（设置、空间、章节、AI、导出）
//! - 生成应用上下文并启动事件循环
//!
//! ## 架构说明
//! 通过将核心逻辑放在 `lib.rs` 而非 `main.rs` 中，
//! Tauri 可以在桌面端（`main.rs`）和移动端入口之间共享此初始化代码。
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（文档库、章节操作、AI、导出）
//! - `utils/` - 通用工具函数

mod commands;
mod models;
mod services;
mod utils;

use services::store::DocumentStore;

// `#[cfg_attr(mobile, tauri::mobile_entry_point)]`：条件编译属性
// 当目标平台为移动端（Android/iOS）时，此属性将 `run()` 函数标记为
// Tauri 移动端入口点；桌面端编译时不生效，`run()` 由 `main.rs` 直接调用。
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 构建并运行 Tauri 应用实例。该函数完成以下工作：
/// 1. 创建 `tauri::Builder` 默认实例
/// 2. 注册所需的 Tauri 插件（文件系统、对话框、Opener）
/// 3. 注册所有自定义 Tauri commands
/// 4. 在 `setup` 钩子中加载文档库并注册为应用状态、
///    按需注册调试专用插件（日志）
/// 5. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    tauri::Builder::default()
        // === 官方插件注册 ===
        // 文件系统插件：前端把导出的 DOCX/JSON 内容写入用户选定的路径
        .plugin(tauri_plugin_fs::init())
        // 对话框插件：提供原生的保存/打开文件对话框和确认删除对话框
        .plugin(tauri_plugin_dialog::init())
        // Opener 插件：用系统浏览器打开外部链接（Gemini API 密钥申请页面）
        .plugin(tauri_plugin_opener::init())
        // === 自定义 Tauri Commands 注册 ===
        // 所有 command 函数通过 `invoke_handler` 注册，前端通过 `invoke()` 调用
        .invoke_handler(tauri::generate_handler![
            // 设置与凭据 commands
            commands::settings::read_settings,
            commands::settings::save_settings,
            commands::settings::read_api_key,
            commands::settings::save_api_key,
            // 空间与报告生命周期 commands
            commands::spaces::list_spaces,
            commands::spaces::create_space,
            commands::spaces::delete_space,
            commands::spaces::add_report,
            commands::spaces::delete_report,
            commands::spaces::toggle_report_done,
            commands::spaces::update_report,
            // 章节结构操作 commands
            commands::sections::toggle_section,
            commands::sections::add_progress_item,
            commands::sections::remove_progress_item,
            commands::sections::attach_progress_image,
            commands::sections::detach_progress_image,
            commands::sections::set_code_attachment,
            // AI 草稿 commands
            commands::ai::generate_variants,
            commands::ai::apply_variant,
            commands::ai::fill_all_sections,
            // 导出与导入 commands
            commands::export::export_report_docx,
            commands::export::export_report_json,
            commands::export::import_report_json,
        ])
        // `setup` 闭包：在应用窗口创建之前执行的初始化钩子
        .setup(|app| {
            use tauri::Manager;

            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // === 文档库加载与注册 ===
            // 启动时一次性读取三个存储键（settings.json / spaces.json /
            // api-key.txt），解析失败按键各自回落，绝不中断启动。
            // 注册为 Tauri managed state 后，所有 command 可通过
            // `State<DocumentStore>` 参数注入访问。
            let data_dir = utils::path::get_reporter_data_path()?;
            app.manage(DocumentStore::load(data_dir));

            Ok(())
        })
        // `tauri::generate_context!()` 宏：在编译时读取 `tauri.conf.json` 配置文件，
        // 生成包含应用名称、窗口配置、安全策略等信息的上下文对象。
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

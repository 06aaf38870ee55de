// ==========================================
// 供应商目录 - 批量导入命令行入口
// ==========================================
// 用法: supplier-import <FILE> [--db PATH] [--yes] [--json] [--locale LOCALE]
// 流程: 读取文件 → 打印预览 → 确认 → 提交 → 打印汇总
// ==========================================

use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use supplier_import::api::{ImportApi, ImportPreviewResponse, ImportSummaryResponse};
use supplier_import::i18n::{set_locale, t, t_with_args};
use supplier_import::{db, logging};

#[derive(Parser)]
#[command(name = "supplier-import")]
#[command(about = "Bulk import suppliers from an .xlsx or .csv spreadsheet")]
#[command(version)]
struct Cli {
    /// Spreadsheet to import (.xlsx or .csv)
    file: PathBuf,

    /// SQLite database path (defaults to SUPPLIER_IMPORT_DB_PATH or the user data dir)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Commit without asking for confirmation
    #[arg(long, short = 'y', default_value_t = false)]
    yes: bool,

    /// Print preview and summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Message language (pt-BR, en, zh-CN); overrides the stored setting
    #[arg(long)]
    locale: Option<String>,

    /// Emit logs as JSON on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    tracing::info!(version = supplier_import::VERSION, "{}", supplier_import::APP_NAME);

    let db_path = cli.db.clone().unwrap_or_else(db::default_db_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建数据库目录: {}", parent.display()))?;
    }
    tracing::info!(db_path = %db_path.display(), "使用数据库");

    let mut api = ImportApi::new(&db_path.to_string_lossy()).await?;
    if let Some(locale) = &cli.locale {
        set_locale(locale);
    }

    // 阶段 0: 读取文件（格式错误直接结束）
    if let Err(e) = api.load_file(&cli.file) {
        eprintln!("{}", t_with_args("cli.error", &[("message", e.to_string().as_str())]));
        eprintln!("{}", t("cli.expected_headers"));
        return Err(e.into());
    }

    // 阶段 1-3: 预览
    let preview = api.preview()?;
    print_preview(&preview, cli.json)?;

    if preview.valid_rows == 0 {
        api.cancel()?;
        if !cli.json {
            println!("{}", t("cli.no_valid_rows"));
        }
        return Ok(());
    }

    if !cli.yes && !ask_confirmation(preview.valid_rows)? {
        api.cancel()?;
        println!("{}", t("cli.cancelled"));
        return Ok(());
    }

    // 阶段 4: 提交
    let summary = api.confirm().await?;
    print_summary(&summary, cli.json)?;

    Ok(())
}

fn print_preview(preview: &ImportPreviewResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(preview)?);
        return Ok(());
    }

    println!(
        "{}",
        t_with_args(
            "cli.preview_header",
            &[
                ("file", preview.file_name.as_str()),
                ("total", preview.total_rows.to_string().as_str()),
                ("valid", preview.valid_rows.to_string().as_str()),
                ("invalid", preview.invalid_rows.to_string().as_str()),
            ],
        )
    );

    for row in preview.rows.iter().filter(|r| !r.valid) {
        println!(
            "  {}",
            t_with_args(
                "cli.row_invalid",
                &[
                    ("row", row.row_number.to_string().as_str()),
                    ("errors", row.errors.join("; ").as_str()),
                ],
            )
        );
    }

    Ok(())
}

fn print_summary(summary: &ImportSummaryResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "{}",
        t_with_args(
            "cli.summary",
            &[
                ("succeeded", summary.succeeded.to_string().as_str()),
                ("failed", summary.failed.to_string().as_str()),
                ("skipped", summary.skipped_invalid.to_string().as_str()),
            ],
        )
    );

    for error in &summary.errors {
        println!(
            "  {}",
            t_with_args(
                "cli.row_failed",
                &[
                    ("row", error.row_number.to_string().as_str()),
                    ("name", error.supplier_name.as_str()),
                    ("message", error.message.as_str()),
                ],
            )
        );
    }

    Ok(())
}

/// 从 stdin 读取确认（s/sim/y/yes）
fn ask_confirmation(count: usize) -> anyhow::Result<bool> {
    print!(
        "{}",
        t_with_args("cli.confirm_prompt", &[("count", count.to_string().as_str())])
    );
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes" | "是"
    ))
}

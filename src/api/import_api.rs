// ==========================================
// 供应商导入API
// ==========================================
// 职责: 封装导入控制器（SQLite 仓储 + config_kv 配置）
// 输出: 可序列化的预览 / 汇总响应
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import::{ImportSummary, RowCommitError, SupplierField, ValidatedImportRecord};
use crate::importer::column_resolver::ColumnResolver;
use crate::importer::{ImportController, ImportState};
use crate::repository::SupplierCommitRepositoryImpl;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 表头命中情况
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub field: SupplierField,
    pub header: String,
}

/// 单行预览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowPreview {
    pub row_number: usize,
    pub name: String,
    pub kind: String,
    pub region_code: String,
    pub minimum_order: f64,
    pub social_handle: String,
    pub categories: Vec<String>,
    pub valid: bool,
    pub errors: Vec<String>,
}

impl From<&ValidatedImportRecord> for RowPreview {
    fn from(record: &ValidatedImportRecord) -> Self {
        Self {
            row_number: record.row_number,
            name: record.draft.name.clone(),
            kind: record.draft.kind.to_string(),
            region_code: record.draft.region_code.clone(),
            minimum_order: record.draft.minimum_order,
            social_handle: record.draft.social_handle.clone(),
            categories: record.draft.categories.clone(),
            valid: record.valid,
            errors: record.error_messages(),
        }
    }
}

/// 预览响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreviewResponse {
    pub file_name: String,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    /// 首行表头与规范字段的对应关系
    pub matched_columns: Vec<ColumnMatch>,
    pub rows: Vec<RowPreview>,
}

/// 提交汇总响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummaryResponse {
    pub batch_id: String,
    pub file_name: String,
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped_invalid: usize,
    pub errors: Vec<RowCommitError>,
    /// 提交耗时（毫秒）
    pub elapsed_ms: u64,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            batch_id: summary.batch_id,
            file_name: summary.file_name,
            total_rows: summary.total_rows,
            succeeded: summary.outcome.succeeded,
            failed: summary.outcome.failed,
            skipped_invalid: summary.skipped_invalid,
            errors: summary.outcome.errors,
            elapsed_ms: summary.elapsed_time.as_millis() as u64,
        }
    }
}

/// 导入API
pub struct ImportApi {
    controller: ImportController<SupplierCommitRepositoryImpl>,
    config: ConfigManager,
}

impl ImportApi {
    /// 打开（必要时创建）数据库并按配置初始化控制器
    pub async fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let repo = SupplierCommitRepositoryImpl::from_connection(conn);
        let controller = ImportController::from_config(repo, &config).await?;

        info!(db_path, "导入API已初始化");
        Ok(Self { controller, config })
    }

    pub fn state(&self) -> ImportState {
        self.controller.state()
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn repository(&self) -> &SupplierCommitRepositoryImpl {
        self.controller.repository()
    }

    /// 从磁盘读取文件
    ///
    /// # 返回
    /// - Ok(usize): 数据行数
    pub fn load_file(&mut self, file_path: &Path) -> ApiResult<usize> {
        Ok(self.controller.load_path(file_path)?)
    }

    /// 从内存读取文件内容（上传场景）
    pub fn load_bytes(&mut self, file_name: &str, bytes: &[u8]) -> ApiResult<usize> {
        Ok(self.controller.load_file(file_name, bytes)?)
    }

    /// 生成预览
    pub fn preview(&mut self) -> ApiResult<ImportPreviewResponse> {
        let matched_columns = self
            .controller
            .rows()
            .first()
            .map(|row| {
                ColumnResolver
                    .matched_headers(row)
                    .into_iter()
                    .map(|(field, header)| ColumnMatch { field, header })
                    .collect()
            })
            .unwrap_or_default();

        let file_name = self.controller.file_name().to_string();
        let records = self.controller.preview()?;

        let rows: Vec<RowPreview> = records.iter().map(RowPreview::from).collect();
        let valid_rows = rows.iter().filter(|r| r.valid).count();

        Ok(ImportPreviewResponse {
            file_name,
            total_rows: rows.len(),
            valid_rows,
            invalid_rows: rows.len() - valid_rows,
            matched_columns,
            rows,
        })
    }

    /// 确认提交
    pub async fn confirm(&mut self) -> ApiResult<ImportSummaryResponse> {
        let summary = self.controller.confirm().await?;
        Ok(summary.into())
    }

    /// 取消预览中的批次
    pub fn cancel(&mut self) -> ApiResult<()> {
        Ok(self.controller.cancel()?)
    }
}

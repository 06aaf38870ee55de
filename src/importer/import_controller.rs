// ==========================================
// 供应商目录 - 批量预览与提交控制器
// ==========================================
// 状态: Idle → Parsed → Previewing → Committing → Idle
// 流程: 接收数据集 → 逐行校验（预览）→ 用户确认 → 顺序提交
// 约束: 提交严格串行（上一行的所有 await 完成后才处理下一行）
// 约束: 单行失败不中断批次；已插入的供应商不回滚
// 约束: 提交 future 中途被丢弃时，下一次操作先把批次丢弃并复位为 Idle
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::{DEFAULT_IMPORTED_BY, DEFAULT_MAX_IMPORT_ROWS};
use crate::domain::import::{ImportOutcome, ImportSummary, RawRow, ValidatedImportRecord};
use crate::domain::supplier::{CategoryId, SupplierId};
use crate::i18n::t_with_args;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{extension_of, is_accepted_extension, UniversalFileParser};
use crate::importer::importer_trait::{FileParser, RowValidator};
use crate::importer::row_validator::RowValidatorImpl;
use crate::repository::supplier_commit_repo::SupplierCommitRepository;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportState - 控制器状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportState {
    Idle,
    Parsed,
    Previewing,
    Committing,
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ==========================================
// ImportSettings - 导入参数（启动时从配置读取）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
    pub max_rows: usize,
    pub imported_by: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_IMPORT_ROWS,
            imported_by: DEFAULT_IMPORTED_BY.to_string(),
        }
    }
}

// ==========================================
// ImportController
// ==========================================
pub struct ImportController<R>
where
    R: SupplierCommitRepository,
{
    // 阶段组件
    parser: Box<dyn FileParser>,
    validator: Box<dyn RowValidator>,

    // 持久化协作者
    repo: R,

    settings: ImportSettings,

    // 批次状态（仅内存）
    state: ImportState,
    file_name: String,
    rows: Vec<RawRow>,
    records: Vec<ValidatedImportRecord>,
}

impl<R> ImportController<R>
where
    R: SupplierCommitRepository,
{
    /// 使用默认解析器 / 校验器 / 参数创建控制器
    pub fn new(repo: R) -> Self {
        Self::with_components(
            repo,
            Box::new(UniversalFileParser),
            Box::new(RowValidatorImpl::new()),
            ImportSettings::default(),
        )
    }

    /// 注入全部组件
    pub fn with_components(
        repo: R,
        parser: Box<dyn FileParser>,
        validator: Box<dyn RowValidator>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            parser,
            validator,
            repo,
            settings,
            state: ImportState::Idle,
            file_name: String::new(),
            rows: Vec::new(),
            records: Vec::new(),
        }
    }

    /// 读取配置后创建控制器（同时切换消息语言）
    pub async fn from_config(repo: R, config: &dyn ImportConfigReader) -> ImportResult<Self> {
        let locale = config
            .get_locale()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: "locale".to_string(),
                message: e.to_string(),
            })?;
        let max_rows = config
            .get_max_import_rows()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: "max_import_rows".to_string(),
                message: e.to_string(),
            })?;
        let imported_by = config
            .get_imported_by()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: "imported_by".to_string(),
                message: e.to_string(),
            })?;

        crate::i18n::set_locale(&locale);
        debug!(locale = %locale, max_rows, imported_by = %imported_by, "导入配置已加载");

        let mut controller = Self::new(repo);
        controller.settings = ImportSettings {
            max_rows,
            imported_by,
        };
        Ok(controller)
    }

    // ===== 只读访问 =====

    pub fn state(&self) -> ImportState {
        self.state
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 当前批次的校验记录（仅 Previewing 状态非空）
    pub fn records(&self) -> &[ValidatedImportRecord] {
        &self.records
    }

    /// 已解析、待校验的原始行（仅 Parsed 状态非空）
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn ensure_state(&mut self, expected: ImportState) -> ImportResult<()> {
        // confirm 期间控制器被 &mut 独占；此处仍见 Committing 说明提交 future 已被丢弃
        if self.state == ImportState::Committing {
            warn!(file_name = %self.file_name, "上次提交未完成即被中止，批次已丢弃");
            self.clear_batch();
        }

        if self.state == expected {
            Ok(())
        } else {
            Err(ImportError::InvalidState {
                current: self.state.to_string(),
                expected: expected.to_string(),
            })
        }
    }

    // ===== Idle → Parsed =====

    /// 解析文件内容并接收数据集
    ///
    /// # 返回
    /// - Ok(usize): 数据行数
    /// - Err: 格式错误（状态保持 Idle）
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn load_file(&mut self, file_name: &str, bytes: &[u8]) -> ImportResult<usize> {
        self.ensure_state(ImportState::Idle)?;

        let extension = extension_of(file_name);
        if !is_accepted_extension(&extension) {
            warn!(file_name, extension = %extension, "文件格式不支持");
            return Err(ImportError::UnsupportedFormat(extension));
        }

        let rows = self.parser.parse_bytes(bytes, &extension).map_err(|e| {
            warn!(file_name, error = %e, "文件解析失败");
            e
        })?;

        self.receive_dataset_named(file_name, &extension, rows)
    }

    /// 从磁盘读取文件
    ///
    /// # 返回
    /// - Ok(usize): 数据行数
    /// - Err(FileNotFound) / 格式错误（状态保持 Idle）
    #[instrument(skip(self), fields(file_path = %file_path.display()))]
    pub fn load_path(&mut self, file_path: &Path) -> ImportResult<usize> {
        self.ensure_state(ImportState::Idle)?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(&file_name);
        if !is_accepted_extension(&extension) {
            warn!(file_name = %file_name, extension = %extension, "文件格式不支持");
            return Err(ImportError::UnsupportedFormat(extension));
        }

        let rows = self.parser.parse_path(file_path).map_err(|e| {
            warn!(file_name = %file_name, error = %e, "文件解析失败");
            e
        })?;

        self.receive_dataset_named(&file_name, &extension, rows)
    }

    /// 接收外部已解析的数据集
    pub fn receive_dataset(&mut self, extension: &str, rows: Vec<RawRow>) -> ImportResult<usize> {
        self.ensure_state(ImportState::Idle)?;
        self.receive_dataset_named("", extension, rows)
    }

    fn receive_dataset_named(
        &mut self,
        file_name: &str,
        extension: &str,
        rows: Vec<RawRow>,
    ) -> ImportResult<usize> {
        if !is_accepted_extension(extension) {
            return Err(ImportError::UnsupportedFormat(
                extension.trim_start_matches('.').to_lowercase(),
            ));
        }

        if rows.is_empty() {
            warn!(file_name, "数据集为空");
            return Err(ImportError::EmptyDataset);
        }

        if rows.len() > self.settings.max_rows {
            warn!(file_name, rows = rows.len(), limit = self.settings.max_rows, "数据行过多");
            return Err(ImportError::TooManyRows {
                rows: rows.len(),
                limit: self.settings.max_rows,
            });
        }

        let count = rows.len();
        self.file_name = file_name.to_string();
        self.rows = rows;
        self.state = ImportState::Parsed;

        info!(file_name, rows = count, "数据集已接收");
        Ok(count)
    }

    // ===== Parsed → Previewing =====

    /// 逐行校验（即使全部无效也进入预览）
    pub fn preview(&mut self) -> ImportResult<&[ValidatedImportRecord]> {
        self.ensure_state(ImportState::Parsed)?;

        let rows = std::mem::take(&mut self.rows);
        self.records = self.validator.validate_rows(&rows);
        self.state = ImportState::Previewing;

        let valid = self.records.iter().filter(|r| r.valid).count();
        info!(
            file_name = %self.file_name,
            total = self.records.len(),
            valid,
            invalid = self.records.len() - valid,
            "预览已生成"
        );

        Ok(&self.records)
    }

    // ===== Previewing → Idle =====

    /// 取消: 丢弃内存中的批次
    pub fn cancel(&mut self) -> ImportResult<()> {
        self.ensure_state(ImportState::Previewing)?;

        info!(file_name = %self.file_name, records = self.records.len(), "导入已取消");
        self.clear_batch();
        Ok(())
    }

    fn clear_batch(&mut self) {
        self.file_name.clear();
        self.rows.clear();
        self.records.clear();
        self.state = ImportState::Idle;
    }

    // ===== Previewing → Committing → Idle =====

    /// 确认提交: 仅提交有效行，逐行串行
    #[instrument(skip(self), fields(file_name = %self.file_name))]
    pub async fn confirm(&mut self) -> ImportResult<ImportSummary> {
        self.ensure_state(ImportState::Previewing)?;
        self.state = ImportState::Committing;

        let batch_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        let records = std::mem::take(&mut self.records);
        let total_rows = records.len();
        let skipped_invalid = records.iter().filter(|r| !r.valid).count();

        info!(
            batch_id = %batch_id,
            total_rows,
            to_commit = total_rows - skipped_invalid,
            skipped_invalid,
            "开始提交"
        );

        // 分类快照: 每批次读取一次，仅用于跳过已知分类的创建
        let known_categories = match self.repo.list_categories().await {
            Ok(names) => names,
            Err(e) => {
                warn!(batch_id = %batch_id, error = %e, "分类列表读取失败，按空快照处理");
                HashSet::new()
            }
        };

        let mut outcome = ImportOutcome::default();
        for record in records.iter().filter(|r| r.valid) {
            self.commit_record(record, &known_categories, &mut outcome).await;
        }

        let summary = ImportSummary {
            batch_id,
            file_name: self.file_name.clone(),
            total_rows,
            skipped_invalid,
            outcome,
            elapsed_time: started.elapsed(),
        };

        info!(
            batch_id = %summary.batch_id,
            succeeded = summary.outcome.succeeded,
            failed = summary.outcome.failed,
            skipped_invalid,
            elapsed_ms = summary.elapsed_time.as_millis() as u64,
            "提交完成"
        );

        self.clear_batch();
        Ok(summary)
    }

    /// 提交单行，结果记入 outcome
    async fn commit_record(
        &self,
        record: &ValidatedImportRecord,
        known_categories: &HashSet<String>,
        outcome: &mut ImportOutcome,
    ) {
        let draft = &record.draft;

        // 1. 插入供应商
        let supplier_id = match self
            .repo
            .create_supplier(draft, &self.settings.imported_by)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!(row_number = record.row_number, name = %draft.name, error = %e, "供应商插入失败");
                outcome.record_failure(record.row_number, &draft.name, e.to_string());
                return;
            }
        };

        // 2. 确保快照之外的分类存在（失败不影响本行）
        for name in draft.categories.iter().filter(|n| !known_categories.contains(*n)) {
            match self.repo.ensure_category(name).await {
                Ok(true) => debug!(category = %name, "分类已创建"),
                Ok(false) => debug!(category = %name, "分类已存在"),
                Err(e) if e.is_unique_violation() => debug!(category = %name, "分类重复，忽略"),
                Err(e) => warn!(category = %name, error = %e, "分类创建失败，继续"),
            }
        }

        // 3-4. 重新解析分类 ID 并关联
        match self.link_record(&supplier_id, &draft.categories).await {
            Ok(()) => {
                debug!(row_number = record.row_number, supplier_id = %supplier_id, "行提交成功");
                outcome.record_success();
            }
            Err(message) => {
                // 供应商已插入，不回滚
                warn!(
                    row_number = record.row_number,
                    supplier_id = %supplier_id,
                    error = %message,
                    "分类关联失败"
                );
                outcome.record_failure(record.row_number, &draft.name, message);
            }
        }
    }

    /// 解析分类 ID 并关联；部分分类缺失时仍关联其余分类，但本行计为失败
    async fn link_record(
        &self,
        supplier_id: &SupplierId,
        categories: &[String],
    ) -> Result<(), String> {
        let resolved = self
            .repo
            .resolve_category_ids(categories)
            .await
            .map_err(|e| e.to_string())?;

        // 保持分类顺序，去掉重复 ID
        let mut seen = HashSet::new();
        let mut category_ids: Vec<CategoryId> = Vec::with_capacity(categories.len());
        let mut missing: Vec<&str> = Vec::new();
        for name in categories {
            match resolved.get(name) {
                Some(id) => {
                    if seen.insert(id.clone()) {
                        category_ids.push(id.clone());
                    }
                }
                None => missing.push(name.as_str()),
            }
        }

        if !category_ids.is_empty() {
            self.repo
                .link_categories(supplier_id, &category_ids)
                .await
                .map_err(|e| e.to_string())?;
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(t_with_args(
                "import.commit.categories_unresolved",
                &[("names", missing.join(", ").as_str())],
            ))
        }
    }
}

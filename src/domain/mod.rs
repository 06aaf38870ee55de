// ==========================================
// 供应商目录 - 领域模型层
// ==========================================
// 职责: 定义供应商草稿、导入行、提交结果等领域类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod import;
pub mod supplier;

// 重导出核心类型
pub use import::{
    ImportOutcome, ImportSummary, RawRow, RawValue, RowCommitError, RowError, SupplierField,
    ValidatedImportRecord,
};
pub use supplier::{CategoryId, NormalizedKind, SupplierDraft, SupplierId, SupplierKind};

// ==========================================
// 供应商目录 - 行校验器实现
// ==========================================
// 职责: 解析列 → 归一化 → 组装草稿 → 逐项校验
// 顺序: 名称 → 类型 → 州 → 起订金额 → 社交账号 → 分类
// 约束: 不短路，所有失败项一次性报告；纯函数，行间无依赖
// ==========================================

use crate::domain::import::{RawRow, RowError, SupplierField, ValidatedImportRecord};
use crate::domain::supplier::{NormalizedKind, SupplierDraft};
use crate::i18n::{t, t_with_args};
use crate::importer::column_resolver::ColumnResolver;
use crate::importer::importer_trait::RowValidator;
use crate::importer::normalizer::{
    extract_number, normalize_categories, normalize_handle, normalize_kind, normalize_region,
};
use tracing::debug;

pub struct RowValidatorImpl {
    resolver: ColumnResolver,
}

impl RowValidatorImpl {
    pub fn new() -> Self {
        Self {
            resolver: ColumnResolver,
        }
    }

    /// 解析并归一化六个规范字段
    fn build_draft(&self, row: &RawRow) -> SupplierDraft {
        let name = self.resolver.resolve(row, SupplierField::Name);
        let kind = self.resolver.resolve(row, SupplierField::Kind);
        let region = self.resolver.resolve(row, SupplierField::Region);
        let minimum_order = self.resolver.resolve(row, SupplierField::MinimumOrder);
        let handle = self.resolver.resolve(row, SupplierField::SocialHandle);
        let categories = self.resolver.resolve(row, SupplierField::Categories);

        SupplierDraft {
            name: name.to_string().trim().to_string(),
            kind: normalize_kind(&kind.to_string()),
            region_code: normalize_region(&region.to_string()),
            minimum_order: extract_number(&minimum_order),
            social_handle: normalize_handle(&handle.to_string()),
            categories: normalize_categories(&categories),
        }
    }

    fn check_draft(draft: &SupplierDraft) -> Vec<RowError> {
        let mut errors = Vec::new();

        // 1. 名称
        if draft.name.is_empty() {
            errors.push(RowError {
                field: SupplierField::Name,
                message: t("import.row.name_required"),
            });
        }

        // 2. 类型
        if let NormalizedKind::Unrecognized(raw) = &draft.kind {
            errors.push(RowError {
                field: SupplierField::Kind,
                message: t_with_args("import.row.kind_invalid", &[("value", raw.as_str())]),
            });
        }

        // 3. 州代码（只检查长度，不检查是否为真实州）
        if draft.region_code.chars().count() != 2 {
            errors.push(RowError {
                field: SupplierField::Region,
                message: t_with_args(
                    "import.row.region_invalid",
                    &[("value", draft.region_code.as_str())],
                ),
            });
        }

        // 4. 起订金额
        if draft.minimum_order <= 0.0 {
            errors.push(RowError {
                field: SupplierField::MinimumOrder,
                message: t("import.row.min_order_invalid"),
            });
        }

        // 5. 社交账号（"@" 之外必须有内容）
        if draft.social_handle.chars().count() <= 1 {
            errors.push(RowError {
                field: SupplierField::SocialHandle,
                message: t("import.row.handle_required"),
            });
        }

        // 6. 分类
        if draft.categories.is_empty() {
            errors.push(RowError {
                field: SupplierField::Categories,
                message: t("import.row.categories_required"),
            });
        }

        errors
    }
}

impl Default for RowValidatorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidator for RowValidatorImpl {
    fn validate_row(&self, row: &RawRow, row_number: usize) -> ValidatedImportRecord {
        let draft = self.build_draft(row);
        let errors = Self::check_draft(&draft);

        if !errors.is_empty() {
            debug!(
                row_number,
                error_count = errors.len(),
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "行校验未通过"
            );
        }

        ValidatedImportRecord {
            row_number,
            valid: errors.is_empty(),
            draft,
            errors,
        }
    }
}

// ==========================================
// 供应商目录 - 导入组件 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::import::{RawRow, ValidatedImportRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::extension_of;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件内容为原始行记录
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - extension: 文件扩展名（不含点，大小写不敏感）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过全空行）
    /// - Err: 扩展名不支持、内容无法读取
    fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<Vec<RawRow>>;

    /// 从磁盘读取并解析（扩展名取自文件名）
    ///
    /// # 返回
    /// - Err(FileNotFound): 文件不存在
    fn parse_path(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let extension = extension_of(&file_path.to_string_lossy());
        let bytes = std::fs::read(file_path)?;
        self.parse_bytes(&bytes, &extension)
    }
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 单行解析 + 归一化 + 校验（阶段 1-3）
// 实现者: RowValidatorImpl
pub trait RowValidator: Send + Sync {
    /// 校验单行
    ///
    /// # 参数
    /// - row: 原始行
    /// - row_number: 数据行号（用于预览报告）
    ///
    /// # 返回
    /// - ValidatedImportRecord: 草稿 + 有效标记 + 全部错误（不短路）
    fn validate_row(&self, row: &RawRow, row_number: usize) -> ValidatedImportRecord;

    /// 批量校验（行之间相互独立）
    fn validate_rows(&self, rows: &[RawRow]) -> Vec<ValidatedImportRecord> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.validate_row(row, idx + 1))
            .collect()
    }
}

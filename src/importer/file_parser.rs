// ==========================================
// 供应商目录 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::domain::import::{RawRow, RawValue};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

/// 可接受的扩展名
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["xlsx", "csv"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 扩展名是否受支持（大小写不敏感，允许带点）
pub fn is_accepted_extension(extension: &str) -> bool {
    let ext = extension.trim().trim_start_matches('.').to_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str())
}

/// 从文件名提取小写扩展名
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 根据表头行判断分隔符（巴西地区 Excel 导出的 CSV 常用 ';'）
    fn detect_delimiter(content: &[u8]) -> u8 {
        let header_line = content.split(|b| *b == b'\n').next().unwrap_or(&[]);
        let semicolons = header_line.iter().filter(|b| **b == b';').count();
        let commas = header_line.iter().filter(|b| **b == b',').count();
        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<Vec<RawRow>> {
        // 检查扩展名
        let ext = extension.trim_start_matches('.').to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let delimiter = Self::detect_delimiter(content);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .delimiter(delimiter)
            .from_reader(content);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRow::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row.insert(header.clone(), RawValue::from(value.trim()));
                }
            }

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn cell_to_raw(cell: &Data) -> RawValue {
        match cell {
            Data::Empty => RawValue::Empty,
            Data::Int(i) => RawValue::Number(*i as f64),
            Data::Float(f) => RawValue::Number(*f),
            Data::String(s) => RawValue::from(s.trim()),
            other => RawValue::from(other.to_string().trim()),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<Vec<RawRow>> {
        // 检查扩展名
        let ext = extension.trim_start_matches('.').to_lowercase();
        if ext != "xlsx" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件
        let mut workbook: Xlsx<Cursor<Vec<u8>>> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row = RawRow::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row.insert(header.clone(), Self::cell_to_raw(cell));
                }
            }

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            records.push(row);
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<Vec<RawRow>> {
        let ext = extension.trim_start_matches('.').to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_bytes(bytes, &ext),
            "xlsx" => ExcelParser.parse_bytes(bytes, &ext),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

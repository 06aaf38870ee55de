// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、临时表格文件、示例数据
// ==========================================

#![allow(dead_code)]

use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use supplier_import::db::{init_schema, open_sqlite_connection};
use supplier_import::domain::RawRow;
use tempfile::NamedTempFile;

/// 表头与原始表单一致的示例 CSV
pub const SAMPLE_CSV: &str = "\
Nome,Tipo,Região,Pedido Mínimo,Instagram,Categorias
Cy Pratas,Fabricante,SP,R$ 500,@pratas_cy,\"Prata,Folheado\"
Ouro Fino,Atacadista,Minas Gerais,,ourofino,Ouro
";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入 config_kv（global scope）
pub fn insert_test_config(conn: &Connection, entries: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))",
            [*key, *value],
        )?;
    }
    Ok(())
}

/// 预置分类
pub fn insert_test_categories(conn: &Connection, names: &[&str]) -> Result<(), Box<dyn Error>> {
    for (idx, name) in names.iter().enumerate() {
        conn.execute(
            "INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, datetime('now'))",
            [format!("seed-{}", idx).as_str(), *name],
        )?;
    }
    Ok(())
}

/// 写出带指定后缀的临时文件
pub fn write_temp_file(suffix: &str, contents: &[u8]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}

/// 按 (表头, 值) 构造原始行
pub fn raw_row(cells: &[(&str, &str)]) -> RawRow {
    cells.iter().map(|(h, v)| (*h, *v)).collect()
}

/// 六个字段均合法的行
pub fn valid_row(name: &str, categories: &str) -> RawRow {
    raw_row(&[
        ("Nome", name),
        ("Tipo", "Fabricante"),
        ("Região", "SP"),
        ("Pedido Mínimo", "R$ 500"),
        ("Instagram", "@pratas_cy"),
        ("Categorias", categories),
    ])
}

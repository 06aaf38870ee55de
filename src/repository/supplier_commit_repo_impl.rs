// ==========================================
// 供应商目录 - 供应商提交 Repository 实现
// ==========================================
// 职责: 实现 SupplierCommitRepository（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 说明: 单行提交不回滚；只有关联插入在同一事务内
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::supplier::{CategoryId, SupplierDraft, SupplierId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::supplier_commit_repo::SupplierCommitRepository;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

// ==========================================
// SupplierCommitRepositoryImpl
// ==========================================
pub struct SupplierCommitRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierCommitRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（与 ConfigManager 共用连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== 查询辅助 =====

    /// 供应商总数
    pub fn count_suppliers(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM suppliers", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按名称查找供应商 ID（同名取最早创建者）
    pub fn find_supplier_id_by_name(&self, name: &str) -> RepositoryResult<Option<SupplierId>> {
        let conn = self.lock()?;
        let id = conn
            .query_row(
                "SELECT id FROM suppliers WHERE name = ?1 ORDER BY created_at LIMIT 1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id.map(SupplierId))
    }

    /// 供应商已关联的分类名（按名称排序）
    pub fn categories_of_supplier(&self, supplier_id: &SupplierId) -> RepositoryResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.name
            FROM supplier_categories sc
            JOIN categories c ON c.id = sc.category_id
            WHERE sc.supplier_id = ?1
            ORDER BY c.name
            "#,
        )?;

        let names = stmt
            .query_map(params![supplier_id.0], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

// ==========================================
// SupplierCommitRepository Trait 实现
// ==========================================
#[async_trait]
impl SupplierCommitRepository for SupplierCommitRepositoryImpl {
    async fn list_categories(&self) -> RepositoryResult<HashSet<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM categories")?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(names)
    }

    async fn create_supplier(
        &self,
        draft: &SupplierDraft,
        created_by: &str,
    ) -> RepositoryResult<SupplierId> {
        let kind = draft.kind.known().ok_or_else(|| RepositoryError::FieldValueError {
            field: "type".to_string(),
            message: format!("无法识别的供应商类型: {}", draft.kind),
        })?;

        let id = Uuid::new_v4().to_string();
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO suppliers (
                id, name, type, region, min_order, instagram, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                id,
                draft.name,
                kind.as_db_value(),
                draft.region_code,
                draft.minimum_order,
                draft.social_handle,
                created_by,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(SupplierId(id))
    }

    async fn ensure_category(&self, name: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;

        // 重名即忽略，不读后写
        let inserted = conn.execute(
            r#"
            INSERT INTO categories (id, name, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO NOTHING
            "#,
            params![Uuid::new_v4().to_string(), name, Utc::now().to_rfc3339()],
        )?;

        Ok(inserted > 0)
    }

    async fn resolve_category_ids(
        &self,
        names: &[String],
    ) -> RepositoryResult<HashMap<String, CategoryId>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id FROM categories WHERE name = ?1")?;

        let mut resolved = HashMap::new();
        for name in names {
            if resolved.contains_key(name) {
                continue;
            }
            let id = stmt
                .query_row(params![name], |row| row.get::<_, String>(0))
                .optional()?;
            if let Some(id) = id {
                resolved.insert(name.clone(), CategoryId(id));
            }
        }

        Ok(resolved)
    }

    async fn link_categories(
        &self,
        supplier_id: &SupplierId,
        category_ids: &[CategoryId],
    ) -> RepositoryResult<()> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO supplier_categories (supplier_id, category_id) VALUES (?1, ?2)",
            )?;
            for category_id in category_ids {
                stmt.execute(params![supplier_id.0, category_id.0])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::domain::supplier::{NormalizedKind, SupplierKind};

    fn setup() -> SupplierCommitRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        SupplierCommitRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn draft(kind: NormalizedKind) -> SupplierDraft {
        SupplierDraft {
            name: "Cy Pratas".to_string(),
            kind,
            region_code: "SP".to_string(),
            minimum_order: 500.0,
            social_handle: "@pratas_cy".to_string(),
            categories: vec!["Prata".to_string()],
        }
    }

    #[tokio::test]
    async fn test_ensure_category_is_idempotent() {
        let repo = setup();

        assert!(repo.ensure_category("Prata").await.unwrap());
        assert!(!repo.ensure_category("Prata").await.unwrap());

        let categories = repo.list_categories().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert!(categories.contains("Prata"));
    }

    #[tokio::test]
    async fn test_create_and_link_supplier() {
        let repo = setup();
        repo.ensure_category("Prata").await.unwrap();
        repo.ensure_category("Folheado").await.unwrap();

        let id = repo
            .create_supplier(&draft(NormalizedKind::Known(SupplierKind::Manufacturer)), "import")
            .await
            .unwrap();

        let names = vec!["Prata".to_string(), "Folheado".to_string(), "Ouro".to_string()];
        let resolved = repo.resolve_category_ids(&names).await.unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(!resolved.contains_key("Ouro"));

        let ids: Vec<CategoryId> = resolved.into_values().collect();
        repo.link_categories(&id, &ids).await.unwrap();
        // 重复关联不报错
        repo.link_categories(&id, &ids).await.unwrap();

        assert_eq!(repo.count_suppliers().unwrap(), 1);
        assert_eq!(
            repo.categories_of_supplier(&id).unwrap(),
            vec!["Folheado".to_string(), "Prata".to_string()]
        );
        assert_eq!(repo.find_supplier_id_by_name("Cy Pratas").unwrap(), Some(id));
    }

    #[tokio::test]
    async fn test_create_supplier_rejects_unrecognized_kind() {
        let repo = setup();

        let result = repo
            .create_supplier(&draft(NormalizedKind::Unrecognized("Loja".to_string())), "import")
            .await;

        assert!(matches!(result, Err(RepositoryError::FieldValueError { .. })));
        assert_eq!(repo.count_suppliers().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_link_unknown_category_is_foreign_key_error() {
        let repo = setup();
        let id = repo
            .create_supplier(&draft(NormalizedKind::Known(SupplierKind::Wholesaler)), "import")
            .await
            .unwrap();

        let result = repo
            .link_categories(&id, &[CategoryId("missing".to_string())])
            .await;

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
        // 事务回滚，不留半截关联
        assert!(repo.categories_of_supplier(&id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_link_inside_open_transaction_is_transaction_error() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        let shared = Arc::new(Mutex::new(conn));
        let repo = SupplierCommitRepositoryImpl::from_connection(shared.clone());

        let id = repo
            .create_supplier(&draft(NormalizedKind::Known(SupplierKind::Manufacturer)), "import")
            .await
            .unwrap();
        repo.ensure_category("Prata").await.unwrap();
        let ids: Vec<CategoryId> = repo
            .resolve_category_ids(&["Prata".to_string()])
            .await
            .unwrap()
            .into_values()
            .collect();

        // 共享连接上已有未结束的事务
        shared.lock().unwrap().execute_batch("BEGIN").unwrap();

        let result = repo.link_categories(&id, &ids).await;
        assert!(matches!(result, Err(RepositoryError::DatabaseTransactionError(_))));
    }

    #[test]
    fn test_open_failure_is_connection_error() {
        let result = SupplierCommitRepositoryImpl::new("/nonexistent-dir/supplier_import/db.sqlite");
        assert!(matches!(result, Err(RepositoryError::DatabaseConnectionError(_))));
    }
}

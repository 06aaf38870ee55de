// ==========================================
// 供应商目录 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod supplier_commit_repo;
pub mod supplier_commit_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use supplier_commit_repo::SupplierCommitRepository;
pub use supplier_commit_repo_impl::SupplierCommitRepositoryImpl;

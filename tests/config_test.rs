// ==========================================
// 配置管理器集成测试
// ==========================================
// 测试目标: config_kv 读写、校验回退、快照
// ==========================================

mod test_helpers;

use supplier_import::config::{config_keys, ConfigManager, ImportConfigReader};
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_reads_values_written_by_other_connection() {
    let (_db_file, db_path) = create_test_db().unwrap();
    {
        let conn = open_test_connection(&db_path).unwrap();
        insert_test_config(
            &conn,
            &[
                (config_keys::LOCALE, "en"),
                (config_keys::MAX_IMPORT_ROWS, " 250 "),
                (config_keys::IMPORTED_BY, "compras"),
            ],
        )
        .unwrap();
    }

    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_locale().await.unwrap(), "en");
    assert_eq!(config.get_max_import_rows().await.unwrap(), 250);
    assert_eq!(config.get_imported_by().await.unwrap(), "compras");
}

#[tokio::test]
async fn test_invalid_values_fall_back_to_defaults() {
    let (_db_file, db_path) = create_test_db().unwrap();
    {
        let conn = open_test_connection(&db_path).unwrap();
        insert_test_config(
            &conn,
            &[
                (config_keys::LOCALE, "fr-FR"),
                (config_keys::MAX_IMPORT_ROWS, "0"),
                (config_keys::IMPORTED_BY, "   "),
            ],
        )
        .unwrap();
    }

    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_locale().await.unwrap(), "pt-BR");
    assert_eq!(config.get_max_import_rows().await.unwrap(), 5_000);
    assert_eq!(config.get_imported_by().await.unwrap(), "import");
}

#[tokio::test]
async fn test_set_value_overwrites_and_persists() {
    let (_db_file, db_path) = create_test_db().unwrap();

    {
        let config = ConfigManager::new(&db_path).unwrap();
        config.set_config_value(config_keys::MAX_IMPORT_ROWS, "10").unwrap();
        config.set_config_value(config_keys::MAX_IMPORT_ROWS, "20").unwrap();
    }

    let reopened = ConfigManager::new(&db_path).unwrap();
    assert_eq!(reopened.get_max_import_rows().await.unwrap(), 20);

    let snapshot: serde_json::Value =
        serde_json::from_str(&reopened.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::MAX_IMPORT_ROWS], "20");
}

//! セッション保存テスト

use sheet_ai_common::{combine, Record, SourceTable};
use sheet_ai_rust::session::{compute_file_hash, Session, StoredResult};
use tempfile::tempdir;

fn create_session(dir: &std::path::Path) -> Session {
    let source = dir.join("book.xlsx");
    std::fs::write(&source, b"dummy workbook bytes").unwrap();

    let sheets = vec![SourceTable::new("S1", vec![Record::new().with("a", 1i64)])];
    let combined = combine(&sheets).unwrap();
    let hash = compute_file_hash(&source).unwrap();
    Session::new(&source, hash, combined)
}

/// セッションファイルが無い場合
#[test]
fn test_session_missing() {
    let dir = tempdir().expect("Failed to create temp dir");
    assert!(Session::load(dir.path()).is_none());
}

/// 保存と読み込み
#[test]
fn test_session_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = create_session(dir.path());
    session.record_result(StoredResult {
        instruction: "合計は？".to_string(),
        result: "1".to_string(),
        full_response: "結果: 1".to_string(),
        analyzed_at: "2025-01-18 09:30:12".to_string(),
    });

    session.save(dir.path()).expect("セッション保存失敗");

    let loaded = Session::load(dir.path()).expect("セッションが読み込めない");
    assert_eq!(loaded.combined, session.combined);
    assert_eq!(loaded.combined.labels, vec!["S1"]);
    assert_eq!(loaded.last_result.unwrap().result, "1");
}

/// 新しい変換で置き換わる（分析結果は引き継がない）
#[test]
fn test_session_replaced_on_new_conversion() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut first = create_session(dir.path());
    first.record_result(StoredResult {
        instruction: "x".into(),
        result: "old".into(),
        full_response: "old".into(),
        analyzed_at: "2025-01-18 09:30:12".into(),
    });
    first.save(dir.path()).unwrap();

    let sheets = vec![SourceTable::new("S2", vec![Record::new().with("b", 2i64)])];
    let second = Session::new(&dir.path().join("other.xlsx"), "hash".into(), combine(&sheets).unwrap());
    second.save(dir.path()).unwrap();

    let loaded = Session::load(dir.path()).unwrap();
    assert_eq!(loaded.combined.labels, vec!["S2"]);
    assert!(loaded.last_result.is_none());
}

/// 変換元ファイルの更新検出
#[test]
fn test_session_staleness() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = create_session(dir.path());
    let source = dir.path().join("book.xlsx");

    assert!(!session.is_stale(&source));

    std::fs::write(&source, b"changed").unwrap();
    assert!(session.is_stale(&source));
    assert!(session.is_stale(&dir.path().join("missing.xlsx")));
}

/// 壊れたセッションファイルは無視
#[test]
fn test_session_corrupt_file_ignored() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(Session::session_path(dir.path()), "{ not json").unwrap();
    assert!(Session::load(dir.path()).is_none());
}

/// 削除
#[test]
fn test_session_clear() {
    let dir = tempdir().expect("Failed to create temp dir");
    create_session(dir.path()).save(dir.path()).unwrap();

    assert!(Session::clear(dir.path()).unwrap());
    assert!(!Session::clear(dir.path()).unwrap());
    assert!(Session::load(dir.path()).is_none());
}

/// ハッシュはSHA-256の16進表現
#[test]
fn test_compute_file_hash() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("abc.txt");
    std::fs::write(&path, b"abc").unwrap();

    assert_eq!(
        compute_file_hash(&path).unwrap(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

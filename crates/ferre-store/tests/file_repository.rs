//! JSON-file repository against a real directory.

use ferre_store::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Draft {
    id: String,
    grand_total: String,
}

fn draft(id: &str) -> Draft {
    Draft {
        id: id.into(),
        grand_total: "25.00".into(),
    }
}

#[test]
fn test_put_get_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let repo = JsonFileRepository::open(dir.path()).unwrap();
    repo.put(&repo_key!("order", "ROF-1"), &draft("ROF-1")).unwrap();
    drop(repo);

    let repo = JsonFileRepository::open(dir.path()).unwrap();
    assert_eq!(repo.get::<Draft>("order:ROF-1").unwrap(), Some(draft("ROF-1")));
    assert!(dir.path().join("order.ROF-1.json").is_file());
}

#[test]
fn test_open_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("state").join("ferre");

    let repo = JsonFileRepository::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert!(repo.keys().unwrap().is_empty());
}

#[test]
fn test_keys_ignore_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::open(dir.path()).unwrap();

    repo.put("cart:default", &Vec::<Draft>::new()).unwrap();
    repo.put("order:ROF-2", &draft("ROF-2")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "hola").unwrap();
    std::fs::write(dir.path().join("cart.default.json.tmp"), "{").unwrap();

    assert_eq!(repo.keys().unwrap(), vec!["cart:default", "order:ROF-2"]);
    assert_eq!(repo.keys_in("order").unwrap(), vec!["order:ROF-2"]);
}

#[test]
fn test_delete_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::open(dir.path()).unwrap();

    assert_eq!(repo.get::<Draft>("order:none").unwrap(), None);
    assert!(!repo.delete("order:none").unwrap());

    repo.put("order:ROF-3", &draft("ROF-3")).unwrap();
    assert!(repo.exists("order:ROF-3").unwrap());
    assert!(repo.delete("order:ROF-3").unwrap());
    assert!(!repo.exists("order:ROF-3").unwrap());
}

#[test]
fn test_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::open(dir.path()).unwrap();

    let result = repo.put("../escape", &draft("x"));
    assert!(matches!(result, Err(StoreError::InvalidKey(_))));
}

#[test]
fn test_versioned_records_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::open(dir.path()).unwrap();
    let orders = Records::<_, Draft>::new(&repo, "order");

    orders.save("ROF-4", draft("ROF-4")).unwrap();
    let updated = orders
        .update("ROF-4", |mut d| {
            d.grand_total = "400.00".into();
            d
        })
        .unwrap();

    assert_eq!(updated.grand_total, "400.00");
    let record = orders.get_versioned("ROF-4").unwrap().unwrap();
    assert_eq!(record.version, 2);
    assert_eq!(orders.ids().unwrap(), vec!["ROF-4"]);
}

#[test]
fn test_failed_rename_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::open(dir.path()).unwrap();

    // A directory squatting on the target path makes the rename fail.
    let target = dir.path().join("order.ROF-2.json");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), b"x").unwrap();

    assert!(repo.put("order:ROF-2", &draft("ROF-2")).is_err());
    assert!(!dir.path().join("order.ROF-2.json.tmp").exists());
    assert!(target.is_dir());
}

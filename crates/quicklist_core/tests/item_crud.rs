use quicklist_core::{Item, ItemRepository, SqliteItemRepository, Store};
use std::thread;

#[test]
fn create_and_get_roundtrip() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let id = repo.create_item("first item").unwrap();

    let loaded = repo.get_item(id).unwrap().unwrap();
    assert_eq!(loaded, Item::new(id, "first item"));
}

#[test]
fn empty_text_is_stored_as_is() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let id = repo.create_item("").unwrap();
    assert_eq!(repo.get_item(id).unwrap().unwrap().text, "");
}

#[test]
fn update_keeps_id_and_replaces_text() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let id = repo.create_item("draft").unwrap();
    assert_eq!(repo.update_item(id, "final").unwrap(), 1);

    assert_eq!(repo.list_items().unwrap(), vec![Item::new(id, "final")]);
}

#[test]
fn update_and_delete_of_missing_id_affect_no_rows() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let id = repo.create_item("only").unwrap();

    assert_eq!(repo.update_item(id + 100, "ghost").unwrap(), 0);
    assert_eq!(repo.delete_item(id + 100).unwrap(), 0);
    assert_eq!(repo.list_items().unwrap(), vec![Item::new(id, "only")]);
}

#[test]
fn delete_removes_row_without_tombstone() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let id = repo.create_item("gone soon").unwrap();
    assert_eq!(repo.delete_item(id).unwrap(), 1);

    assert!(repo.get_item(id).unwrap().is_none());
    let remaining: Vec<i64> = store
        .query("SELECT COUNT(*) FROM items;", [], |row| Ok(row.get(0)?))
        .unwrap();
    assert_eq!(remaining, vec![0]);
}

#[test]
fn ids_are_monotonic_and_never_reused_after_delete() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let first = repo.create_item("a").unwrap();
    let second = repo.create_item("b").unwrap();
    assert!(second > first);

    repo.delete_item(second).unwrap();
    let third = repo.create_item("c").unwrap();
    assert!(third > second, "id {second} must not be reused, got {third}");

    repo.delete_item(first).unwrap();
    repo.delete_item(third).unwrap();
    let fourth = repo.create_item("d").unwrap();
    assert!(fourth > third);
}

#[test]
fn ids_stay_monotonic_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicklist.db");

    let last = {
        let store = Store::open(&path).unwrap();
        let repo = SqliteItemRepository::new(&store);
        let id = repo.create_item("before restart").unwrap();
        repo.delete_item(id).unwrap();
        id
    };

    let store = Store::open(&path).unwrap();
    let repo = SqliteItemRepository::new(&store);
    assert!(repo.create_item("after restart").unwrap() > last);
}

#[test]
fn list_returns_rows_in_insertion_order() {
    let store = Store::open_in_memory().unwrap();
    let repo = SqliteItemRepository::new(&store);

    let ids: Vec<_> = ["one", "two", "three"]
        .into_iter()
        .map(|text| repo.create_item(text).unwrap())
        .collect();

    let listed: Vec<_> = repo.list_items().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(listed, ids);
}

#[test]
fn null_text_rows_read_back_as_empty_text() {
    let store = Store::open_in_memory().unwrap();
    store
        .execute("INSERT INTO items (text) VALUES (NULL);", [])
        .unwrap();
    let repo = SqliteItemRepository::new(&store);
    let id = repo.create_item("after null").unwrap();

    assert_eq!(
        repo.list_items().unwrap(),
        vec![Item::new(1, ""), Item::new(id, "after null")]
    );
    assert_eq!(repo.get_item(1).unwrap(), Some(Item::new(1, "")));
}

#[test]
fn concurrent_creates_on_one_store_get_unique_increasing_ids() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 25;

    let store = Store::open_in_memory().unwrap();

    let mut ids: Vec<i64> = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|worker| {
                let store = &store;
                scope.spawn(move || {
                    let repo = SqliteItemRepository::new(store);
                    let created: Vec<i64> = (0..PER_THREAD)
                        .map(|n| repo.create_item(&format!("w{worker}-{n}")).unwrap())
                        .collect();
                    assert!(created.windows(2).all(|pair| pair[0] < pair[1]));
                    created
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    ids.sort_unstable();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "ids must be unique");
    assert_eq!(ids.len(), THREADS * PER_THREAD);

    let repo = SqliteItemRepository::new(&store);
    let listed: Vec<i64> = repo.list_items().unwrap().into_iter().map(|i| i.id).collect();
    assert_eq!(listed, ids);
}

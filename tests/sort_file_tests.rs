use std::path::Path;
use tempfile::tempdir;

use sortfile::page_store::PageStore;
use sortfile::sorted_file::constants::BLOCK_CAPACITY;
use sortfile::{Record, SortConfig, SortField, SortFileError, SortedFile, Sorter};

fn build_file(store: &PageStore, path: &Path, records: &[Record]) {
    SortedFile::create(store, path).unwrap();
    let mut file = SortedFile::open(store, path).unwrap();
    for record in records {
        file.insert(record).unwrap();
    }
    file.close().unwrap();
}

fn read_all(store: &PageStore, path: &Path) -> Vec<Record> {
    let mut file = SortedFile::open(store, path).unwrap();
    let mut records = Vec::new();
    file.scan(|r| records.push(r.clone())).unwrap();
    file.close().unwrap();
    records
}

#[test]
fn sorts_multi_block_file_end_to_end() {
    let dir = tempdir().unwrap();
    let store = PageStore::new();
    let input = dir.path().join("people.db");
    let output = dir.path().join("people.sorted.db");

    let cities = ["athens", "larissa", "patras", "volos"];
    let records: Vec<Record> = (0..5 * BLOCK_CAPACITY as i32)
        .map(|i| {
            let id = (i * 37) % 101;
            Record::new(
                id,
                &format!("name{:02}", id % 50),
                &format!("surname{:02}", (id * 3) % 50),
                cities[id as usize % cities.len()],
            )
            .unwrap()
        })
        .collect();
    build_file(&store, &input, &records);

    let config = SortConfig {
        buffer_size: 3,
        verbose: false,
    };
    let sorter = Sorter::new(&store, config, SortField::Surname).unwrap();
    let stats = sorter.sort(&input, &output).unwrap();

    assert_eq!(stats.data_blocks, 5);
    assert_eq!(stats.records, records.len());

    let sorted = read_all(&store, &output);
    assert_eq!(sorted.len(), records.len());
    for pair in sorted.windows(2) {
        assert_ne!(
            SortField::Surname.compare(&pair[0], &pair[1]),
            std::cmp::Ordering::Greater
        );
    }

    let mut expected: Vec<String> = records.iter().map(|r| r.surname.clone()).collect();
    let mut actual: Vec<String> = sorted.iter().map(|r| r.surname.clone()).collect();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

#[test]
fn rejects_file_without_identifier() {
    let dir = tempdir().unwrap();
    let store = PageStore::new();
    let path = dir.path().join("junk.db");

    store.create(&path).unwrap();
    let mut handle = store.open(&path).unwrap();
    let block = handle.allocate_block().unwrap();
    handle.release(block).unwrap();
    store.close(handle).unwrap();

    assert!(matches!(
        SortedFile::open(&store, &path),
        Err(SortFileError::NotSortedFile { .. })
    ));
    // The failed open left the file closed; a plain reopen still works.
    let handle = store.open(&path).unwrap();
    store.close(handle).unwrap();
}

#[test]
fn sorted_output_is_itself_a_valid_sorted_file() {
    let dir = tempdir().unwrap();
    let store = PageStore::new();
    let input = dir.path().join("in.db");
    let output = dir.path().join("out.db");

    build_file(
        &store,
        &input,
        &[
            Record::new(9, "i", "i", "i").unwrap(),
            Record::new(1, "a", "a", "a").unwrap(),
        ],
    );
    let config = SortConfig {
        buffer_size: 4,
        verbose: false,
    };
    Sorter::new(&store, config, SortField::Id)
        .unwrap()
        .sort(&input, &output)
        .unwrap();

    // Output opens, validates and accepts further inserts.
    let mut sorted = SortedFile::open(&store, &output).unwrap();
    sorted.insert(&Record::new(3, "c", "c", "c").unwrap()).unwrap();
    let mut out = Vec::new();
    sorted.print(&mut out).unwrap();
    sorted.close().unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.lines().count() >= 5); // header, rule, three records
}

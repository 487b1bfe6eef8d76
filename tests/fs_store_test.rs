use pulldown_cmark::{Event, Parser, Tag};
use sovq::api::SovqApi;
use sovq::error::ErrorKind;
use sovq::model::{ReportStatus, SyncStatus};
use sovq::store::fs_backend::FsBackend;
use sovq::store::{DataStore, RecordStore};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn api(temp: &TempDir) -> SovqApi<RecordStore<FsBackend>> {
    SovqApi::new(RecordStore::with_backend(FsBackend::new(temp.path().join("data"))))
}

#[test]
fn test_state_survives_a_new_store() {
    let temp = TempDir::new().unwrap();
    let id = {
        let api = api(&temp);
        let id = api
            .create_report("Germany", "sovereign", Some("Bund".into()))
            .unwrap()
            .affected_reports[0]
            .id
            .clone();
        api.update_report(&id, None, Some("in-progress"), None)
            .unwrap();
        api.track_upload("a.md", "a.md", 3).unwrap();
        id
    };

    let api = api(&temp);
    let report = api.get_report(&id).unwrap().listed_reports.remove(0);
    assert_eq!(report.status, ReportStatus::InProgress);
    assert_eq!(report.description.as_deref(), Some("Bund"));
    assert_eq!(
        api.list_pending().unwrap().uploads[0].sync_status,
        SyncStatus::PendingSync
    );
}

#[test]
fn test_persisted_layout_is_camel_case_and_kebab_case() {
    let temp = TempDir::new().unwrap();
    let api = api(&temp);
    api.create_report("Bavaria", "quasi-sovereign", None).unwrap();
    api.track_upload("b.md", "b.md", 1).unwrap();

    let reports: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("data/reports.json")).unwrap())
            .unwrap();
    let report = &reports["reports"][0];
    assert_eq!(report["type"], "quasi-sovereign");
    assert_eq!(report["status"], "raw-uploaded");
    assert!(report.get("createdAt").is_some());
    assert!(report.get("description").is_none());

    let uploads: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("data/uploads.json")).unwrap())
            .unwrap();
    assert_eq!(uploads["uploads"][0]["syncStatus"], "pending-sync");
    assert_eq!(uploads["uploads"][0]["originalName"], "b.md");
}

#[test]
fn test_view_file_has_one_row_per_report() {
    let temp = TempDir::new().unwrap();
    let api = api(&temp);
    for name in ["Germany", "France"] {
        api.create_report(name, "sovereign", None).unwrap();
    }
    api.create_report("Bavaria", "quasi-sovereign", None).unwrap();

    let view = fs::read_to_string(temp.path().join("data/reports.md")).unwrap();
    let mut in_head = false;
    let mut tables = 0;
    let mut body_rows = 0;
    for event in Parser::new_ext(&view, pulldown_cmark::Options::ENABLE_TABLES) {
        match event {
            Event::Start(Tag::Table(_)) => tables += 1,
            Event::Start(Tag::TableHead) => in_head = true,
            Event::End(pulldown_cmark::TagEnd::TableHead) => in_head = false,
            Event::Start(Tag::TableRow) if !in_head => body_rows += 1,
            _ => {}
        }
    }
    assert_eq!(tables, 2);
    assert_eq!(body_rows, 3);
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let temp = TempDir::new().unwrap();
    let api = Arc::new(api(&temp));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                for i in 0..10 {
                    api.create_report(&format!("R{}-{}", t, i), "sovereign", None)
                        .unwrap();
                    api.track_upload(&format!("f{}-{}.md", t, i), "f.md", 1)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(api.list_reports(None, None).unwrap().listed_reports.len(), 80);
    assert_eq!(api.sync_summary().unwrap().pending_sync, 80);

    let leftovers: Vec<_> = fs::read_dir(temp.path().join("data"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_malformed_document_is_left_untouched() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("uploads.json"), "[broken").unwrap();

    let api = api(&temp);
    let err = api.track_upload("a.md", "a.md", 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(
        fs::read_to_string(data.join("uploads.json")).unwrap(),
        "[broken"
    );
    // Reports are a separate document and still work.
    assert!(api.create_report("Alpha", "sovereign", None).is_ok());
}

#[test]
fn test_blobs_live_under_uploads_dir() {
    let temp = TempDir::new().unwrap();
    let api = api(&temp);
    let receipt = api.upload(b"bytes", "doc.md", None).unwrap();

    let path = temp.path().join("data/uploads").join(&receipt.stored_filename);
    assert_eq!(fs::read(path).unwrap(), b"bytes");
    assert_eq!(
        api.store().list_blobs().unwrap(),
        vec![receipt.stored_filename.clone()]
    );
}

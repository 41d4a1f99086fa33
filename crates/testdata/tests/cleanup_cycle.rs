use async_trait::async_trait;
use fixturekit_common::config::DataConfig;
use fixturekit_common::{CleanupStrategy, SymmetricCipher};
use fixturekit_testdata::cleanup::Registry;
use fixturekit_testdata::{
    CleanupBackend, DataError, DataResult, DataStore, FileStore, HookError, ProductOptions,
    TestDataManager, UserOptions,
};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn manager(dir: &TempDir) -> TestDataManager {
    let config = DataConfig {
        data_dir: dir.path().to_path_buf(),
        ..DataConfig::default()
    };
    TestDataManager::new(SymmetricCipher::new("cleanup-cycle-key"), &config)
}

struct FailingBackend;

#[async_trait]
impl CleanupBackend for FailingBackend {
    fn name(&self) -> &str {
        "database"
    }

    async fn cleanup(&self, _registry: &Registry) -> DataResult<()> {
        Err(DataError::Cleanup {
            backend: "database".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

struct CountingBackend {
    seen: Arc<AtomicUsize>,
}

#[async_trait]
impl CleanupBackend for CountingBackend {
    fn name(&self) -> &str {
        "api"
    }

    async fn cleanup(&self, registry: &Registry) -> DataResult<()> {
        let total: usize = registry.values().map(Vec::len).sum();
        self.seen.fetch_add(total, Ordering::SeqCst);
        Ok(())
    }
}

/// One throwing and one succeeding hook both run exactly once, and the
/// registry is empty afterwards.
#[tokio::test]
async fn hooks_run_once_despite_failure() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp);
    mgr.generate_users(2, &UserOptions::default()).unwrap();

    let failing_calls = Arc::new(AtomicUsize::new(0));
    let ok_calls = Arc::new(AtomicUsize::new(0));

    let counter = failing_calls.clone();
    mgr.register_cleanup_hook(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), HookError>("hook exploded".into())
        }
    });
    let counter = ok_calls.clone();
    mgr.register_cleanup_hook(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), HookError>(())
        }
    });

    let report = mgr.cleanup(CleanupStrategy::Auto).await;

    assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ok_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.hook_count, 2);
    assert_eq!(report.hook_failures, 1);
    assert_eq!(mgr.get_data_statistics().total_generated, 0);
}

#[tokio::test]
async fn panicking_hook_does_not_stop_cycle() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp);
    mgr.generate_user(&UserOptions::default()).unwrap();

    mgr.register_cleanup_hook(|| async {
        let seeded: Option<u32> = None;
        let _row = seeded.expect("seed row missing");
        Ok::<(), HookError>(())
    });
    let later_calls = Arc::new(AtomicUsize::new(0));
    let counter = later_calls.clone();
    mgr.register_cleanup_hook(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), HookError>(())
        }
    });

    let report = mgr.cleanup(CleanupStrategy::Auto).await;

    assert_eq!(later_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.hook_count, 2);
    assert_eq!(report.hook_failures, 1);
    assert_eq!(report.entities_cleared, 1);
    assert_eq!(mgr.get_data_statistics().total_generated, 0);
}

#[tokio::test]
async fn hooks_run_in_registration_order() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp);
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..4 {
        let order = order.clone();
        mgr.register_cleanup_hook(move || {
            let order = order.clone();
            async move {
                order.lock().unwrap().push(i);
                Ok::<(), HookError>(())
            }
        });
    }

    mgr.cleanup(CleanupStrategy::File).await;
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[tokio::test]
async fn failing_backend_does_not_stop_cycle() {
    let tmp = TempDir::new().unwrap();
    let seen = Arc::new(AtomicUsize::new(0));
    let mut mgr = manager(&tmp)
        .with_database_backend(Box::new(FailingBackend))
        .with_api_backend(Box::new(CountingBackend { seen: seen.clone() }));

    mgr.generate_products(3, &ProductOptions::default()).unwrap();
    let hook_ran = Arc::new(AtomicUsize::new(0));
    let counter = hook_ran.clone();
    mgr.register_cleanup_hook(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<(), HookError>(())
        }
    });

    let report = mgr.cleanup(CleanupStrategy::All).await;

    assert_eq!(report.backend_failures, vec!["database"]);
    assert!(!report.is_clean());
    assert_eq!(seen.load(Ordering::SeqCst), 3);
    assert_eq!(hook_ran.load(Ordering::SeqCst), 1);
    assert_eq!(report.entities_cleared, 3);
    assert_eq!(mgr.get_data_statistics().total_generated, 0);
}

#[tokio::test]
async fn file_cleanup_removes_persisted_fixtures() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp);

    let path = mgr
        .save_test_data("users", "login", &json!({"username": "qa", "password": "pw"}))
        .await
        .unwrap();
    let on_disk = tmp.path().join(&path);
    assert!(on_disk.exists());

    // api-only cleanup leaves files alone
    mgr.cleanup(CleanupStrategy::Api).await;
    assert!(on_disk.exists());

    let report = mgr.cleanup(CleanupStrategy::File).await;
    assert_eq!(report.backends, vec!["file"]);
    assert!(!on_disk.exists());
    assert!(mgr.persisted_paths().is_empty());
}

#[tokio::test]
async fn cleanup_twice_is_safe() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp);
    mgr.generate_user(&UserOptions::default()).unwrap();

    let first = mgr.cleanup(CleanupStrategy::Auto).await;
    let second = mgr.cleanup(CleanupStrategy::Auto).await;
    assert_eq!(first.entities_cleared, 1);
    assert_eq!(second.entities_cleared, 0);
    assert!(second.is_clean());
}

/// File store whose first `remove` fails
struct FlakyStore {
    inner: FileStore,
    failed_once: AtomicBool,
}

#[async_trait]
impl DataStore for FlakyStore {
    async fn write(&self, path: &Path, value: &serde_json::Value) -> DataResult<()> {
        self.inner.write(path, value).await
    }

    async fn read(&self, path: &Path) -> DataResult<serde_json::Value> {
        self.inner.read(path).await
    }

    async fn remove(&self, path: &Path) -> DataResult<()> {
        if !self.failed_once.swap(true, Ordering::SeqCst) {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only mount",
            )));
        }
        self.inner.remove(path).await
    }
}

#[tokio::test]
async fn failed_fixture_removal_is_retried() {
    let tmp = TempDir::new().unwrap();
    let store = FlakyStore {
        inner: FileStore::new(tmp.path()),
        failed_once: AtomicBool::new(false),
    };
    let mut mgr = manager(&tmp).with_store(Arc::new(store));

    let path = mgr
        .save_test_data("users", "retry", &json!({"password": "pw"}))
        .await
        .unwrap();
    let on_disk = tmp.path().join(&path);

    let first = mgr.cleanup(CleanupStrategy::File).await;
    assert_eq!(first.backend_failures, vec!["file"]);
    assert!(on_disk.exists());
    assert_eq!(mgr.persisted_paths().to_vec(), vec![path.clone()]);

    let second = mgr.cleanup(CleanupStrategy::File).await;
    assert!(second.is_clean());
    assert!(!on_disk.exists());
    assert!(mgr.persisted_paths().is_empty());
}

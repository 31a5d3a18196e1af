use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use multimcp::api::fake::FakeApi;
use multimcp::chat::{ChatController, ChatSettings, ProgressSettings, RecordingNotifier};
use multimcp::storage::{MemoryStore, SledStore};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_store() -> (SledStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let store = SledStore::open(tmp.path().join("history")).expect("failed to open sled store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Controller wired to in-process fakes
#[allow(dead_code)]
pub struct ChatHarness {
    pub api: Arc<FakeApi>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub controller: ChatController,
}

#[allow(dead_code)]
impl ChatHarness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Open a controller over an existing store, as a restart would
    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        let api = Arc::new(FakeApi::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let settings = ChatSettings {
            progress: ProgressSettings {
                steps: vec![
                    "Analyzing your query...".to_string(),
                    "Executing your request...".to_string(),
                ],
                interval: Duration::from_millis(20),
            },
            ..ChatSettings::default()
        };
        let controller =
            ChatController::open(api.clone(), store.clone(), notifier.clone(), settings);
        Self {
            api,
            store,
            notifier,
            controller,
        }
    }
}

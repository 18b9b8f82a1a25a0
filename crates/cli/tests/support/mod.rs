use exfix_core::exiftool::{MetadataTool, ToolError, WriteMode};
use exfix_core::models::TagSet;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub file: String,
    pub target: String,
    pub source: String,
    pub mode: WriteMode,
}

/// In-memory stand-in for exiftool, keyed by file name.
#[derive(Default)]
pub struct FakeTool {
    tags: Mutex<HashMap<String, TagSet>>,
    fail_read: Vec<String>,
    fail_write: Vec<String>,
    panic_on: Vec<String>,
    delay: Option<Duration>,
    writes: Mutex<Vec<WriteCall>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[allow(dead_code)]
impl FakeTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(self, file: &str, pairs: &[(&str, &str)]) -> Self {
        let set: TagSet = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .chain(std::iter::once(("SourceFile".to_string(), json!(file))))
            .collect();
        self.tags.lock().unwrap().insert(file.to_string(), set);
        self
    }

    pub fn failing_read(mut self, file: &str) -> Self {
        self.fail_read.push(file.to_string());
        self
    }

    pub fn failing_write(mut self, file: &str) -> Self {
        self.fail_write.push(file.to_string());
        self
    }

    pub fn panicking(mut self, file: &str) -> Self {
        self.panic_on.push(file.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        let mut writes = self.writes.lock().unwrap().clone();
        writes.sort_by(|a, b| a.file.cmp(&b.file));
        writes
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[async_trait::async_trait]
impl MetadataTool for FakeTool {
    async fn read_tags(&self, path: &Path) -> Result<TagSet, ToolError> {
        let name = name_of(path);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.contains(&name) {
            panic!("metadata tool crashed on {name}");
        }
        if self.fail_read.contains(&name) {
            return Err(ToolError::Failed {
                status: "exit status: 1".into(),
                stderr: "File format error".into(),
            });
        }
        self.tags
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .ok_or(ToolError::NoRecord)
    }

    async fn write_tag(
        &self,
        path: &Path,
        target: &str,
        source: &str,
        mode: WriteMode,
    ) -> Result<(), ToolError> {
        let name = name_of(path);
        if self.fail_write.contains(&name) {
            return Err(ToolError::Failed {
                status: "exit status: 1".into(),
                stderr: "Error: Not a valid JPEG".into(),
            });
        }
        let mut tags = self.tags.lock().unwrap();
        if let Some(set) = tags.get_mut(&name) {
            if let Some(value) = set.get(source).cloned() {
                set.insert(target.to_string(), value);
            }
        }
        self.writes.lock().unwrap().push(WriteCall {
            file: name,
            target: target.to_string(),
            source: source.to_string(),
            mode,
        });
        Ok(())
    }
}

/// Creates empty placeholder files so the scanner has something to find.
pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"not really media").unwrap();
    }
}

use std::io;
use std::path::PathBuf;

/// Boundary where the finished document leaves the pipeline — the
/// "save as" dialog in the browser build, a plain directory here.
/// 完成文件離開匯出管線的儲存介面。
pub trait DownloadSink {
    type Error;

    fn save(&self, file_name: &str, data: &[u8]) -> Result<(), Self::Error>;
}

/// Sink that writes finished documents into a downloads directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}

impl DownloadSink for DirectorySink {
    type Error = io::Error;

    fn save(&self, file_name: &str, data: &[u8]) -> Result<(), Self::Error> {
        std::fs::write(self.path_for(file_name), data)
    }
}

/// In-memory sink recording every save, used by controller tests.
#[cfg(test)]
pub(crate) mod mock {
    use super::DownloadSink;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct RecordedSave {
        pub file_name: String,
        pub data: Vec<u8>,
    }

    #[derive(Clone, Default)]
    pub struct RecordingSink {
        saves: Arc<Mutex<Vec<RecordedSave>>>,
    }

    impl RecordingSink {
        pub fn drain_saves(&self) -> Vec<RecordedSave> {
            self.saves.lock().expect("lock poisoned").drain(..).collect()
        }
    }

    impl DownloadSink for RecordingSink {
        type Error = String;

        fn save(&self, file_name: &str, data: &[u8]) -> Result<(), Self::Error> {
            self.saves.lock().expect("lock poisoned").push(RecordedSave {
                file_name: file_name.to_string(),
                data: data.to_vec(),
            });
            Ok(())
        }
    }

    /// Sink that always refuses, for the error path.
    pub struct RejectingSink;

    impl DownloadSink for RejectingSink {
        type Error = String;

        fn save(&self, _file_name: &str, _data: &[u8]) -> Result<(), Self::Error> {
            Err("disk full".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sink_writes_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        sink.save("Contrato_Teste_2025-01-01.pdf", b"%PDF-1.4 test")
            .unwrap();

        let written = std::fs::read(dir.path().join("Contrato_Teste_2025-01-01.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.4 test");
    }

    #[test]
    fn missing_directory_surfaces_io_error() {
        let sink = DirectorySink::new("/nonexistent/clientdesk/downloads");
        assert!(sink.save("contract.pdf", b"data").is_err());
    }
}

//! FileSink - newline-delimited records in a local file

use std::collections::HashMap;
use std::path::PathBuf;

use contracts::{ContractError, EncodedRecord, RecordSink, SinkKind};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, error, instrument};

/// Default output path
pub const DEFAULT_FILE_PATH: &str = "./data/data.txt";

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output file path
    pub path: PathBuf,
    /// Append to an existing file instead of truncating it
    pub append: bool,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_PATH),
            append: false,
        }
    }
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_PATH));

        let append = params
            .get("append")
            .is_some_and(|v| matches!(v.trim(), "true" | "1" | "yes"));

        Self { path, append }
    }
}

/// Sink that writes records to one file, one per line
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    out: BufWriter<File>,
}

impl FileSink {
    /// Open the output file, creating its parent directory
    #[instrument(name = "file_sink_open", skip(name, config), fields(path = %config.path.display()))]
    pub async fn open(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if config.append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&config.path).await?;

        let name = name.into();
        debug!(sink = %name, append = config.append, "FileSink opened");

        Ok(Self {
            name,
            config,
            out: BufWriter::new(file),
        })
    }

    /// Create from params map (for factory)
    pub async fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        Self::open(name, FileSinkConfig::from_params(params)).await
    }

    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }

    fn write_error(&self, e: std::io::Error) -> ContractError {
        error!(sink = %self.name, path = %self.config.path.display(), error = %e, "File write failed");
        ContractError::sink_write(&self.name, e.to_string())
    }
}

impl RecordSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    async fn write(&mut self, record: &EncodedRecord) -> Result<usize, ContractError> {
        self.out
            .write_all(record.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        self.out.write_all(b"\n").await.map_err(|e| self.write_error(e))?;
        Ok(record.len())
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.out.flush().await.map_err(|e| self.write_error(e))
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.flush().await?;
        self.out
            .get_ref()
            .sync_all()
            .await
            .map_err(|e| self.write_error(e))?;
        debug!(sink = %self.name, "FileSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(path: PathBuf, append: bool) -> FileSinkConfig {
        FileSinkConfig { path, append }
    }

    #[tokio::test]
    async fn test_file_sink_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/data.txt");

        let mut sink = FileSink::open("test_file", config(path.clone(), false))
            .await
            .unwrap();
        for i in 0..3 {
            let payload = serde_json::to_vec(&serde_json::json!({ "i": i })).unwrap();
            sink.write(&EncodedRecord::new(i, payload)).await.unwrap();
        }
        sink.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec![r#"{"i":0}"#, r#"{"i":1}"#, r#"{"i":2}"#]);
    }

    #[tokio::test]
    async fn test_file_sink_truncates_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "old line\nold line\n").unwrap();

        let mut sink = FileSink::open("f", config(path.clone(), false)).await.unwrap();
        sink.write(&EncodedRecord::new(0, "{}")).await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[tokio::test]
    async fn test_file_sink_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "{}\n").unwrap();

        let mut params = HashMap::new();
        params.insert("path".to_string(), path.to_string_lossy().into_owned());
        params.insert("append".to_string(), "true".to_string());

        let mut sink = FileSink::from_params("f", &params).await.unwrap();
        sink.write(&EncodedRecord::new(0, "{}")).await.unwrap();
        sink.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = FileSinkConfig::from_params(&HashMap::new());
        assert_eq!(config.path, PathBuf::from(DEFAULT_FILE_PATH));
        assert!(!config.append);
    }
}

//! ConsoleSink - newline-delimited records on stdout

use contracts::{ContractError, EncodedRecord, RecordSink, SinkKind};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter, Stdout};
use tracing::{debug, instrument};

/// Sink that prints one record per line
pub struct ConsoleSink<W = Stdout> {
    name: String,
    out: BufWriter<W>,
}

impl ConsoleSink<Stdout> {
    /// Create a ConsoleSink on process stdout
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_writer(name, tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleSink<W> {
    pub fn with_writer(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            out: BufWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_error(&self, e: std::io::Error) -> ContractError {
        ContractError::sink_write(&self.name, e.to_string())
    }
}

impl<W: AsyncWrite + Unpin + Send> RecordSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    async fn write(&mut self, record: &EncodedRecord) -> Result<usize, ContractError> {
        self.out
            .write_all(record.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        self.out.write_all(b"\n").await.map_err(|e| self.write_error(e))?;
        Ok(record.len())
    }

    #[instrument(name = "console_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.out.flush().await.map_err(|e| self.write_error(e))
    }

    #[instrument(name = "console_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.flush().await?;
        debug!(sink = %self.name, "ConsoleSink closed");
        Ok(())
    }
}

//! Byte stream plumbing shared by the extraction and transcoding collaborators.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use futures::stream::BoxStream;
use tokio::process::{Child, ChildStdout};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::observability::Metrics;

/// A live byte stream flowing toward an HTTP response body.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// Streams a child process's stdout while keeping ownership of the child.
///
/// The child must be spawned with `kill_on_drop(true)`; dropping the stream
/// (client disconnect) then reaps the process instead of leaving it running.
/// A non-zero exit observed at end of stream is logged, never raised - by the
/// time it happens response headers are already on the wire.
pub struct ProcessStream {
    tool: &'static str,
    child: Child,
    inner: ReaderStream<ChildStdout>,
    metrics: Option<Arc<Metrics>>,
    finished: bool,
}

impl ProcessStream {
    pub fn new(tool: &'static str, mut child: Child) -> io::Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout not captured"))?;

        Ok(Self {
            tool,
            child,
            inner: ReaderStream::new(stdout),
            metrics: None,
            finished: false,
        })
    }

    /// Records a failed exit on the given metrics handle.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn observe_exit(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) if status.success() => {
                debug!(tool = self.tool, "child process finished");
            }
            Ok(Some(status)) => {
                warn!(tool = self.tool, %status, "child process exited with failure");
                if let Some(metrics) = &self.metrics {
                    metrics.transcode_failed();
                }
            }
            Ok(None) => {
                debug!(tool = self.tool, "child process still running at end of stream");
            }
            Err(err) => {
                warn!(tool = self.tool, error = %err, "failed to reap child process");
            }
        }
    }
}

impl Stream for ProcessStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    this.observe_exit();
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

//! 批处理后台工作线程
//!
//! 提交批处理后立即返回句柄，处理在独立线程上按输入顺序串行进行；
//! 逐文件事件和进度通过crossbeam通道送达调用方，`wait()` 取回有序结果。
//! 不支持取消：批处理一旦开始即运行到结束。

use super::exporter::{BatchExporter, ExportObserver};
use super::outcome::{BatchProgress, ExportOutcome};
use super::request::ExportRequest;
use crate::error::{ExportError, ExportResult};
use crate::tools::constants::report::WORKER_THREAD_NAME;
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// 工作线程推送给调用方的事件
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// 开始处理某个文件
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// 某个文件处理结束
    FileFinished {
        index: usize,
        path: PathBuf,
        outcome: ExportOutcome,
    },
    /// 进度推进
    Progress(BatchProgress),
}

/// 将观察者回调转发到通道的观察者
///
/// 接收端被丢弃时发送失败会被忽略：调用方不再关心事件，但批处理继续执行。
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<BatchEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<BatchEvent>) -> Self {
        Self { sender }
    }
}

impl ExportObserver for ChannelObserver {
    fn on_file_started(&mut self, index: usize, total: usize, path: &Path) {
        let _ = self.sender.send(BatchEvent::FileStarted {
            index,
            total,
            path: path.to_path_buf(),
        });
    }

    fn on_file_finished(&mut self, index: usize, path: &Path, outcome: &ExportOutcome) {
        let _ = self.sender.send(BatchEvent::FileFinished {
            index,
            path: path.to_path_buf(),
            outcome: outcome.clone(),
        });
    }

    fn on_progress(&mut self, progress: BatchProgress) {
        let _ = self.sender.send(BatchEvent::Progress(progress));
    }
}

/// 批处理工作器：每次提交启动一个专用线程
#[derive(Clone)]
pub struct BatchWorker {
    exporter: Arc<BatchExporter>,
}

impl BatchWorker {
    pub fn new(exporter: BatchExporter) -> Self {
        Self {
            exporter: Arc::new(exporter),
        }
    }

    /// 提交批处理
    ///
    /// 请求在调用线程上校验，非法时立即返回错误且不启动线程；
    /// 否则启动工作线程并返回句柄，不等待处理完成。
    pub fn submit(&self, request: ExportRequest) -> ExportResult<BatchHandle> {
        request.validate()?;

        let total = request.input_paths.len();
        let (sender, receiver) = crossbeam_channel::unbounded();
        let exporter = Arc::clone(&self.exporter);

        let join = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut observer = ChannelObserver::new(sender);
                exporter.export(&request, &mut observer)
            })?;

        Ok(BatchHandle {
            events: receiver,
            join,
            total,
        })
    }
}

/// 已提交批处理的句柄
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    join: JoinHandle<ExportResult<Vec<ExportOutcome>>>,
    total: usize,
}

impl BatchHandle {
    /// 事件接收端；工作线程结束后通道关闭，迭代自然终止
    pub fn events(&self) -> &Receiver<BatchEvent> {
        &self.events
    }

    /// 本批次的文件总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 等待批处理结束，返回按输入顺序排列的结果
    pub fn wait(self) -> ExportResult<Vec<ExportOutcome>> {
        self.join.join().map_err(|_| {
            ExportError::IoFailure(std::io::Error::other("工作线程异常退出 / worker thread panicked"))
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioDecoder, DecodedAudio, FormatSupport};
    use crate::render::{WaveformPlot, WaveformViewer};

    struct ToneDecoder;

    impl AudioDecoder for ToneDecoder {
        fn name(&self) -> &'static str {
            "Tone Decoder"
        }

        fn supported_formats(&self) -> &FormatSupport {
            static SUPPORT: FormatSupport = FormatSupport {
                extensions: &["wav"],
            };
            &SUPPORT
        }

        fn decode(&self, path: &Path) -> ExportResult<DecodedAudio> {
            if path.to_string_lossy().contains("missing") {
                return Err(ExportError::DecodeFailure("no such file".into()));
            }
            Ok(DecodedAudio::new(vec![0.1, -0.1, 0.2, -0.2], 4, 1))
        }
    }

    struct SilentViewer;

    impl WaveformViewer for SilentViewer {
        fn present(&self, _plot: &WaveformPlot, _title: &str) -> ExportResult<()> {
            Ok(())
        }
    }

    fn worker() -> BatchWorker {
        BatchWorker::new(
            BatchExporter::new()
                .with_decoder(Box::new(ToneDecoder))
                .with_viewer(Box::new(SilentViewer)),
        )
    }

    #[test]
    fn test_invalid_request_rejected_before_spawn() {
        let result = worker().submit(ExportRequest::new(Vec::new()));
        assert!(matches!(result, Err(ExportError::InvalidParameter(_))));
    }

    #[test]
    fn test_events_arrive_in_input_order() {
        let request = ExportRequest::new(vec![
            "one.wav".into(),
            "missing.wav".into(),
            "three.wav".into(),
        ]);
        let handle = worker().submit(request).unwrap();
        assert_eq!(handle.total(), 3);

        let events: Vec<BatchEvent> = handle.events().iter().collect();
        let outcomes = handle.wait().unwrap();

        let finished: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::FileFinished { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(finished, vec![0, 1, 2]);

        let progress: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some(p.fraction()),
                _ => None,
            })
            .collect();
        assert_eq!(progress.len(), 3);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last().copied(), Some(1.0));

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());
    }

    #[test]
    fn test_dropped_receiver_does_not_stop_batch() {
        let request = ExportRequest::new(vec!["a.wav".into(), "b.wav".into()]);
        let handle = worker().submit(request).unwrap();

        let BatchHandle { events, join, .. } = handle;
        drop(events);
        let outcomes = join.join().unwrap().unwrap();
        assert_eq!(outcomes, vec![ExportOutcome::Displayed, ExportOutcome::Displayed]);
    }
}

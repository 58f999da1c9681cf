//! 后台工作线程集成测试

mod audio_test_fixtures;

use audio_test_fixtures::AudioTestFixtures;
use macinmeter_waveform_tool::processing::{
    BatchEvent, BatchExporter, BatchSummary, BatchWorker, ExportOutcome, ExportRequest,
};

#[test]
fn test_worker_streams_events_and_returns_ordered_outcomes() {
    let fixtures = AudioTestFixtures::new();
    let inputs = vec![
        fixtures.create_sine("a.wav", 1, 8000, 0.3, 0.5),
        fixtures.create_fake_audio("b.mp3"),
        fixtures.create_sine("c.wav", 2, 16000, 0.3, 0.5),
    ];
    let out = tempfile::tempdir().unwrap();

    let worker = BatchWorker::new(BatchExporter::new());
    let request = ExportRequest::new(inputs.clone())
        .with_output_dir(out.path())
        .with_dpi(100)
        .with_gain_db(-3.0);
    let handle = worker.submit(request).unwrap();
    assert_eq!(handle.total(), 3);

    let events: Vec<BatchEvent> = handle.events().iter().collect();
    let outcomes = handle.wait().unwrap();

    let started: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::FileStarted { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(started, inputs);

    let progress: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress(p) => Some(p.completed),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![1, 2, 3]);

    assert_eq!(
        outcomes[0],
        ExportOutcome::Saved {
            path: out.path().join("a_waveform.jpg")
        }
    );
    assert!(!outcomes[1].is_success());
    assert_eq!(
        outcomes[2],
        ExportOutcome::Saved {
            path: out.path().join("c_waveform.jpg")
        }
    );

    let summary = BatchSummary::from_outcomes(&inputs, &outcomes);
    assert_eq!((summary.saved, summary.failed), (2, 1));
    let failed: Vec<&String> = summary.failures_by_category.values().flatten().collect();
    assert_eq!(failed, vec!["b.mp3"]);
}

#[test]
fn test_single_file_batch_has_no_summary() {
    let fixtures = AudioTestFixtures::new();
    let input = fixtures.create_sine("solo.wav", 1, 8000, 0.2, 0.5);
    let out = tempfile::tempdir().unwrap();

    let worker = BatchWorker::new(BatchExporter::new());
    let inputs = vec![input];
    let handle = worker
        .submit(
            ExportRequest::new(inputs.clone())
                .with_output_dir(out.path())
                .with_dpi(100),
        )
        .unwrap();
    let outcomes = handle.wait().unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(!BatchSummary::from_outcomes(&inputs, &outcomes).should_announce());
}

#[test]
fn test_worker_can_be_reused_for_consecutive_batches() {
    let fixtures = AudioTestFixtures::new();
    let input = fixtures.create_sine("loop.wav", 1, 8000, 0.2, 0.5);
    let out = tempfile::tempdir().unwrap();
    let worker = BatchWorker::new(BatchExporter::new());

    for dpi in [100, 200] {
        let request = ExportRequest::new(vec![input.clone()])
            .with_output_dir(out.path())
            .with_dpi(dpi);
        let outcomes = worker.submit(request).unwrap().wait().unwrap();
        assert!(outcomes[0].is_success());
    }

    let count = std::fs::read_dir(out.path()).unwrap().count();
    assert_eq!(count, 1);
}

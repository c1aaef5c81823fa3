//! End-to-end pipeline tests

use std::sync::Arc;
use std::time::Duration;
use telemetry_codec::{decode_frame, Channel, OverflowPolicy};
use telemetry_pipeline::{
    BoxedSource, CycleOutcome, FileSink, ManualClock, MemorySink, Pipeline, PipelineConfig,
    SimulatedSource,
};

fn simulated_sources(seed: u64) -> [BoxedSource; 3] {
    Channel::ALL.map(|channel| Box::new(SimulatedSource::new(channel, seed)) as BoxedSource)
}

#[test]
fn test_published_payload_decodes_to_window_statistics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("payload.bin");
    let clock = Arc::new(ManualClock::new(1_700_000_000));

    let config = PipelineConfig {
        payload_path: path.clone(),
        ..Default::default()
    };
    let mut pipeline = Pipeline::new(
        &config,
        simulated_sources(42),
        Box::new(Arc::clone(&clock)),
        Box::new(FileSink::new(&path)),
    )
    .expect("pipeline");

    let mut frames = Vec::new();
    for _ in 0..6 {
        clock.advance(1);
        if let CycleOutcome::Published(frame) = pipeline.tick() {
            frames.push(frame);
        }
    }
    assert_eq!(frames.len(), 2);

    let bytes = std::fs::read(&path).expect("payload written");
    assert_eq!(bytes.len(), 27);
    assert_eq!(bytes.as_slice(), frames[1].as_bytes());

    let decoded = decode_frame(&bytes).expect("decode");
    assert_eq!(decoded.sequence, 1);
    assert_eq!(decoded.timestamp, ((1_700_000_000u64 + 6) % 65_536) as u16);

    let stats = pipeline.statistics().expect("windows filled");
    for channel in Channel::ALL {
        let expected = &stats[channel.index()];
        let got = decoded.channel(channel);
        let tolerance = 1.0 / channel.scale();
        assert!((got.min - expected.min).abs() <= tolerance, "{channel} min");
        assert!((got.max - expected.max).abs() <= tolerance, "{channel} max");
        assert!((got.median - expected.median).abs() <= tolerance, "{channel} median");
        assert!((got.std_dev - expected.std_dev).abs() <= tolerance, "{channel} std");
    }
}

#[test]
fn test_window_keeps_most_recent_samples() {
    let config = PipelineConfig {
        buffer_capacity: 4,
        filter_channels: Vec::new(),
        ..Default::default()
    };
    let mut reference = SimulatedSource::new(Channel::Co2, 9);
    let expected: Vec<f64> = (0..10)
        .map(|_| telemetry_pipeline::SampleSource::read(&mut reference).expect("read"))
        .collect();

    let mut pipeline = Pipeline::new(
        &config,
        simulated_sources(9),
        Box::new(ManualClock::new(0)),
        Box::new(MemorySink::new()),
    )
    .expect("pipeline");
    for _ in 0..10 {
        let _ = pipeline.tick();
    }

    assert_eq!(pipeline.window(Channel::Co2), expected[6..].to_vec());
}

#[test]
fn test_reject_policy_keeps_sequence_on_negative_value() {
    // A sensor reporting below zero cannot be carried by an unsigned field
    struct Constant(f64);
    impl telemetry_pipeline::SampleSource for Constant {
        fn read(&mut self) -> Result<f64, telemetry_pipeline::SourceError> {
            Ok(self.0)
        }
    }

    let config = PipelineConfig {
        publish_every: 1,
        overflow_policy: OverflowPolicy::Reject,
        ..Default::default()
    };
    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(
        &config,
        [
            Box::new(Constant(-5.0)),
            Box::new(Constant(50.0)),
            Box::new(Constant(420.0)),
        ],
        Box::new(ManualClock::new(0)),
        Box::new(sink.clone()),
    )
    .expect("pipeline");

    assert!(matches!(pipeline.tick(), CycleOutcome::EncodeFailed(_)));
    assert_eq!(sink.writes(), 0);
    assert_eq!(pipeline.counters().encode_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_shutdown() {
    let config = PipelineConfig::default();
    let sink = MemorySink::new();
    let mut pipeline = Pipeline::new(
        &config,
        simulated_sources(1),
        Box::new(ManualClock::new(0)),
        Box::new(sink.clone()),
    )
    .expect("pipeline");

    // Ticks at 0s..5s, shutdown at 5.5s
    let counters = pipeline
        .run(tokio::time::sleep(Duration::from_millis(5_500)))
        .await;

    assert_eq!(counters.cycles, 6);
    assert_eq!(counters.published, 2);
    assert_eq!(sink.writes(), 2);
    assert_eq!(sink.latest().map(|f| f.sequence()), Some(1));
}

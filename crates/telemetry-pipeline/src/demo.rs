//! Producer/consumer demo over the synchronized queue
//!
//! A producer thread generates combined readings at a fixed rate; a slower
//! consumer drains them. With [`QueuePolicy::Block`](ring_buffer::QueuePolicy::Block)
//! the producer is throttled to the consumer's pace; with
//! [`QueuePolicy::DropNewest`](ring_buffer::QueuePolicy::DropNewest) the backlog is
//! shed and every drop is reported.

use crate::config::DemoConfig;
use crate::source::{SampleSource, SimulatedSource};
use ring_buffer::{BufferError, PushOutcome, SensorSample, SynchronizedQueue};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use telemetry_codec::Channel;
use tracing::{info, warn};

/// Totals from one demo run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    /// Samples generated by the producer
    pub produced: u64,
    /// Samples handled by the consumer
    pub consumed: u64,
    /// Samples discarded on a full queue
    pub dropped: u64,
}

enum Message {
    Sample(SensorSample),
    Done,
}

/// Run the demo to completion and report totals
pub fn run_demo(config: &DemoConfig, seed: u64) -> Result<DemoReport, BufferError> {
    let queue = Arc::new(SynchronizedQueue::try_new(config.queue_capacity, config.policy)?);
    info!(
        "Queue demo: capacity={}, policy={:?}, {} items",
        config.queue_capacity, config.policy, config.items
    );

    let producer = {
        let queue = Arc::clone(&queue);
        let config = config.clone();
        thread::spawn(move || produce(&queue, &config, seed))
    };
    let consumer = {
        let queue = Arc::clone(&queue);
        let delay = Duration::from_millis(config.consume_delay_ms);
        thread::spawn(move || consume(&queue, delay))
    };

    let produced = producer
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
    let consumed = consumer
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

    let report = DemoReport {
        produced,
        consumed,
        dropped: queue.dropped(),
    };
    info!(
        "Queue demo finished: produced={}, consumed={}, dropped={}",
        report.produced, report.consumed, report.dropped
    );
    Ok(report)
}

fn produce(queue: &SynchronizedQueue<Message>, config: &DemoConfig, seed: u64) -> u64 {
    let mut sensors = Channel::ALL.map(|channel| SimulatedSource::new(channel, seed));
    let interval = Duration::from_millis(config.produce_interval_ms);
    let mut produced = 0;

    for _ in 0..config.items {
        thread::sleep(interval);

        let [temperature, humidity, co2] = sensors.each_mut().map(|s| s.read());
        let (Ok(temperature), Ok(humidity), Ok(co2)) = (temperature, humidity, co2) else {
            warn!("Producer: sensor read failed, skipping sample");
            continue;
        };
        let sample = SensorSample {
            temperature,
            humidity,
            co2,
            timestamp: chrono::Utc::now().timestamp(),
        };
        produced += 1;

        match queue.push(Message::Sample(sample)) {
            PushOutcome::Enqueued => info!(
                "Producer: T={:.2} H={:.2} CO2={:.2}",
                sample.temperature, sample.humidity, sample.co2
            ),
            PushOutcome::Dropped(_) => warn!(
                "Producer: buffer full, dropped T={:.2} H={:.2} CO2={:.2}",
                sample.temperature, sample.humidity, sample.co2
            ),
        }
    }

    // The end marker must survive a drop-on-full queue
    queue.push_blocking(Message::Done);
    produced
}

fn consume(queue: &SynchronizedQueue<Message>, delay: Duration) -> u64 {
    let mut consumed = 0;
    loop {
        match queue.pop() {
            Message::Sample(sample) => {
                consumed += 1;
                let time = chrono::DateTime::from_timestamp(sample.timestamp, 0)
                    .map(|t| t.format("%a %b %e %H:%M:%S %Y").to_string())
                    .unwrap_or_default();
                info!(
                    "Consumer: [{}] Temp={:.2}°C | Hum={:.2}% | CO2={:.2} ppm",
                    time, sample.temperature, sample.humidity, sample.co2
                );
                thread::sleep(delay);
            }
            Message::Done => break,
        }
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring_buffer::QueuePolicy;

    #[test]
    fn test_blocking_demo_loses_nothing() {
        let config = DemoConfig {
            queue_capacity: 2,
            policy: QueuePolicy::Block,
            produce_interval_ms: 0,
            consume_delay_ms: 1,
            items: 25,
        };
        let report = run_demo(&config, 3).expect("demo");
        assert_eq!(report.produced, 25);
        assert_eq!(report.consumed, 25);
        assert_eq!(report.dropped, 0);
    }

    #[test]
    fn test_drop_demo_accounts_for_every_sample() {
        let config = DemoConfig {
            queue_capacity: 2,
            policy: QueuePolicy::DropNewest,
            produce_interval_ms: 1,
            consume_delay_ms: 50,
            items: 30,
        };
        let report = run_demo(&config, 3).expect("demo");
        assert_eq!(report.produced, 30);
        assert_eq!(report.consumed + report.dropped, report.produced);
        assert!(report.dropped > 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = DemoConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(run_demo(&config, 0).is_err());
    }
}

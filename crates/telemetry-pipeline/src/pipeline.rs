//! Sampling and publishing loop
//!
//! Every cycle reads the three channels, validates them, smooths the
//! configured channels, and appends the results to per-channel windows. Every
//! `publish_every` successful cycles the windows are summarised, encoded into
//! a frame and handed to the sink.

use crate::clock::{Clock, SystemClock};
use crate::config::PipelineConfig;
use crate::sink::{FileSink, FrameSink, SinkError};
use crate::source::{SampleSource, SimulatedSource, SourceError};
use crate::PipelineError;
use data_validator::{MedianFilter, ValidationError, Validator};
use ring_buffer::RingBuffer;
use serde::Serialize;
use stats_engine::Statistics;
use std::future::Future;
use std::time::Duration;
use telemetry_codec::{Channel, ChannelStats, CodecError, TelemetryEncoder, TelemetryFrame};
use tracing::{debug, error, info, warn};

/// Boxed sample source
pub type BoxedSource = Box<dyn SampleSource + Send>;

/// Why a cycle was skipped
#[derive(Debug)]
pub enum SkipReason {
    /// A sensor read failed
    Read(SourceError),
    /// A reading failed plausibility checks
    Invalid {
        channel: Channel,
        error: ValidationError,
    },
}

/// Result of one pipeline cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Samples buffered, no frame due yet
    Buffered,
    /// Frame encoded and written
    Published(TelemetryFrame),
    /// Cycle skipped; windows untouched
    Skipped(SkipReason),
    /// Frame encoded but the sink refused it
    SinkFailed {
        frame: TelemetryFrame,
        error: SinkError,
    },
    /// Statistics could not be encoded
    EncodeFailed(CodecError),
}

/// Running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineCounters {
    /// Cycles that buffered samples
    pub cycles: u64,
    /// Frames written
    pub published: u64,
    /// Cycles skipped on read failure
    pub read_failures: u64,
    /// Cycles skipped on implausible readings
    pub rejected: u64,
    /// Frames the sink refused
    pub sink_failures: u64,
    /// Frames the encoder refused
    pub encode_failures: u64,
}

struct ChannelState {
    channel: Channel,
    source: BoxedSource,
    filter: Option<MedianFilter>,
    window: RingBuffer<f64>,
}

/// Environmental telemetry pipeline
pub struct Pipeline {
    channels: Vec<ChannelState>,
    validator: Validator,
    encoder: TelemetryEncoder,
    clock: Box<dyn Clock + Send>,
    sink: Box<dyn FrameSink + Send>,
    publish_every: u32,
    interval: Duration,
    ticks: u64,
    counters: PipelineCounters,
}

impl Pipeline {
    /// Build a pipeline; `sources` are given in wire order
    /// (temperature, humidity, CO₂).
    pub fn new(
        config: &PipelineConfig,
        sources: [BoxedSource; 3],
        clock: Box<dyn Clock + Send>,
        sink: Box<dyn FrameSink + Send>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let mut channels = Vec::with_capacity(Channel::ALL.len());
        for (channel, source) in Channel::ALL.into_iter().zip(sources) {
            let filter = if config.filter_channels.contains(&channel) {
                Some(MedianFilter::try_new(config.median_window)?)
            } else {
                None
            };
            channels.push(ChannelState {
                channel,
                source,
                filter,
                window: RingBuffer::try_new(config.buffer_capacity)?,
            });
        }

        info!(
            "Pipeline created: window={}, capacity={}, publish every {} cycles, filtered={:?}",
            config.median_window, config.buffer_capacity, config.publish_every, config.filter_channels
        );

        Ok(Self {
            channels,
            validator: Validator::new(config.validation.clone()),
            encoder: TelemetryEncoder::new(config.overflow_policy),
            clock,
            sink,
            publish_every: config.publish_every,
            interval: config.measurement_interval(),
            ticks: 0,
            counters: PipelineCounters::default(),
        })
    }

    /// Pipeline over simulated sensors, the system clock and a file sink at
    /// `config.payload_path`
    pub fn simulated(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let sim = &config.simulation;
        let sources = Channel::ALL.map(|channel| {
            Box::new(SimulatedSource::new(channel, sim.seed).with_failure_rate(sim.failure_rate))
                as BoxedSource
        });
        let sink = FileSink::new(&config.payload_path);
        info!("Publishing frames to {}", sink.path().display());
        Self::new(config, sources, Box::new(SystemClock), Box::new(sink))
    }

    /// Run one sampling cycle
    pub fn tick(&mut self) -> CycleOutcome {
        let readings = match self.read_all() {
            Ok(readings) => readings,
            Err(reason) => {
                match &reason {
                    SkipReason::Read(e) => {
                        self.counters.read_failures += 1;
                        metrics::counter!("telemetry_read_failures_total").increment(1);
                        warn!("Skipping cycle: {}", e);
                    }
                    SkipReason::Invalid { channel, error } => {
                        self.counters.rejected += 1;
                        metrics::counter!("telemetry_samples_rejected_total").increment(1);
                        warn!("Skipping cycle, implausible {} reading: {}", channel, error);
                    }
                }
                return CycleOutcome::Skipped(reason);
            }
        };

        for (state, raw) in self.channels.iter_mut().zip(readings) {
            let value = match state.filter.as_mut() {
                Some(filter) => filter.apply(raw),
                None => raw,
            };
            debug!("{}: raw={:.2} buffered={:.2}", state.channel, raw, value);
            state.window.push(value);
        }

        self.ticks += 1;
        self.counters.cycles += 1;

        if self.ticks % u64::from(self.publish_every) == 0 {
            self.publish()
        } else {
            CycleOutcome::Buffered
        }
    }

    /// Summarise the current windows, encode and write a frame
    pub fn publish(&mut self) -> CycleOutcome {
        let Some(stats) = self.statistics() else {
            debug!("Nothing buffered yet, no frame to publish");
            return CycleOutcome::Buffered;
        };

        for (channel, s) in Channel::ALL.iter().zip(stats.iter()) {
            info!(
                "{:<11} mean={:.2} min={:.2} max={:.2} median={:.2} std={:.2} {}",
                channel.name(),
                s.mean,
                s.min,
                s.max,
                s.median,
                s.std_dev,
                channel.unit()
            );
        }

        let blocks = stats.map(ChannelStats::from);
        let frame = match self.encoder.encode(self.clock.now(), &blocks) {
            Ok(frame) => frame,
            Err(e) => {
                self.counters.encode_failures += 1;
                error!("Frame not encoded: {}", e);
                return CycleOutcome::EncodeFailed(e);
            }
        };
        metrics::counter!("telemetry_frames_encoded_total").increment(1);

        match self.sink.write(&frame) {
            Ok(()) => {
                self.counters.published += 1;
                info!("Frame published (seq={}, ts={})", frame.sequence(), frame.timestamp());
                CycleOutcome::Published(frame)
            }
            Err(error) => {
                self.counters.sink_failures += 1;
                metrics::counter!("telemetry_sink_failures_total").increment(1);
                error!("Frame seq={} not written: {}", frame.sequence(), error);
                CycleOutcome::SinkFailed { frame, error }
            }
        }
    }

    /// Statistics of every window, or `None` while any window is empty
    pub fn statistics(&self) -> Option<[Statistics; 3]> {
        if self.channels.iter().any(|state| state.window.is_empty()) {
            return None;
        }
        let snapshot = |i: usize| Statistics::compute(&self.channels[i].window.get_all());
        Some([snapshot(0), snapshot(1), snapshot(2)])
    }

    /// Buffered window of one channel, oldest first
    pub fn window(&self, channel: Channel) -> Vec<f64> {
        self.channels[channel.index()].window.get_all()
    }

    /// Running totals
    pub fn counters(&self) -> PipelineCounters {
        self.counters
    }

    /// Tick until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> PipelineCounters
    where
        F: Future<Output = ()>,
    {
        info!("Starting sampling loop every {:?}", self.interval);
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let _ = self.tick();
                }
            }
        }

        info!("Sampling loop stopped after {} cycles", self.counters.cycles);
        self.counters
    }

    fn read_all(&mut self) -> Result<[f64; 3], SkipReason> {
        let mut readings = [0.0; 3];
        for (slot, state) in readings.iter_mut().zip(self.channels.iter_mut()) {
            let value = state.source.read().map_err(SkipReason::Read)?;
            let checked = match state.channel {
                Channel::Temperature => self.validator.validate_temperature(value),
                Channel::Humidity => self.validator.validate_humidity(value),
                Channel::Co2 => self.validator.validate_co2(value),
            };
            checked.map_err(|error| SkipReason::Invalid {
                channel: state.channel,
                error,
            })?;
            *slot = value;
        }
        Ok(readings)
    }
}

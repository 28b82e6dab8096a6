//! Sweep emission: render a [`SweepOutput`] into stamped cloud frames.

use crate::engine::registration::SweepOutput;
use crate::io::messages::{CloudFrame, OutputTopics, CAMERA_FRAME_ID};
use crossbeam_channel::Sender;
use thiserror::Error;

/// Emission errors.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("output channel disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, SinkError>;

/// Destination for emitted cloud frames.
pub trait SweepSink {
    fn publish(&mut self, frame: CloudFrame) -> Result<()>;
}

/// Sink backed by a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<CloudFrame>,
}

impl ChannelSink {
    /// Create a sink over an existing sender.
    pub fn new(tx: Sender<CloudFrame>) -> Self {
        Self { tx }
    }
}

impl SweepSink for ChannelSink {
    fn publish(&mut self, frame: CloudFrame) -> Result<()> {
        self.tx.send(frame).map_err(|_| SinkError::Disconnected)
    }
}

/// Renders sweep outputs into the six published clouds.
///
/// Every frame carries the input sweep's timestamp and the `/camera` frame
/// id. The `imu_trans` cloud is always exactly 4 points.
#[derive(Debug)]
pub struct SweepEmitter<S: SweepSink> {
    sink: S,
    topics: OutputTopics,
}

impl<S: SweepSink> SweepEmitter<S> {
    /// Create an emitter over a sink.
    pub fn new(sink: S, topics: OutputTopics) -> Self {
        Self { sink, topics }
    }

    /// Consume the emitter and hand back its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Publish all six clouds for one sweep.
    pub fn emit(&mut self, output: &SweepOutput) -> Result<()> {
        let stamp = output.stamp;
        let frames = [
            (&self.topics.full_cloud, &output.cloud),
            (&self.topics.corner_sharp, &output.features.corner_sharp),
            (
                &self.topics.corner_less_sharp,
                &output.features.corner_less_sharp,
            ),
            (&self.topics.surf_flat, &output.features.surf_flat),
            (&self.topics.surf_less_flat, &output.features.surf_less_flat),
        ];

        for (topic, cloud) in frames {
            self.sink.publish(CloudFrame {
                topic: topic.clone(),
                frame_id: CAMERA_FRAME_ID.to_string(),
                stamp,
                cloud: (*cloud).clone(),
            })?;
        }

        self.sink.publish(CloudFrame {
            topic: self.topics.imu_trans.clone(),
            frame_id: CAMERA_FRAME_ID.to_string(),
            stamp,
            cloud: output.motion.to_cloud(),
        })
    }
}

//! Serialized dispatch for the two producer callbacks.
//!
//! IMU samples and sweeps arrive from independent producers, but the core
//! mutates shared state (the IMU ring, the startup gate) without locks, so
//! only one callback may execute at a time. The worker thread serializes
//! both over crossbeam channels and drains every pending IMU sample before
//! touching a sweep, which guarantees that samples received between two
//! sweeps are fully integrated into the ring before the next sweep reads it.
//!
//! CRITICAL: the worker never blocks mid-sweep. Emission goes through an
//! unbounded channel; sensor data flows uninterrupted.

use crate::core::types::ImuReading;
use crate::engine::registration::ScanRegistration;
use crate::io::emitter::{ChannelSink, SweepEmitter};
use crate::io::messages::{CloudFrame, OutputTopics, SweepMessage};
use crate::registration::config::RegistrationConfig;
use crossbeam_channel::{select, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Handle to the registration worker thread.
pub struct RegistrationWorker {
    handle: JoinHandle<()>,
}

impl RegistrationWorker {
    /// Spawn the worker.
    ///
    /// The worker runs until both input channels disconnect, or until the
    /// output channel is dropped by its consumer.
    pub fn spawn(
        config: RegistrationConfig,
        topics: OutputTopics,
        imu_rx: Receiver<ImuReading>,
        sweep_rx: Receiver<SweepMessage>,
        frame_tx: Sender<CloudFrame>,
    ) -> Self {
        let handle = thread::Builder::new()
            .name("registration".into())
            .spawn(move || run_loop(config, topics, imu_rx, sweep_rx, frame_tx))
            .expect("Failed to spawn registration thread");

        Self { handle }
    }

    /// Wait for the worker to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

fn run_loop(
    config: RegistrationConfig,
    topics: OutputTopics,
    imu_rx: Receiver<ImuReading>,
    sweep_rx: Receiver<SweepMessage>,
    frame_tx: Sender<CloudFrame>,
) {
    log::info!("registration worker starting");
    let mut engine = ScanRegistration::new(config);
    let mut emitter = SweepEmitter::new(ChannelSink::new(frame_tx), topics);

    loop {
        select! {
            recv(imu_rx) -> msg => match msg {
                Ok(reading) => engine.handle_imu(&reading),
                Err(_) => {
                    log::info!("imu channel closed");
                    drain_sweeps(&mut engine, &mut emitter, &sweep_rx, &imu_rx);
                    break;
                }
            },
            recv(sweep_rx) -> msg => match msg {
                Ok(sweep) => {
                    // Integrate anything the IMU produced ahead of this
                    // sweep before the ring is read.
                    while let Ok(reading) = imu_rx.try_recv() {
                        engine.handle_imu(&reading);
                    }
                    if let Some(output) = engine.handle_sweep(&sweep) {
                        if emitter.emit(&output).is_err() {
                            log::info!("output channel closed, stopping worker");
                            return;
                        }
                    }
                }
                Err(_) => {
                    log::info!("sweep channel closed");
                    while imu_rx.recv().map(|r| engine.handle_imu(&r)).is_ok() {}
                    break;
                }
            },
        }
    }

    log::info!("registration worker stopped");
}

fn drain_sweeps(
    engine: &mut ScanRegistration,
    emitter: &mut SweepEmitter<ChannelSink>,
    sweep_rx: &Receiver<SweepMessage>,
    imu_rx: &Receiver<ImuReading>,
) {
    while let Ok(sweep) = sweep_rx.recv() {
        while let Ok(reading) = imu_rx.try_recv() {
            engine.handle_imu(&reading);
        }
        if let Some(output) = engine.handle_sweep(&sweep) {
            if emitter.emit(&output).is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::f32::consts::PI;

    fn ring_sweep(stamp: f64, n: usize) -> SweepMessage {
        let points = (0..n)
            .map(|k| {
                let az = -(k as f32) * 2.0 * PI / n as f32;
                [2.0 * az.cos(), 2.0 * az.sin(), 0.0]
            })
            .collect();
        SweepMessage { stamp, points }
    }

    #[test]
    fn test_worker_processes_sweeps() {
        let config = RegistrationConfig {
            system_delay: 0,
            ..RegistrationConfig::default()
        };
        let (imu_tx, imu_rx) = unbounded();
        let (sweep_tx, sweep_rx) = unbounded();
        let (frame_tx, frame_rx) = unbounded();

        let worker = RegistrationWorker::spawn(
            config,
            OutputTopics::default(),
            imu_rx,
            sweep_rx,
            frame_tx,
        );

        sweep_tx.send(ring_sweep(1.0, 64)).unwrap();
        sweep_tx.send(ring_sweep(1.1, 64)).unwrap();
        drop(sweep_tx);
        drop(imu_tx);

        worker.join().unwrap();

        let frames: Vec<CloudFrame> = frame_rx.try_iter().collect();
        // two sweeps, six frames each
        assert_eq!(frames.len(), 12);
    }

    #[test]
    fn test_worker_stops_when_inputs_close() {
        let config = RegistrationConfig::default();
        let (imu_tx, imu_rx) = unbounded::<ImuReading>();
        let (sweep_tx, sweep_rx) = unbounded::<SweepMessage>();
        let (frame_tx, _frame_rx) = unbounded();

        let worker = RegistrationWorker::spawn(
            config,
            OutputTopics::default(),
            imu_rx,
            sweep_rx,
            frame_tx,
        );

        drop(imu_tx);
        drop(sweep_tx);
        worker.join().unwrap();
    }
}

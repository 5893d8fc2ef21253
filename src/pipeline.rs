//! Detection/tracking pipeline with an owned worker thread.
//!
//! Frames are moved into the worker as immutable snapshots over a bounded
//! channel of depth one; a frame submitted while the worker is busy is
//! dropped, so the frame producer is never blocked and at most one
//! detection/tracking task runs at a time. Results come back as events on an
//! unbounded channel. Nothing is shared mutably between producer and worker.
//!
//! Stopping is best-effort: a stop flag is checked before each event
//! delivery and the frame channel is disconnected; `stop` then joins the
//! worker.

use crate::face_detection::{FaceDetection, FaceDetector};
use crate::tracking::{EyeTracker, TrackingReport};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use image::GrayImage;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::constants::FRAME_QUEUE_DEPTH;

/// An immutable frame snapshot owned by whoever holds it
pub struct Frame {
    /// Monotonic index assigned by the producer
    pub index: u64,
    pub gray: GrayImage,
}

/// Results emitted by the worker, in per-frame order
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Faces found on a frame, highest score first
    Faces {
        frame_index: u64,
        detections: Vec<FaceDetection>,
    },
    /// One tracking step for the best face of a frame
    Tracking {
        frame_index: u64,
        report: TrackingReport,
    },
    /// Detection failed; the frame was dropped for tracking purposes
    FrameError { frame_index: u64, message: String },
}

/// Handle to the worker thread
pub struct DetectionPipeline {
    frame_tx: Option<Sender<Frame>>,
    worker: Option<JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl DetectionPipeline {
    /// Spawn the worker; it takes ownership of the detector and tracker
    pub fn spawn(
        mut detector: Box<dyn FaceDetector>,
        mut tracker: EyeTracker,
    ) -> (Self, Receiver<PipelineEvent>) {
        let (frame_tx, frame_rx) = bounded::<Frame>(FRAME_QUEUE_DEPTH);
        let (event_tx, event_rx) = unbounded::<PipelineEvent>();
        let stopped = Arc::new(AtomicBool::new(false));
        let worker_stopped = Arc::clone(&stopped);

        let worker = thread::spawn(move || {
            while let Ok(frame) = frame_rx.recv() {
                if worker_stopped.load(Ordering::SeqCst) {
                    break;
                }
                process_frame(&mut *detector, &mut tracker, &frame, &event_tx, &worker_stopped);
            }
            debug!("pipeline worker exiting");
        });

        (
            Self {
                frame_tx: Some(frame_tx),
                worker: Some(worker),
                stopped,
            },
            event_rx,
        )
    }

    /// Hand a frame to the worker.
    ///
    /// Returns `false` when the frame was dropped because the worker is busy
    /// or the pipeline has stopped.
    pub fn submit(&self, frame: Frame) -> bool {
        let Some(tx) = &self.frame_tx else {
            return false;
        };
        match tx.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(frame)) => {
                debug!("worker busy, dropping frame {}", frame.index);
                false
            }
            Err(TrySendError::Disconnected(frame)) => {
                warn!("pipeline worker gone, dropping frame {}", frame.index);
                false
            }
        }
    }

    /// Stop the worker and wait for it to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.frame_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("pipeline worker panicked");
            }
        }
    }
}

impl Drop for DetectionPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn process_frame(
    detector: &mut dyn FaceDetector,
    tracker: &mut EyeTracker,
    frame: &Frame,
    events: &Sender<PipelineEvent>,
    stopped: &AtomicBool,
) {
    let detections = match detector.detect(&frame.gray) {
        Ok(detections) => detections,
        Err(e) => {
            warn!("face detection failed on frame {}: {e}", frame.index);
            let _ = events.send(PipelineEvent::FrameError {
                frame_index: frame.index,
                message: e.to_string(),
            });
            return;
        }
    };

    if stopped.load(Ordering::SeqCst) {
        return;
    }
    let best = detections.first().copied();
    let _ = events.send(PipelineEvent::Faces {
        frame_index: frame.index,
        detections,
    });

    if let Some(face) = best {
        let report = tracker.process(&frame.gray, face.region);
        if stopped.load(Ordering::SeqCst) {
            return;
        }
        let _ = events.send(PipelineEvent::Tracking {
            frame_index: frame.index,
            report,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eye_detection::EyeDetector;
    use crate::geometry::Region;
    use crate::Result;

    struct NoFaceDetector;

    impl FaceDetector for NoFaceDetector {
        fn detect(&mut self, _gray: &GrayImage) -> Result<Vec<FaceDetection>> {
            Ok(Vec::new())
        }
    }

    struct BlindEyeDetector;

    impl EyeDetector for BlindEyeDetector {
        fn detect_eye(&self, _band: &GrayImage) -> Option<Region> {
            None
        }
    }

    #[test]
    fn test_stop_with_submitted_frame_joins() {
        let tracker = EyeTracker::new(Box::new(BlindEyeDetector));
        let (pipeline, _events) = DetectionPipeline::spawn(Box::new(NoFaceDetector), tracker);

        assert!(pipeline.submit(Frame { index: 0, gray: GrayImage::new(8, 8) }));
        pipeline.stop();
    }

    #[test]
    fn test_faces_event_emitted() {
        let tracker = EyeTracker::new(Box::new(BlindEyeDetector));
        let (pipeline, events) = DetectionPipeline::spawn(Box::new(NoFaceDetector), tracker);

        pipeline.submit(Frame { index: 7, gray: GrayImage::new(8, 8) });
        let event = events
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("worker should emit a faces event");
        match event {
            PipelineEvent::Faces { frame_index, detections } => {
                assert_eq!(frame_index, 7);
                assert!(detections.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        pipeline.stop();
    }
}

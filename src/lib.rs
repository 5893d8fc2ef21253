//! Eye-tracking library for face detection and learn/match iris tracking.
//!
//! This library provides:
//! - Face detection behind a pluggable classifier seam (`rustface` backend)
//! - A two-phase learn/match iris tracker built on template matching
//! - A worker pipeline that keeps frame producers unblocked
//!
//! The tracking pipeline consists of:
//! 1. Face detection to locate face boxes in the frame
//! 2. Eye-band derivation from each face box
//! 3. A learning window that builds small grayscale iris templates
//! 4. Template matching to follow the iris once learning is done
//!
//! # Examples
//!
//! ## Tracking a face across frames
//!
//! ```no_run
//! use eye_tracking::eye_detection::GradientEyeDetector;
//! use eye_tracking::geometry::Region;
//! use eye_tracking::tracking::EyeTracker;
//!
//! # fn main() -> eye_tracking::Result<()> {
//! let mut tracker = EyeTracker::new(Box::new(GradientEyeDetector::new()));
//!
//! let frame = image::open("frame.png")?.to_luma8();
//! let face = Region::new(100, 100, 200, 200);
//!
//! let report = tracker.process(&frame, face);
//! println!("{}", report.status);
//! if let Some(right) = report.right {
//!     println!("right iris at ({}, {})", right.iris.x, right.iris.y);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Full pipeline with a worker thread
//!
//! ```no_run
//! use eye_tracking::eye_detection::GradientEyeDetector;
//! use eye_tracking::face_detection::CascadeFaceDetector;
//! use eye_tracking::pipeline::{DetectionPipeline, Frame, PipelineEvent};
//! use eye_tracking::tracking::EyeTracker;
//!
//! # fn main() -> eye_tracking::Result<()> {
//! let detector = CascadeFaceDetector::from_model_file("assets/seeta_fd_frontal_v1.0.bin")?;
//! let tracker = EyeTracker::new(Box::new(GradientEyeDetector::new()));
//! let (pipeline, events) = DetectionPipeline::spawn(Box::new(detector), tracker);
//!
//! for (index, path) in ["frame0.png", "frame1.png"].iter().enumerate() {
//!     let gray = image::open(path)?.to_luma8();
//!     // A frame submitted while the worker is busy is dropped
//!     pipeline.submit(Frame { index: index as u64, gray });
//! }
//!
//! for event in events.try_iter() {
//!     match event {
//!         PipelineEvent::Faces { frame_index, detections } => {
//!             println!("frame {frame_index}: {} face(s)", detections.len());
//!         }
//!         PipelineEvent::Tracking { frame_index, report } => {
//!             println!("frame {frame_index}: {}", report.status);
//!         }
//!         PipelineEvent::FrameError { frame_index, message } => {
//!             eprintln!("frame {frame_index} failed: {message}");
//!         }
//!     }
//! }
//!
//! pipeline.stop();
//! # Ok(())
//! # }
//! ```

/// Face detection module behind a pluggable classifier seam
pub mod face_detection;

/// Eye localisation within an eye band
pub mod eye_detection;

/// Learn/match eye-tracking state machine
pub mod tracking;

/// Template matching for iris localisation
pub mod template_matching;

/// Geometry primitives and eye-band derivation
pub mod geometry;

/// Detection/tracking pipeline with an owned worker thread
pub mod pipeline;

/// Overlay rendering of detection and tracking results
pub mod draw;

/// Image cropping helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};

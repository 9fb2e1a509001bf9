//! Voice-triggered jumps
//!
//! A short audio sample is transcribed by an external service and compared to
//! a trigger word. Classification runs on a worker thread so the tick loop is
//! never blocked; finished detections are collected with [`VoiceListener::drain`]
//! and handed to the game, which discards any that belong to an old session.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender, TryRecvError, select, unbounded};
use thiserror::Error;

use crate::game::SessionId;

/// Default trigger word
pub const DEFAULT_TRIGGER_WORD: &str = "hey";

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("transcription service unavailable: {0}")]
    Unavailable(String),
    #[error("transcription timed out")]
    Timeout,
    #[error("malformed audio sample: {0}")]
    BadSample(String),
    #[error("voice worker is not running")]
    WorkerGone,
}

/// Recorded audio, opaque to the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSample {
    /// Encoded audio bytes (container/codec decided by the recorder)
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`, e.g. `audio/webm`
    pub mime_type: String,
}

impl AudioSample {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// External speech-to-text capability
pub trait Transcriber: Send + 'static {
    fn transcribe(&self, sample: &AudioSample) -> Result<String, VoiceError>;
}

/// Decides whether a sample contains the trigger word
pub trait TriggerDetector: Send + 'static {
    /// Never fails: any error means "not detected"
    fn detect(&self, sample: &AudioSample) -> bool;
}

/// Detector that transcribes the sample and matches the transcript exactly
pub struct KeywordDetector<T: Transcriber> {
    transcriber: T,
    keyword: String,
}

impl<T: Transcriber> KeywordDetector<T> {
    pub fn new(transcriber: T) -> Self {
        Self::with_keyword(transcriber, DEFAULT_TRIGGER_WORD)
    }

    pub fn with_keyword(transcriber: T, keyword: impl Into<String>) -> Self {
        Self {
            transcriber,
            keyword: keyword.into(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl<T: Transcriber> TriggerDetector for KeywordDetector<T> {
    fn detect(&self, sample: &AudioSample) -> bool {
        match self.transcriber.transcribe(sample) {
            Ok(text) => text == self.keyword,
            Err(e) => {
                log::warn!("Error processing audio: {}", e);
                false
            }
        }
    }
}

/// Result of classifying one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    /// Session that was current when the sample was submitted
    pub session: SessionId,
    pub detected: bool,
}

struct Job {
    session: SessionId,
    sample: AudioSample,
}

/// Background worker that classifies samples off the game thread
///
/// Dropping the listener cancels every queued sample. Only a transcription
/// already in flight is waited for.
pub struct VoiceListener {
    jobs: Option<Sender<Job>>,
    results: Receiver<Detection>,
    /// Never sent on; dropping it is the stop signal
    stop: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl VoiceListener {
    pub fn spawn<D: TriggerDetector>(detector: D) -> Self {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (result_tx, result_rx) = unbounded();
        let (stop_tx, stop_rx) = unbounded::<()>();

        let worker = thread::spawn(move || {
            loop {
                let next = select! {
                    recv(stop_rx) -> _ => None,
                    recv(job_rx) -> job => job.ok(),
                };
                // select! picks randomly when both are ready
                let Some(job) = next.filter(|_| !stopped(&stop_rx)) else {
                    break;
                };
                let detection = Detection {
                    session: job.session,
                    detected: detector.detect(&job.sample),
                };
                if result_tx.send(detection).is_err() {
                    break;
                }
            }
            log::debug!("Voice worker stopped ({} samples skipped)", job_rx.len());
        });

        Self {
            jobs: Some(job_tx),
            results: result_rx,
            stop: Some(stop_tx),
            worker: Some(worker),
        }
    }

    /// Queue a sample for classification without waiting for the result
    pub fn submit(&self, session: SessionId, sample: AudioSample) -> Result<(), VoiceError> {
        let jobs = self.jobs.as_ref().ok_or(VoiceError::WorkerGone)?;
        jobs.send(Job { session, sample })
            .map_err(|_| VoiceError::WorkerGone)
    }

    /// Collect every detection finished so far
    pub fn drain(&self) -> Vec<Detection> {
        self.results.try_iter().collect()
    }

    /// Block until the next detection arrives (headless tools and tests)
    pub fn recv(&self) -> Option<Detection> {
        self.results.recv().ok()
    }
}

fn stopped(stop: &Receiver<()>) -> bool {
    matches!(stop.try_recv(), Err(TryRecvError::Disconnected))
}

impl Drop for VoiceListener {
    fn drop(&mut self) {
        self.stop.take();
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Voice worker panicked");
            }
        }
    }
}

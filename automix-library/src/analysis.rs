//! Mix analysis jobs
//!
//! A job walks through a fixed list of steps on a background thread,
//! reporting progress over a channel, and finishes with a report whose
//! values are seeded from the source string. URLs are never fetched.

use automix_analysis::{
    detect_bpm, detect_dna, detect_energy, detect_key, detect_mood, detect_tracks, DetectedTrack,
    DnaProfile, SeededRng,
};
use crossbeam_channel::{self, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Steps of a job, in order
pub const ANALYSIS_STEPS: [&str; 5] = [
    "Fetching audio",
    "Detecting tempo",
    "Detecting key",
    "Profiling DNA",
    "Identifying tracks",
];

/// Errors from preparing an analysis job
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("nothing to analyze")]
    EmptyInput,
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
}

/// Where a mix comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisSource {
    SoundCloud(String),
    YouTube(String),
    Mixcloud(String),
    /// Id of a previously uploaded file
    Upload(String),
}

impl AnalysisSource {
    /// Classify user input as a supported URL or an upload id
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        if input.starts_with("upload-") {
            return Ok(AnalysisSource::Upload(input.to_string()));
        }

        let lower = input.to_lowercase();
        let Some(rest) = lower
            .strip_prefix("https://")
            .or_else(|| lower.strip_prefix("http://"))
        else {
            return Err(AnalysisError::UnsupportedSource(input.to_string()));
        };
        let authority = rest.split('/').next().unwrap_or_default();
        let has_path = rest.len() > authority.len() + 1;
        let host = authority.strip_prefix("www.").unwrap_or(authority);
        let host = host.strip_prefix("m.").unwrap_or(host);

        match host {
            "soundcloud.com" if has_path => Ok(AnalysisSource::SoundCloud(input.to_string())),
            "youtube.com" | "youtu.be" | "music.youtube.com" if has_path => {
                Ok(AnalysisSource::YouTube(input.to_string()))
            }
            "mixcloud.com" if has_path => Ok(AnalysisSource::Mixcloud(input.to_string())),
            _ => Err(AnalysisError::UnsupportedSource(input.to_string())),
        }
    }

    /// The original input string
    pub fn as_str(&self) -> &str {
        match self {
            AnalysisSource::SoundCloud(s)
            | AnalysisSource::YouTube(s)
            | AnalysisSource::Mixcloud(s)
            | AnalysisSource::Upload(s) => s,
        }
    }

    pub fn platform(&self) -> &'static str {
        match self {
            AnalysisSource::SoundCloud(_) => "SoundCloud",
            AnalysisSource::YouTube(_) => "YouTube",
            AnalysisSource::Mixcloud(_) => "Mixcloud",
            AnalysisSource::Upload(_) => "Upload",
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.platform(), self.as_str())
    }
}

/// Result of analyzing a mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: AnalysisSource,
    pub duration_secs: f64,
    pub bpm: f32,
    pub key: String,
    pub energy: u8,
    pub mood: String,
    pub dna: DnaProfile,
    pub tracks: Vec<DetectedTrack>,
}

impl AnalysisReport {
    /// Build the report for a source; same source, same report
    pub fn generate(source: AnalysisSource) -> Self {
        let mut rng = SeededRng::from_key(source.as_str());
        let duration_secs = rng.range_u32(45, 120) as f64 * 60.0;
        let bpm = detect_bpm(&mut rng);
        let key = detect_key(&mut rng);
        let energy = detect_energy(&mut rng);
        let mood = detect_mood(&mut rng).to_string();
        let dna = detect_dna(&mut rng);
        let tracks = detect_tracks(&mut rng, duration_secs);

        Self {
            source,
            duration_secs,
            bpm,
            key,
            energy,
            mood,
            dna,
            tracks,
        }
    }
}

/// Progress updates of a running job
#[derive(Debug, Clone)]
pub enum AnalysisProgress {
    Started {
        source: AnalysisSource,
        steps: usize,
    },
    Step {
        name: &'static str,
        /// 0-100, after this step
        percent: u8,
    },
    Complete(Box<AnalysisReport>),
}

/// Spawns analysis jobs
pub struct AnalysisRunner;

impl AnalysisRunner {
    /// Run a job on its own thread
    ///
    /// Each step waits `step_delay` before reporting. If the receiver is
    /// dropped the job stops at the next step.
    pub fn spawn(
        source: AnalysisSource,
        step_delay: Duration,
    ) -> (Receiver<AnalysisProgress>, JoinHandle<()>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = thread::spawn(move || {
            Self::run(source, step_delay, tx);
        });
        (rx, handle)
    }

    fn run(source: AnalysisSource, step_delay: Duration, tx: Sender<AnalysisProgress>) {
        info!(%source, "analysis started");
        let started = AnalysisProgress::Started {
            source: source.clone(),
            steps: ANALYSIS_STEPS.len(),
        };
        if tx.send(started).is_err() {
            return;
        }

        for (i, name) in ANALYSIS_STEPS.iter().enumerate() {
            thread::sleep(step_delay);
            let percent = ((i + 1) * 100 / ANALYSIS_STEPS.len()) as u8;
            debug!(step = name, percent, "analysis step");
            if tx.send(AnalysisProgress::Step { name, percent }).is_err() {
                debug!("analysis receiver dropped, stopping");
                return;
            }
        }

        let report = AnalysisReport::generate(source);
        info!(tracks = report.tracks.len(), bpm = report.bpm, "analysis complete");
        let _ = tx.send(AnalysisProgress::Complete(Box::new(report)));
    }
}

//! Player bar state - transport, seek and volume for the selected track
//!
//! Purely visual: no audio is decoded or played.

/// Track loaded into the player bar
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub duration_secs: f64,
}

/// Player bar state
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    track: Option<PlayerTrack>,
    position_secs: f64,
    /// 0-100
    volume: u8,
    playing: bool,
    muted: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            track: None,
            position_secs: 0.0,
            volume: 80,
            playing: false,
            muted: false,
        }
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a track and start playing it from the top
    pub fn load(&mut self, track: PlayerTrack) {
        self.track = Some(track);
        self.position_secs = 0.0;
        self.playing = true;
    }

    pub fn track(&self) -> Option<&PlayerTrack> {
        self.track.as_ref()
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn duration(&self) -> f64 {
        self.track.as_ref().map_or(0.0, |t| t.duration_secs.max(0.0))
    }

    pub fn play(&mut self) {
        if self.track.is_some() {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Seek to an absolute position, clamped to the track
    pub fn seek(&mut self, secs: f64) {
        self.position_secs = secs.clamp(0.0, self.duration());
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta_secs: f64) {
        self.seek(self.position_secs + delta_secs);
    }

    pub fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, 100) as u8;
        if self.volume > 0 {
            self.muted = false;
        }
    }

    pub fn adjust_volume(&mut self, delta: i32) {
        self.set_volume(self.volume as i32 + delta);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Volume actually heard, 0 when muted
    pub fn effective_volume(&self) -> u8 {
        if self.muted {
            0
        } else {
            self.volume
        }
    }

    /// Move the playhead; stops at the end of the track
    pub fn advance(&mut self, dt_secs: f64) {
        if !self.playing {
            return;
        }
        let duration = self.duration();
        self.position_secs += dt_secs;
        if self.position_secs >= duration {
            self.position_secs = duration;
            self.playing = false;
        }
    }

    /// Playhead position, 0.0-1.0
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 {
            (self.position_secs / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Format seconds as M:SS
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

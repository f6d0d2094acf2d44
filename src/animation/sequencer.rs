/// Timer-driven frame selector of an animated bitmap.
///
/// The sequencer does not own frames; every query takes the current frame count. While playing,
/// the frame is `floor(last_frame + play_time * fps)`, wrapped when looping and held on the last
/// frame otherwise. `play` only arms a reset; the next [`Sequencer::update`] re-anchors the
/// timer so playback resumes from `last_frame`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sequencer {
    fps: f64,
    looping: bool,
    playing: bool,
    needs_reset: bool,
    last_frame: usize,
    start_time: f64,
    play_time: f64,
}

impl Sequencer {
    /// Stopped sequencer on frame 0.
    pub fn new(fps: f64, looping: bool) -> Self {
        Self {
            fps: fps.max(0.0),
            looping,
            playing: false,
            needs_reset: false,
            last_frame: 0,
            start_time: 0.0,
            play_time: 0.0,
        }
    }

    /// Frames per second; `0` freezes playback on `last_frame`.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Whether playback wraps around.
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Set the loop flag.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// `true` between `play` and `stop`, even past the end of non-looping playback.
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Resume point used while stopped and as the origin of playback.
    pub fn last_frame(&self) -> usize {
        self.last_frame
    }

    fn raw_frame(&self) -> i64 {
        if self.fps <= 0.0 {
            return self.last_frame as i64;
        }
        (self.last_frame as f64 + self.play_time / (1.0 / self.fps)).floor() as i64
    }

    /// Frame to display out of `count` frames.
    pub fn current_frame(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        if !self.playing || self.needs_reset {
            return self.last_frame.min(count - 1);
        }
        let raw = self.raw_frame().max(0);
        if self.looping {
            (raw % count as i64) as usize
        } else {
            (raw as usize).min(count - 1)
        }
    }

    /// `false` once non-looping playback has run past the last frame.
    pub fn is_playing(&self, count: usize) -> bool {
        if !self.playing {
            return false;
        }
        if self.looping || self.needs_reset {
            return true;
        }
        self.raw_frame() < count as i64
    }

    /// Start playback from `last_frame` on the next update. No-op while already playing.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.needs_reset = true;
    }

    /// Freeze on the currently displayed frame.
    pub fn stop(&mut self, count: usize) {
        self.last_frame = self.current_frame(count);
        self.playing = false;
    }

    /// Jump to `frame`, clamped into the valid frame range.
    pub fn seek(&mut self, frame: i32, count: usize) {
        let max = count.saturating_sub(1) as i64;
        self.last_frame = i64::from(frame).clamp(0, max) as usize;
    }

    /// Per-tick timer advance with the engine's run time in seconds.
    pub fn update(&mut self, run_time: f64, count: usize) {
        if !self.playing {
            return;
        }
        if self.needs_reset {
            self.last_frame = self.current_frame(count);
            self.play_time = 0.0;
            self.start_time = run_time;
            self.needs_reset = false;
            return;
        }
        self.play_time = run_time - self.start_time;
    }

    /// Stop, then step forward one frame.
    pub fn next_frame(&mut self, count: usize) {
        self.stop(count);
        if self.last_frame + 1 >= count {
            if self.looping {
                self.last_frame = 0;
            }
            return;
        }
        self.last_frame += 1;
    }

    /// Stop, then step back one frame.
    pub fn previous_frame(&mut self, count: usize) {
        self.stop(count);
        if self.last_frame == 0 {
            if self.looping {
                self.last_frame = count.saturating_sub(1);
            }
            return;
        }
        self.last_frame -= 1;
    }

    /// Change the rate; negative values clamp to 0. Playback restarts from the current frame.
    pub fn set_fps(&mut self, fps: f64, count: usize) {
        let restart = self.playing;
        self.stop(count);
        self.fps = if fps < 0.0 { 0.0 } else { fps };
        if restart {
            self.play();
        }
    }

    /// Keep `last_frame` valid after frames were removed.
    pub(crate) fn clamp_to(&mut self, count: usize) {
        self.last_frame = self.last_frame.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sequencer.rs"]
mod tests;

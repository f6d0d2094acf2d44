use crate::bitmap::engine::{Engine, slot_data_mut};
use crate::bitmap::store::{Animation, Backing, BackingKind, BitmapId};
use crate::foundation::error::{BitmapError, BitmapResult};
use crate::gpu::GpuDevice;

fn not_animated(op: &str) -> BitmapError {
    BitmapError::unsupported(format!("{op} needs an animated bitmap"))
}

impl<D: GpuDevice> Engine<D> {
    fn animation(&self, id: BitmapId, op: &str) -> BitmapResult<&Animation> {
        match &self.data(id)?.backing {
            Backing::Animated(a) => Ok(a),
            _ => Err(not_animated(op)),
        }
    }

    fn animation_mut(&mut self, id: BitmapId, op: &str) -> BitmapResult<&mut Animation> {
        match &mut self.data_mut(id)?.backing {
            Backing::Animated(a) => Ok(a),
            _ => Err(not_animated(op)),
        }
    }

    /// Start playback from the current frame on the next [`Engine::prepare_draw`].
    pub fn play(&mut self, id: BitmapId) -> BitmapResult<()> {
        self.animation_mut(id, "play")?.seq.play();
        Ok(())
    }

    /// Freeze on the frame currently shown.
    pub fn stop(&mut self, id: BitmapId) -> BitmapResult<()> {
        let a = self.animation_mut(id, "stop")?;
        a.seq.stop(a.frames.len());
        Ok(())
    }

    /// `true` while playing; non-looping playback reports `false` once past the last frame.
    pub fn is_playing(&self, id: BitmapId) -> BitmapResult<bool> {
        let a = self.animation(id, "is_playing")?;
        Ok(a.seq.is_playing(a.frames.len()))
    }

    /// Show `frame` (clamped into range) without changing the play state.
    pub fn seek(&mut self, id: BitmapId, frame: i32) -> BitmapResult<()> {
        let a = self.animation_mut(id, "seek")?;
        a.seq.seek(frame, a.frames.len());
        Ok(())
    }

    /// Stop, then show `frame` (clamped).
    pub fn goto_and_stop(&mut self, id: BitmapId, frame: i32) -> BitmapResult<()> {
        let a = self.animation_mut(id, "goto_and_stop")?;
        let n = a.frames.len();
        a.seq.stop(n);
        a.seq.seek(frame, n);
        Ok(())
    }

    /// Show `frame` (clamped) and play from it on the next update.
    pub fn goto_and_play(&mut self, id: BitmapId, frame: i32) -> BitmapResult<()> {
        let a = self.animation_mut(id, "goto_and_play")?;
        let n = a.frames.len();
        a.seq.stop(n);
        a.seq.seek(frame, n);
        a.seq.play();
        Ok(())
    }

    /// Stop and step one frame forward.
    pub fn next_frame(&mut self, id: BitmapId) -> BitmapResult<()> {
        let a = self.animation_mut(id, "next_frame")?;
        a.seq.next_frame(a.frames.len());
        Ok(())
    }

    /// Stop and step one frame back.
    pub fn previous_frame(&mut self, id: BitmapId) -> BitmapResult<()> {
        let a = self.animation_mut(id, "previous_frame")?;
        a.seq.previous_frame(a.frames.len());
        Ok(())
    }

    /// Frame count; 1 for static bitmaps.
    pub fn num_frames(&self, id: BitmapId) -> BitmapResult<usize> {
        Ok(match &self.data(id)?.backing {
            Backing::Animated(a) => a.frames.len(),
            _ => 1,
        })
    }

    /// Index of the frame shown; 0 for static bitmaps.
    pub fn current_frame(&self, id: BitmapId) -> BitmapResult<usize> {
        Ok(match &self.data(id)?.backing {
            Backing::Animated(a) => a.seq.current_frame(a.frames.len()),
            _ => 0,
        })
    }

    /// Playback rate in frames per second.
    pub fn fps(&self, id: BitmapId) -> BitmapResult<f64> {
        Ok(self.animation(id, "fps")?.seq.fps())
    }

    /// Change the playback rate. Negative rates clamp to 0; a playing animation restarts from
    /// its current frame.
    pub fn set_fps(&mut self, id: BitmapId, fps: f64) -> BitmapResult<()> {
        let a = self.animation_mut(id, "set_fps")?;
        a.seq.set_fps(fps, a.frames.len());
        Ok(())
    }

    /// Whether playback wraps past the last frame.
    pub fn looping(&self, id: BitmapId) -> BitmapResult<bool> {
        Ok(self.animation(id, "looping")?.seq.looping())
    }

    /// A non-looping animation stops on its last frame.
    pub fn set_looping(&mut self, id: BitmapId, looping: bool) -> BitmapResult<()> {
        self.animation_mut(id, "set_looping")?.seq.set_looping(looping);
        Ok(())
    }

    /// Copy `src` into a new frame of `dst` at `position`.
    ///
    /// A static `dst` becomes an animation whose first frame is its old content. A negative
    /// `position` appends and returns the new frame count. Otherwise the frame is inserted at
    /// `position` clamped to the frame count, and `position` itself is returned as given.
    /// `src` must match the size of `dst`.
    pub fn add_frame(&mut self, dst: BitmapId, src: BitmapId, position: i32) -> BitmapResult<usize> {
        let data = self.data(dst)?;
        if data.backing.kind() == BackingKind::Mega {
            return Err(BitmapError::unsupported(
                "mega bitmaps cannot hold animation frames",
            ));
        }
        let (w, h) = data.backing.size();
        let (sw, sh) = self.data(src)?.backing.size();
        if (sw, sh) != (w, h) {
            return Err(BitmapError::invalid(format!(
                "frame of {sw}x{sh} does not match the {w}x{h} animation"
            )));
        }

        let tex = self.device.request(w as u32, h as u32)?;
        let copied = self.with_pair(dst, src, |device, d, s| {
            let s = s.unwrap_or(&*d);
            match &s.backing {
                Backing::Mega(surface) => device.upload(&tex, tex.rect(), surface),
                other => {
                    let from = other
                        .texture()
                        .ok_or_else(|| BitmapError::unsupported("source has no texture"))?;
                    device.blit(&tex, tex.rect(), from, from.rect())
                }
            }
        });
        if let Err(e) = copied {
            self.device.release(tex);
            return Err(e);
        }

        let fps = self.config.frame_rate;
        let data = slot_data_mut(&mut self.slots, dst)?;
        if data.backing.promote(fps) {
            tracing::debug!(?dst, fps, "static bitmap converted to an animation");
        }
        let Backing::Animated(a) = &mut data.backing else {
            self.device.release(tex);
            return Err(not_animated("add_frame"));
        };
        let index = if position < 0 {
            a.frames.push(tex);
            a.frames.len()
        } else {
            let i = position as usize;
            a.frames.insert(i.min(a.frames.len()), tex);
            i
        };
        self.modified(dst, true)?;
        Ok(index)
    }

    /// Remove the frame at `position` (negative = last). An animation left with one frame
    /// becomes a static bitmap.
    pub fn remove_frame(&mut self, id: BitmapId, position: i32) -> BitmapResult<()> {
        let data = slot_data_mut(&mut self.slots, id)?;
        let Backing::Animated(a) = &mut data.backing else {
            return Err(not_animated("remove_frame"));
        };
        let n = a.frames.len();
        if n <= 1 {
            return Err(BitmapError::unsupported(
                "an animation keeps at least one frame",
            ));
        }
        let i = if position < 0 {
            n - 1
        } else {
            (position as usize).min(n - 1)
        };
        let removed = a.frames.remove(i);
        a.seq.clamp_to(n - 1);
        if data.backing.demote() {
            let full = data.rect();
            data.tainted.add(full);
            tracing::debug!(?id, "animation converted to a static bitmap");
        }
        self.device.release(removed);
        self.modified(id, true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitmap/frames.rs"]
mod tests;

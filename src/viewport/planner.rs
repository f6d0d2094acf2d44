use kurbo::{Affine, Rect, Vec2};
use smallvec::SmallVec;

use crate::foundation::core::{IntRect, Vec2i};
use crate::foundation::math::{round_i32, wrap_range};
use crate::viewport::params::{ChildParams, ChildReport, ConsumerKind};

/// `(destination in child, source in parent)` pairs to stretch-blit after clearing the child.
pub type ChildBlits = SmallVec<[(IntRect, IntRect); 4]>;

/// Outcome of one planning step.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildPlan {
    /// What the consumer should draw with.
    pub report: ChildReport,
    /// Re-render work; empty when the child content is still valid.
    pub blits: ChildBlits,
}

/// Inspectable planner state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildState {
    /// Top-left of the window the child shows, relative to the displayed source rectangle.
    pub parent_pos: Vec2i,
    /// Shrink factor the child content was last rendered with.
    pub shrink: Vec2,
    /// `true` until the next re-render.
    pub dirty: bool,
}

fn clamp_i(v: i32, lo: i32, hi: i32) -> i32 {
    v.min(hi).max(lo)
}

fn ceil_i32(v: f64) -> i32 {
    v.ceil() as i32
}

/// Bounding box of `rect` rotated by `degrees` around the origin, snapped outward.
fn rotated_bbox(rect: Rect, degrees: f64) -> IntRect {
    let bb = Affine::rotate(degrees.to_radians()).transform_rect_bbox(rect);
    let x0 = bb.x0.floor() as i32;
    let y0 = bb.y0.floor() as i32;
    IntRect::new(
        x0,
        y0,
        bb.x1.ceil() as i32 - x0,
        bb.y1.ceil() as i32 - y0,
    )
}

/// Viewport state of one child bitmap over a mega parent.
#[derive(Clone, Debug)]
pub struct ChildViewport {
    parent_w: i32,
    parent_h: i32,
    child_w: i32,
    child_h: i32,
    parent_pos: Vec2i,
    base_rect: IntRect,
    old_src_rect: IntRect,
    old_vr: Option<IntRect>,
    old_off: Vec2i,
    dirty: bool,
    max_shrink: Vec2,
    current_shrink: Vec2,
    mirrored: bool,
    report: ChildReport,
}

impl ChildViewport {
    /// Planner for a `child_w` x `child_h` child of a `parent_w` x `parent_h` parent.
    pub fn new(parent_w: i32, parent_h: i32, child_w: i32, child_h: i32) -> Self {
        let full = IntRect::from_size(parent_w, parent_h);
        Self {
            parent_w,
            parent_h,
            child_w,
            child_h,
            parent_pos: Vec2i::default(),
            base_rect: full,
            old_src_rect: full,
            old_vr: None,
            old_off: Vec2i::default(),
            dirty: true,
            max_shrink: Vec2::new(
                f64::from(child_w) / f64::from(parent_w.max(1)),
                f64::from(child_h) / f64::from(parent_h.max(1)),
            ),
            current_shrink: Vec2::new(1.0, 1.0),
            mirrored: false,
            report: ChildReport {
                src_rect: full,
                ..ChildReport::default()
            },
        }
    }

    /// Force a re-render on the next plan; called whenever the parent changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Current pan position and shrink.
    pub fn state(&self) -> ChildState {
        ChildState {
            parent_pos: self.parent_pos,
            shrink: self.current_shrink,
            dirty: self.dirty,
        }
    }

    /// Last report handed to the consumer.
    pub fn report(&self) -> ChildReport {
        self.report
    }

    fn hide(&mut self) -> ChildPlan {
        self.report.visible = false;
        self.old_vr = None;
        ChildPlan {
            report: self.report,
            blits: ChildBlits::new(),
        }
    }

    /// Decide what the child must show for `p` on a `screen_w` x `screen_h` screen.
    pub fn plan(&mut self, p: &ChildParams, screen_w: i32, screen_h: i32) -> ChildPlan {
        let is_window = p.kind == ConsumerKind::Window;
        let is_sprite = p.kind == ConsumerKind::Sprite;
        let wrap = p.wraps();

        if p.zoom.x == 0.0 || p.zoom.y == 0.0 {
            return self.hide();
        }
        let zoom = if is_window {
            Vec2::new(1.0, 1.0)
        } else {
            Vec2::new(p.zoom.x.abs(), p.zoom.y.abs())
        };

        let Some(mut viewport) = IntRect::from_size(screen_w, screen_h).intersect(p.scene_rect)
        else {
            self.report.zoom = zoom;
            return self.hide();
        };
        if is_window {
            let anchored = IntRect::new(p.scene_rect.x, p.scene_rect.y, viewport.w, viewport.h);
            let window = IntRect::new(
                p.x + anchored.x - p.scene_orig.x,
                p.y + anchored.y - p.scene_orig.y,
                p.width,
                p.height,
            );
            let Some(clip) = anchored.intersect(window) else {
                return self.hide();
            };
            viewport = IntRect::new(window.x.min(0), window.y.min(0), clip.w, clip.h);
        }

        let mut update = self.dirty;
        let mut vr = viewport;
        let mut shrink = Vec2::new(1.0, 1.0);

        let mut src = p.src_rect;
        if is_sprite {
            if p.src_rect.x < 0 {
                src.w += p.src_rect.x;
            }
            if p.src_rect.y < 0 {
                src.h += p.src_rect.y;
            }
            src.x = src.x.clamp(0, self.parent_w);
            src.y = src.y.clamp(0, self.parent_h);
            src.w = clamp_i(src.w, 0, self.parent_w - src.x);
            src.h = clamp_i(src.h, 0, self.parent_h - src.y);
        }
        if src.w <= 0 || src.h <= 0 {
            return self.hide();
        }

        let origin = Vec2i::new(
            p.x - p.scene_orig.x + p.scene_rect.x.min(0),
            p.y - p.scene_orig.y + p.scene_rect.y.min(0),
        );

        if is_window {
            self.report.zoom = p.zoom;
        } else {
            vr.x = origin.x;
            vr.y = origin.y;
            if p.angle != 0.0 {
                let local = Rect::new(
                    f64::from(-origin.x),
                    f64::from(-origin.y),
                    f64::from(vr.w - origin.x),
                    f64::from(vr.h - origin.y),
                );
                let bb = rotated_bbox(local, p.angle);
                vr = IntRect::new(-bb.x, -bb.y, bb.w, bb.h);
            }
            if p.wave_amp > 0 {
                vr.x += p.wave_amp + 1;
                vr.w += p.wave_amp * 2 + 2;
            }

            let max_shrink = if is_sprite {
                Vec2::new(
                    (f64::from(self.child_w) / f64::from(src.w)).min(1.0),
                    (f64::from(self.child_h) / f64::from(src.h)).min(1.0),
                )
            } else {
                Vec2::new(self.max_shrink.x.min(1.0), self.max_shrink.y.min(1.0))
            };
            shrink.x = (f64::from(self.child_w.min(src.w)) * zoom.x / f64::from(vr.w.max(1)))
                .clamp(max_shrink.x, 1.0);
            shrink.y = (f64::from(self.child_h.min(src.h)) * zoom.y / f64::from(vr.h.max(1)))
                .clamp(max_shrink.y, 1.0);

            self.report.zoom = Vec2::new(zoom.x / shrink.x, zoom.y / shrink.y);
            if shrink != self.current_shrink {
                update = true;
            }

            vr.x = round_i32(f64::from(vr.x) / zoom.x);
            vr.y = round_i32(f64::from(vr.y) / zoom.y);
            vr.w = ceil_i32(f64::from(vr.w) / zoom.x);
            vr.h = ceil_i32(f64::from(vr.h) / zoom.y);
            if wrap {
                vr.x = -wrap_range(-vr.x, src.w);
                vr.y = -wrap_range(-vr.y, src.h);
            }
        }

        let mut real_o = p.offset;
        if is_sprite {
            if p.src_rect.x < 0 {
                real_o.x += p.src_rect.x;
            }
            if p.src_rect.y < 0 {
                real_o.y += p.src_rect.y;
            }
        }

        if !update
            && self.old_vr == Some(vr)
            && self.old_off == real_o
            && (wrap || (self.mirrored == p.mirrored && p.src_rect == self.old_src_rect))
        {
            return ChildPlan {
                report: self.report,
                blits: ChildBlits::new(),
            };
        }
        self.old_off = real_o;
        self.old_vr = Some(vr);

        if !wrap {
            // Visible part of the consumer's local space against where the source sits in it.
            let local_visible = IntRect::new(-vr.x, -vr.y, vr.w, vr.h);
            let local_src = IntRect::new(-real_o.x, -real_o.y, src.w, src.h);
            if !local_visible.intersects(local_src) {
                return self.hide();
            }
            if p.angle != 0.0 && !is_window {
                // The rotated viewport's bounding box admits corner triangles; rotating the
                // source instead and testing it against the real viewport rules those out.
                let scaled = Rect::new(
                    (f64::from(-real_o.x) * zoom.x).floor(),
                    (f64::from(-real_o.y) * zoom.y).floor(),
                    (f64::from(-real_o.x) * zoom.x).floor() + (f64::from(src.w) * zoom.x).ceil(),
                    (f64::from(-real_o.y) * zoom.y).floor() + (f64::from(src.h) * zoom.y).ceil(),
                );
                let bb = rotated_bbox(scaled, -p.angle);
                let on_screen = IntRect::new(bb.x + origin.x, bb.y + origin.y, bb.w, bb.h);
                if !IntRect::from_size(viewport.w, viewport.h).intersects(on_screen) {
                    return self.hide();
                }
            }
        }

        self.report.visible = true;

        let self_w = round_i32(f64::from(self.child_w) / shrink.x);
        let self_h = round_i32(f64::from(self.child_h) / shrink.y);
        let overflow_x = (self_w - vr.w).max(0);
        let overflow_y = (self_h - vr.h).max(0);

        let min_ox = self.parent_pos.x;
        let min_oy = self.parent_pos.y;
        let max_ox = min_ox + overflow_x;
        let max_oy = min_oy + overflow_y;
        let max_ox2 = wrap_range(max_ox, src.w);
        let max_oy2 = wrap_range(max_oy, src.h);

        let mut adj_ox = real_o.x - vr.x;
        let mut adj_oy = real_o.y - vr.y;
        if wrap {
            adj_ox = wrap_range(adj_ox, src.w);
            adj_oy = wrap_range(adj_oy, src.h);
        }

        // Two passes: moving one axis forces the other to be recentred as well.
        let mut npp = self.parent_pos;
        for _ in 0..2 {
            if update
                || (adj_ox < min_ox && (!wrap || max_ox2 == max_ox || adj_ox > max_ox2))
                || adj_ox > max_ox
            {
                npp.x = if self_w >= src.w {
                    0
                } else {
                    adj_ox - overflow_x / 2
                };
                npp.x = if wrap {
                    wrap_range(npp.x, src.w)
                } else {
                    clamp_i(npp.x, 0, (src.w - self_w).max(0))
                };
            }
            if update
                || (adj_oy < min_oy && (!wrap || max_oy2 == max_oy || adj_oy > max_oy2))
                || adj_oy > max_oy
            {
                npp.y = if self_h >= src.h {
                    0
                } else {
                    adj_oy - overflow_y / 2
                };
                npp.y = if wrap {
                    wrap_range(npp.y, src.h)
                } else {
                    clamp_i(npp.y, 0, (src.h - self_h).max(0))
                };
            }
            if update {
                self.parent_pos = npp;
            }
            if npp != self.parent_pos {
                update = true;
            } else {
                break;
            }
        }

        match p.kind {
            ConsumerKind::Window => {
                self.report.offset = Vec2::new(
                    f64::from(real_o.x - npp.x),
                    f64::from(real_o.y - npp.y),
                );
            }
            ConsumerKind::Plane => {
                let ox = wrap_range(real_o.x - npp.x - vr.x, src.w);
                let oy = wrap_range(real_o.y - npp.y - vr.y, src.h);
                self.report.offset = Vec2::new(
                    f64::from(ox) * zoom.x - f64::from(p.scene_orig.x)
                        + f64::from(p.scene_rect.x.min(0)),
                    f64::from(oy) * zoom.y - f64::from(p.scene_orig.y)
                        + f64::from(p.scene_rect.y.min(0)),
                );
            }
            ConsumerKind::Sprite => {
                if !update && self.old_src_rect != p.src_rect {
                    if self.base_rect.encloses(src) {
                        let rel = IntRect::new(
                            p.src_rect.x - self.base_rect.x,
                            p.src_rect.y - self.base_rect.y,
                            p.src_rect.w,
                            p.src_rect.h,
                        );
                        self.report.src_rect = IntRect::new(
                            (f64::from(rel.x) * shrink.x).floor() as i32,
                            (f64::from(rel.y) * shrink.y).floor() as i32,
                            round_i32(f64::from(rel.w) * shrink.x),
                            round_i32(f64::from(rel.h) * shrink.y),
                        );
                    } else {
                        update = true;
                    }
                }
                self.report.offset = Vec2::new(
                    f64::from(p.offset.x) * shrink.x,
                    f64::from(p.offset.y) * shrink.y,
                );
                if p.mirrored {
                    npp.x = (src.w - self_w).max(0) - npp.x;
                }
                if self.mirrored != p.mirrored && self_w != src.w {
                    update = true;
                }
                self.mirrored = p.mirrored;
            }
        }
        self.old_src_rect = p.src_rect;

        let mut blits = ChildBlits::new();
        if update {
            let mut base = IntRect::new(
                npp.x + src.x,
                npp.y + src.y,
                self_w.min(src.w - npp.x),
                self_h.min(src.h - npp.y),
            );
            if is_sprite {
                let dw = self_w - base.w;
                let dh = self_h - base.h;
                if dw != 0 {
                    base.x = clamp_i(
                        base.x - ceil_i32(f64::from(dw) / 2.0),
                        0,
                        self.parent_w - self_w,
                    );
                    base.w = self_w;
                }
                if dh != 0 {
                    base.y = clamp_i(
                        base.y - ceil_i32(f64::from(dh) / 2.0),
                        0,
                        self.parent_h - self_h,
                    );
                    base.h = self_h;
                }
                let sr = p.src_rect;
                let x = if src.w > base.w && self.mirrored {
                    let overhang = (sr.x + sr.w) - (base.x + base.w);
                    f64::from(sr.x.min(0) - overhang) * shrink.x
                } else {
                    f64::from(sr.x - base.x) * shrink.x
                };
                self.report.src_rect = IntRect::new(
                    x as i32,
                    (f64::from(sr.y - base.y) * shrink.y) as i32,
                    (f64::from(sr.w) * shrink.x) as i32,
                    (f64::from(sr.h) * shrink.y) as i32,
                );
                self.base_rect = base;
            }

            let bw = round_i32(f64::from(base.w) * shrink.x);
            let bh = round_i32(f64::from(base.h) * shrink.y);
            blits.push((IntRect::new(0, 0, bw, bh), base));
            let wrap_x = wrap && base.w < self_w;
            let wrap_y = wrap && base.h < self_h;
            if wrap_x {
                blits.push((
                    IntRect::new(bw, 0, self.child_w - bw, bh),
                    IntRect::new(src.x, base.y, self_w - base.w, base.h),
                ));
            }
            if wrap_y {
                blits.push((
                    IntRect::new(0, bh, bw, self.child_h - bh),
                    IntRect::new(base.x, src.y, base.w, self_h - base.h),
                ));
            }
            if wrap_x && wrap_y {
                blits.push((
                    IntRect::new(bw, bh, self.child_w - bw, self.child_h - bh),
                    IntRect::new(src.x, src.y, self_w - base.w, self_h - base.h),
                ));
            }

            self.dirty = false;
            self.current_shrink = shrink;
        }

        ChildPlan {
            report: self.report,
            blits,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/planner.rs"]
mod tests;

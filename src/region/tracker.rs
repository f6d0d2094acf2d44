use smallvec::SmallVec;

use crate::foundation::core::IntRect;
use crate::region::coord::RegionCoord;

/// Half-open box `[x1, x2) x [y1, y2)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionBox<C> {
    /// Inclusive left edge.
    pub x1: C,
    /// Inclusive top edge.
    pub y1: C,
    /// Exclusive right edge.
    pub x2: C,
    /// Exclusive bottom edge.
    pub y2: C,
}

impl<C: RegionCoord> RegionBox<C> {
    fn from_rect(rect: IntRect) -> Option<Self> {
        let n = rect.normalized();
        let x1 = i64::from(n.x);
        let y1 = i64::from(n.y);
        let b = Self {
            x1: C::saturating_from(x1),
            y1: C::saturating_from(y1),
            x2: C::saturating_from(x1 + i64::from(n.w)),
            y2: C::saturating_from(y1 + i64::from(n.h)),
        };
        (!b.is_empty()).then_some(b)
    }

    fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    fn area(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        (self.x2.widen() - self.x1.widen()) * (self.y2.widen() - self.y1.widen())
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        let b = Self {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        (!b.is_empty()).then_some(b)
    }

    /// `self` minus `cut`, as up to four disjoint boxes.
    fn minus(&self, cut: &Self) -> SmallVec<[Self; 4]> {
        let mut out = SmallVec::new();
        let Some(i) = self.intersection(cut) else {
            out.push(*self);
            return out;
        };
        if self.y1 < i.y1 {
            out.push(Self {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: i.y1,
            });
        }
        if i.y2 < self.y2 {
            out.push(Self {
                x1: self.x1,
                y1: i.y2,
                x2: self.x2,
                y2: self.y2,
            });
        }
        if self.x1 < i.x1 {
            out.push(Self {
                x1: self.x1,
                y1: i.y1,
                x2: i.x1,
                y2: i.y2,
            });
        }
        if i.x2 < self.x2 {
            out.push(Self {
                x1: i.x2,
                y1: i.y1,
                x2: self.x2,
                y2: i.y2,
            });
        }
        out
    }

    fn try_merge(&self, other: &Self) -> Option<Self> {
        if self.y1 == other.y1 && self.y2 == other.y2 {
            if self.x2 == other.x1 {
                return Some(Self {
                    x2: other.x2,
                    ..*self
                });
            }
            if other.x2 == self.x1 {
                return Some(Self {
                    x1: other.x1,
                    ..*self
                });
            }
        }
        if self.x1 == other.x1 && self.x2 == other.x2 {
            if self.y2 == other.y1 {
                return Some(Self {
                    y2: other.y2,
                    ..*self
                });
            }
            if other.y2 == self.y1 {
                return Some(Self {
                    y1: other.y1,
                    ..*self
                });
            }
        }
        None
    }
}

/// How a rectangle relates to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    /// No pixel of the rectangle is in the region.
    Out,
    /// Some, but not all, pixels are in the region.
    Part,
    /// Every pixel of the rectangle is in the region.
    In,
}

/// Disjoint union of boxes with coordinate width `C`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region<C> {
    boxes: Vec<RegionBox<C>>,
}

impl<C: RegionCoord> Region<C> {
    /// Empty region.
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Boxes currently making up the region.
    pub fn boxes(&self) -> &[RegionBox<C>] {
        &self.boxes
    }

    /// `true` when no pixel is tracked.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Number of tracked pixels.
    pub fn area(&self) -> i64 {
        self.boxes.iter().map(RegionBox::area).sum()
    }

    /// Drop every tracked box.
    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    /// Union `rect` (normalized first) into the region.
    pub fn add(&mut self, rect: IntRect) {
        let Some(b) = RegionBox::<C>::from_rect(rect) else {
            return;
        };
        let mut pieces: Vec<RegionBox<C>> = vec![b];
        for existing in &self.boxes {
            if pieces.is_empty() {
                break;
            }
            let mut next = Vec::with_capacity(pieces.len());
            for p in &pieces {
                next.extend(p.minus(existing));
            }
            pieces = next;
        }
        if pieces.is_empty() {
            return;
        }
        self.boxes.extend(pieces);
        self.coalesce();
    }

    /// Remove `rect` from the region. Rectangles that miss the region are ignored early.
    pub fn subtract(&mut self, rect: IntRect) {
        if self.overlap(rect) == Overlap::Out {
            return;
        }
        let Some(cut) = RegionBox::<C>::from_rect(rect) else {
            return;
        };
        let mut out = Vec::with_capacity(self.boxes.len() + 4);
        for b in &self.boxes {
            out.extend(b.minus(&cut));
        }
        self.boxes = out;
        self.coalesce();
    }

    /// Classify `rect` (normalized first) against the region.
    pub fn overlap(&self, rect: IntRect) -> Overlap {
        let Some(query) = RegionBox::<C>::from_rect(rect) else {
            return Overlap::Out;
        };
        let covered: i64 = self
            .boxes
            .iter()
            .filter_map(|b| b.intersection(&query))
            .map(|b| b.area())
            .sum();
        if covered == 0 {
            Overlap::Out
        } else if covered == query.area() {
            Overlap::In
        } else {
            Overlap::Part
        }
    }

    /// `true` when any part of `rect` lies in the region.
    pub fn touches(&self, rect: IntRect) -> bool {
        self.overlap(rect) != Overlap::Out
    }

    fn coalesce(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.boxes.len() {
                for j in (i + 1)..self.boxes.len() {
                    if let Some(m) = self.boxes[i].try_merge(&self.boxes[j]) {
                        self.boxes[i] = m;
                        self.boxes.swap_remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/region/tracker.rs"]
mod tests;

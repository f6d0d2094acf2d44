//! Frame selection for animated bitmaps.

pub(crate) mod sequencer;

pub use sequencer::Sequencer;

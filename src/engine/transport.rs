//! Playback state and the moving cursor.

/// Whether the cursor is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// The playback cursor, measured in sub-steps across the grid.
///
/// Each tick while playing moves the cursor one sub-step, wrapping at the
/// grid's full width. A column becomes eligible to trigger exactly one
/// sub-step after the cursor passes its left edge, not on the edge itself;
/// that one-tick offset is part of the audible timing and is kept as is.
#[derive(Debug)]
pub struct Transport {
    state: PlaybackState,
    /// Cursor position in sub-steps, in `0..=columns * substeps_per_cell`.
    position: usize,
    columns: usize,
    substeps_per_cell: usize,
}

impl Transport {
    pub fn new(columns: usize, substeps_per_cell: usize) -> Self {
        Self {
            state: PlaybackState::Stopped,
            position: 0,
            columns,
            substeps_per_cell,
        }
    }

    /// Flip between playing and stopped.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            PlaybackState::Stopped => PlaybackState::Playing,
            PlaybackState::Playing => PlaybackState::Stopped,
        };
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Move the cursor one sub-step; no-op while stopped.
    pub fn advance(&mut self) {
        if !self.is_playing() {
            return;
        }
        if self.position == self.columns * self.substeps_per_cell {
            self.position = 0;
        }
        self.position += 1;
    }

    /// The column whose trigger point the cursor sits on this tick, if any.
    ///
    /// The trigger point of column `c` is one sub-step past its left edge, so
    /// a freshly started transport fires column 0 on its first tick.
    pub fn trigger_column(&self) -> Option<usize> {
        if !self.is_playing() {
            return None;
        }
        if self.position % self.substeps_per_cell == 1 {
            Some((self.position - 1) / self.substeps_per_cell)
        } else {
            None
        }
    }

    /// Rewind the cursor to the grid's left edge. Playback state is kept.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Cursor position in sub-steps.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The column the cursor currently sits in, for display.
    pub fn cursor_column(&self) -> usize {
        (self.position / self.substeps_per_cell).min(self.columns.saturating_sub(1))
    }
}

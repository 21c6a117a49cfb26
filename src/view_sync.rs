//! Keeps the verse list scrolled to whatever is playing.
//!
//! Offsets are positions in the visible subset (the rows the list actually
//! draws); the playing index is a row index into the full chapter.

/// Rows moved per tick while animating toward a target.
pub const DEFAULT_STEP: usize = 3;

#[derive(Debug, Clone)]
pub struct ViewSync {
    offset: usize,
    target: Option<usize>,
    last_index: Option<usize>,
    step: usize,
}

impl Default for ViewSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSync {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP)
    }

    pub fn with_step(step: usize) -> Self {
        Self {
            offset: 0,
            target: None,
            last_index: None,
            step: step.max(1),
        }
    }

    /// First visible-subset position drawn at the top of the viewport.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Report the playback index. Only a change to a new row starts a
    /// scroll; repeating the same index or going idle does nothing.
    /// Returns true if an animation was started.
    pub fn observe(&mut self, index: Option<usize>, visible: &[usize], height: usize) -> bool {
        if index == self.last_index {
            return false;
        }
        self.last_index = index;

        let Some(index) = index else {
            return false;
        };
        let Ok(position) = visible.binary_search(&index) else {
            tracing::debug!("Row {} is filtered out, not scrolling", index);
            return false;
        };

        let target = centered_offset(position, visible.len(), height);
        if target == self.offset {
            self.target = None;
            return false;
        }
        self.target = Some(target);
        true
    }

    /// Move one step toward the target. Returns true if the offset changed.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        if self.offset < target {
            self.offset = (self.offset + self.step).min(target);
        } else {
            self.offset = self.offset.saturating_sub(self.step).max(target);
        }
        if self.offset == target {
            self.target = None;
        }
        true
    }

    /// The user scrolled: stop animating and keep `position` on screen,
    /// moving as little as possible.
    pub fn scroll_into_view(&mut self, position: usize, height: usize) {
        self.target = None;
        if height == 0 {
            return;
        }
        if position < self.offset {
            self.offset = position;
        } else if position >= self.offset + height {
            self.offset = position + 1 - height;
        }
    }

    /// Keep the offset valid after the visible subset or viewport shrank.
    pub fn clamp(&mut self, len: usize, height: usize) {
        let max = len.saturating_sub(height);
        self.offset = self.offset.min(max);
        if let Some(target) = self.target {
            self.target = Some(target.min(max));
        }
    }

    /// Forget everything, for a freshly loaded chapter.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.target = None;
        self.last_index = None;
    }
}

/// Offset that puts `position` in the middle of a `height`-row viewport,
/// without scrolling past either end of a list of `len` rows.
pub fn centered_offset(position: usize, len: usize, height: usize) -> usize {
    let max = len.saturating_sub(height);
    position.saturating_sub(height / 2).min(max)
}

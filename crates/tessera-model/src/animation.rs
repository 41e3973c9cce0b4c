//! Animation Modes
//!
//! Named ranges over a model's frame indices with playback speed and loop
//! flag. Mode 0 is mandatory and acts as the universal fallback: requests
//! for an absent mode resolve to it, and invalid modes are rejected at
//! insertion time so they can never corrupt the fallback.

use ahash::AHashMap;

/// The fallback animation mode, always present
pub const DEFAULT_MODE: i32 = 0;

/// A playable range of frame indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationMode {
    /// First frame of the range
    pub start: usize,
    /// Last frame of the range (inclusive)
    pub end: usize,
    /// Playback speed in frames per second
    pub speed: f32,
    /// Whether playback wraps around
    pub looping: bool,
}

impl AnimationMode {
    /// Create a mode over an inclusive frame range
    pub fn new(start: usize, end: usize, speed: f32, looping: bool) -> Self {
        Self {
            start,
            end,
            speed,
            looping,
        }
    }

    /// Whether the bounds and speed are usable
    pub fn is_valid(&self) -> bool {
        self.end >= self.start && self.speed >= 0.0
    }
}

/// Mode table with a guaranteed fallback at [`DEFAULT_MODE`]
#[derive(Debug, Clone)]
pub struct AnimationTable {
    modes: AHashMap<i32, AnimationMode>,
    /// Whether a loader explicitly provided the fallback mode
    explicit_default: bool,
}

impl AnimationTable {
    /// Create a table whose fallback mode spans `frame_count` frames
    pub fn new(frame_count: usize) -> Self {
        let mut modes = AHashMap::new();
        let end = frame_count.saturating_sub(1);
        modes.insert(DEFAULT_MODE, AnimationMode::new(0, end, 1.0, true));
        Self {
            modes,
            explicit_default: false,
        }
    }

    /// Re-span the implicit fallback mode over the final frame count.
    ///
    /// Called when a model finishes loading; a fallback the loader provided
    /// explicitly is left alone.
    pub(crate) fn reset_fallback_span(&mut self, frame_count: usize) {
        if !self.explicit_default {
            let end = frame_count.saturating_sub(1);
            self.modes
                .insert(DEFAULT_MODE, AnimationMode::new(0, end, 1.0, true));
        }
    }

    /// Insert or replace a mode.
    ///
    /// Invalid bounds (end before start, negative speed) are rejected with
    /// an error log and leave the table untouched.
    pub fn insert(&mut self, mode: i32, range: AnimationMode) -> bool {
        if !range.is_valid() {
            log::error!(
                "rejecting animation mode {mode}: frames {}..={} speed {}",
                range.start,
                range.end,
                range.speed
            );
            return false;
        }
        if mode == DEFAULT_MODE {
            self.explicit_default = true;
        }
        self.modes.insert(mode, range);
        true
    }

    /// Look up a mode, falling back to [`DEFAULT_MODE`] when absent
    pub fn get(&self, mode: i32) -> AnimationMode {
        self.modes
            .get(&mode)
            .or_else(|| self.modes.get(&DEFAULT_MODE))
            .copied()
            .unwrap_or(AnimationMode::new(0, 0, 1.0, true))
    }

    /// Whether a mode is explicitly present (no fallback)
    pub fn contains(&self, mode: i32) -> bool {
        self.modes.contains_key(&mode)
    }

    /// Number of registered modes, including the fallback
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Always false: the fallback mode is ever-present
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_mode_always_present() {
        let table = AnimationTable::new(10);
        assert!(table.contains(DEFAULT_MODE));
        let mode = table.get(DEFAULT_MODE);
        assert_eq!((mode.start, mode.end), (0, 9));
        assert!(mode.looping);
    }

    #[test]
    fn test_absent_mode_falls_back() {
        let mut table = AnimationTable::new(4);
        table.insert(2, AnimationMode::new(1, 3, 2.0, false));
        assert_eq!(table.get(7), table.get(DEFAULT_MODE));
        assert_ne!(table.get(2), table.get(DEFAULT_MODE));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut table = AnimationTable::new(4);
        assert!(!table.insert(1, AnimationMode::new(3, 1, 1.0, true)));
        assert!(!table.insert(1, AnimationMode::new(0, 2, -1.0, true)));
        assert!(!table.contains(1));
        // The fallback is untouched even when mode 0 itself is given
        // invalid bounds.
        assert!(!table.insert(DEFAULT_MODE, AnimationMode::new(5, 2, 1.0, true)));
        assert_eq!(table.get(DEFAULT_MODE).start, 0);
    }

    #[test]
    fn test_reset_fallback_span() {
        let mut table = AnimationTable::new(0);
        table.reset_fallback_span(12);
        assert_eq!(table.get(DEFAULT_MODE).end, 11);

        // An explicit fallback survives the re-span.
        table.insert(DEFAULT_MODE, AnimationMode::new(2, 6, 1.0, false));
        table.reset_fallback_span(30);
        assert_eq!(table.get(DEFAULT_MODE).end, 6);
    }

    #[test]
    fn test_valid_override_of_default() {
        let mut table = AnimationTable::new(10);
        assert!(table.insert(DEFAULT_MODE, AnimationMode::new(0, 4, 0.5, true)));
        assert_eq!(table.get(DEFAULT_MODE).end, 4);
    }
}

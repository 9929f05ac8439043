//! Deterministic sponsor rotation
//!
//! Picks and orders entries from a list using only the current UTC date and
//! 10-minute window of the day. Every caller looking at the same window gets the
//! same answer, so independent clients agree without talking to each other.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// Length of a rotation slot in minutes
pub const SLOT_MINUTES: u32 = 10;

/// Number of slots in a UTC day
pub const SLOTS_PER_DAY: u32 = 24 * 60 / SLOT_MINUTES;

/// The time-derived inputs to both rotation algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeKey {
    /// `year * 10000 + month * 100 + day` of the UTC date
    pub day_seed: u32,
    /// Index of the 10-minute window within the UTC day, `0..SLOTS_PER_DAY`
    pub slot: u32,
}

impl TimeKey {
    /// Derives the key for an instant from its UTC date and time of day.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use sponsor_rotation::rotation::TimeKey;
    ///
    /// let key = TimeKey::at(Utc.with_ymd_and_hms(2024, 3, 15, 1, 10, 0).unwrap());
    /// assert_eq!(key.day_seed, 20240315);
    /// assert_eq!(key.slot, 7);
    /// ```
    pub fn at<Tz: TimeZone>(now: DateTime<Tz>) -> Self {
        let now = now.with_timezone(&Utc);
        // Years before 0 CE don't occur on real clocks.
        let year = now.year().max(0) as u32;
        let day_seed = year * 10_000 + now.month() * 100 + now.day();
        let slot = (now.hour() * 60 + now.minute()) / SLOT_MINUTES;
        Self { day_seed, slot }
    }

    /// Start offset for single-pick selection
    fn pick_index(self, len: usize) -> usize {
        let len = len as u64;
        let start = u64::from(self.day_seed) % len;
        ((start + u64::from(self.slot)) % len) as usize
    }

    /// Start offset for list rotation
    fn rotate_index(self, len: usize) -> usize {
        ((u64::from(self.day_seed) + u64::from(self.slot)) % len as u64) as usize
    }
}

/// Picks one entry for the current window, or `None` if `items` is empty.
///
/// The pick advances by one entry every slot and shifts with the day seed, so
/// over `items.len()` consecutive slots every entry is shown once.
pub fn pick<T>(items: &[T], key: TimeKey) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(key.pick_index(items.len()))
}

/// Left-rotates `items` so a different entry leads each window.
///
/// The result always holds every input entry exactly once.
pub fn rotate<T: Clone>(items: &[T], key: TimeKey) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let start = key.rotate_index(items.len());
    let (head, tail) = items.split_at(start);
    tail.iter().chain(head).cloned().collect()
}

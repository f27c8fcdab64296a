use std::hash::Hash;

use indexmap::IndexMap;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Index of the first bucket holding the largest count. Returns 0 for empty input,
/// so an all-zero histogram resolves to its first bucket.
pub fn first_max_index(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    best
}

/// Occurrence counter that remembers the order keys were first seen in.
#[derive(Debug, Clone)]
pub struct Tally<K: Hash + Eq> {
    counts: IndexMap<K, usize>,
}

impl<K: Hash + Eq> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }

    /// Key with the highest count; among equal counts the one seen first wins.
    pub fn leader(&self) -> Option<(&K, usize)> {
        let mut best: Option<(&K, usize)> = None;
        for (key, &count) in &self.counts {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((key, count));
            }
        }
        best
    }

    pub fn into_leader(self) -> Option<K> {
        let index = self.leader().and_then(|(k, _)| self.counts.get_index_of(k))?;
        self.counts.into_iter().nth(index).map(|(k, _)| k)
    }

    pub fn into_counts(self) -> IndexMap<K, usize> {
        self.counts
    }
}

impl<K: Hash + Eq> Extend<K> for Tally<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<K: Hash + Eq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        tally.extend(iter);
        tally
    }
}

/// Renders seconds as `[D day[s], ]H:MM:SS[.ffffff]`, rounding to microseconds.
///
/// Negative spans borrow a whole day, so -10 seconds renders as `-1 day, 23:59:50`.
pub fn format_elapsed(seconds: f64) -> String {
    let micros = (seconds * MICROS_PER_SECOND as f64).round() as i64;
    let days = micros.div_euclid(MICROS_PER_DAY);
    let rest = micros.rem_euclid(MICROS_PER_DAY);

    let whole = rest / MICROS_PER_SECOND;
    let fraction = rest % MICROS_PER_SECOND;
    let clock = format!("{}:{:02}:{:02}", whole / 3600, whole % 3600 / 60, whole % 60);

    let mut out = if days == 0 {
        clock
    } else {
        let plural = if days.abs() == 1 { "" } else { "s" };
        format!("{days} day{plural}, {clock}")
    };
    if fraction != 0 {
        out.push_str(&format!(".{fraction:06}"));
    }
    out
}

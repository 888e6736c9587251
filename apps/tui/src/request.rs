/// Monotonic token attached to every issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Tracks the latest issued request so late responses can be told apart.
///
/// Only the response carrying the latest generation, while that request is
/// still outstanding, may be committed.
#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    latest: u64,
    outstanding: bool,
}

impl RequestTracker {
    pub fn issue(&mut self) -> Generation {
        self.latest += 1;
        self.outstanding = true;
        Generation(self.latest)
    }

    /// Makes every in-flight response stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.outstanding = false;
    }

    /// Accepts `generation` at most once, and only if it is the latest.
    pub fn accept(&mut self, generation: Generation) -> bool {
        if self.outstanding && generation.0 == self.latest {
            self.outstanding = false;
            true
        } else {
            false
        }
    }

    pub const fn in_flight(&self) -> bool {
        self.outstanding
    }
}

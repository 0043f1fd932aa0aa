//! Scroll monitor: derives "is the last image on screen" from the list's
//! visible range.
//!
//! The derivation itself is a pure function ([`is_at_bottom`]).  The
//! [`ScrollMonitor`] wraps it with change detection so callers can run it on
//! every scroll event and only react when the answer actually flips.

/// `true` iff the last visible item is the final item of a list of `len`.
///
/// An empty list has no last index, so it is never "at bottom".
pub fn is_at_bottom(last_visible: Option<usize>, len: usize) -> bool {
    match (last_visible, len.checked_sub(1)) {
        (Some(last), Some(last_index)) => last == last_index,
        _ => false,
    }
}

/// Result of feeding one scroll snapshot into the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub at_bottom: bool,
    /// The flag differs from the previously reported one (always `true` for
    /// the first observation).
    pub changed: bool,
}

/// Memoized [`is_at_bottom`].
#[derive(Debug, Default, Clone)]
pub struct ScrollMonitor {
    /// Last input and the value derived from it.
    last: Option<((Option<usize>, usize), bool)>,
}

impl ScrollMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current snapshot.  O(1); identical input is answered from
    /// the memo without recomputation and never reports a change.
    pub fn observe(&mut self, last_visible: Option<usize>, len: usize) -> Observation {
        let input = (last_visible, len);
        let previous = match self.last {
            Some((prev_input, value)) if prev_input == input => {
                return Observation {
                    at_bottom: value,
                    changed: false,
                };
            }
            Some((_, value)) => Some(value),
            None => None,
        };

        let at_bottom = is_at_bottom(last_visible, len);
        self.last = Some((input, at_bottom));
        Observation {
            at_bottom,
            changed: previous != Some(at_bottom),
        }
    }

    /// Last derived value (`false` before the first observation).
    pub fn at_bottom(&self) -> bool {
        self.last.map(|(_, v)| v).unwrap_or(false)
    }
}

use std::{cell::Cell, fmt, ops::Deref, rc::Rc};

/// Counts the drops of the values that it tracks
///
/// Values wrapped with [DropProbe::track] report back to the probe when they're dropped, which
/// allows tests to check that a managed object was dropped exactly once, and at the right time.
#[derive(Clone, Debug, Default)]
pub struct DropProbe {
    drops: Rc<Cell<usize>>,
}

impl DropProbe {
    /// Wraps a value so that its drop is counted by the probe
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            drops: self.drops.clone(),
        }
    }

    /// Returns the number of tracked values that have been dropped so far
    pub fn drops(&self) -> usize {
        self.drops.get()
    }
}

/// A value that reports its drop to the [DropProbe] that made it
///
/// Clones are tracked by the same probe.
pub struct Tracked<T> {
    value: T,
    drops: Rc<Cell<usize>>,
}

impl<T> Tracked<T> {
    /// Returns a mutable reference to the wrapped value
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            drops: self.drops.clone(),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_are_counted_per_probe() {
        let probe = DropProbe::default();
        let other_probe = DropProbe::default();

        let a = probe.track(1);
        let b = a.clone();
        let c = other_probe.track(2);

        drop(a);
        assert_eq!(probe.drops(), 1);
        drop(b);
        drop(c);
        assert_eq!(probe.drops(), 2);
        assert_eq!(other_probe.drops(), 1);
    }
}

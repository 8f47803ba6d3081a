//! Single optionally-set configuration value
//!
//! A `Slot` distinguishes "never configured" from "configured", which is what
//! lets layered snapshots merge without an unset layer erasing a resolved value.

/// One tunable value with defined/undefined state.
///
/// `is_set` and `value` are tracked separately: a slot can be explicitly set to
/// "no value" (see [`Slot::set_empty`]), which still blocks lower layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot<T> {
    value: Option<T>,
    is_set: bool,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Slot<T> {
    /// Create an unset slot
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            value: None,
            is_set: false,
        }
    }

    /// Current value, if any
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.is_set
    }

    /// Unconditionally overwrite the value and mark the slot as set.
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.is_set = true;
    }

    /// Mark the slot as set without a value.
    ///
    /// Used when a layer wants to explicitly clear a tunable, e.g. disable a
    /// proxy inherited from a lower layer.
    pub fn set_empty(&mut self) {
        self.value = None;
        self.is_set = true;
    }

    /// Write `value` only if nothing was configured yet.
    pub fn set_if_empty(&mut self, value: T) {
        if !self.is_set {
            self.set(value);
        }
    }
}

impl<T: Clone> Slot<T> {
    /// Copy `other` into `self` only if `other` is set.
    pub fn set_non_empty(&mut self, other: &Slot<T>) {
        if other.is_set {
            self.value = other.value.clone();
            self.is_set = true;
        }
    }

    /// Cloned current value
    #[inline]
    pub fn value(&self) -> Option<T> {
        self.value.clone()
    }
}

impl<T> From<T> for Slot<T> {
    fn from(value: T) -> Self {
        Self {
            value: Some(value),
            is_set: true,
        }
    }
}

//! Sink registry
//!
//! Append-only, ordered collection of [`Sink`]s. Insertion order is dispatch order.
//! Backing storage grows in fixed increments when full; a failed growth leaves the
//! registry exactly as it was.

use crate::config::DEFAULT_REGISTRY_INCREMENT;
use crate::sink::Sink;
use crate::types::RegistryError;

/// Ordered, growable collection of sinks
pub struct Registry {
    sinks: Vec<Sink>,
    capacity: usize,
    increment: usize,
    growth_steps: usize,
}

impl Registry {
    /// Create an empty registry with no preallocated slots
    pub fn new() -> Self {
        Self::with_increment(DEFAULT_REGISTRY_INCREMENT)
    }

    /// Create an empty registry growing by `increment` slots (at least 1)
    pub fn with_increment(increment: usize) -> Self {
        Self {
            sinks: Vec::new(),
            capacity: 0,
            increment: increment.max(1),
            growth_steps: 0,
        }
    }

    /// Create a registry with `capacity` slots preallocated
    pub fn with_capacity(capacity: usize, increment: usize) -> Result<Self, RegistryError> {
        let mut registry = Self::with_increment(increment);
        registry
            .sinks
            .try_reserve_exact(capacity)
            .map_err(|_| RegistryError::AllocationFailure {
                requested: capacity,
            })?;
        registry.capacity = capacity;
        Ok(registry)
    }

    /// Append a sink, growing storage by one increment if the registry is full
    pub fn add(&mut self, sink: Sink) -> Result<(), RegistryError> {
        if self.sinks.len() == self.capacity {
            self.grow()?;
        }
        log::trace!(
            "Registered sink #{} ({:?})",
            self.sinks.len(),
            sink.capabilities()
        );
        self.sinks.push(sink);
        Ok(())
    }

    fn grow(&mut self) -> Result<(), RegistryError> {
        let requested = self
            .capacity
            .checked_add(self.increment)
            .ok_or(RegistryError::AllocationFailure {
                requested: usize::MAX,
            })?;

        self.sinks
            .try_reserve_exact(requested - self.sinks.len())
            .map_err(|_| RegistryError::AllocationFailure { requested })?;

        log::debug!(
            "Sink registry grown from {} to {} slots",
            self.capacity,
            requested
        );
        self.capacity = requested;
        self.growth_steps += 1;
        Ok(())
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True if no sink is registered
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Number of slots currently reserved
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots added per growth step
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Number of times storage has grown since creation
    pub fn growth_steps(&self) -> usize {
        self.growth_steps
    }

    /// Sink at `index` in registration order
    pub fn get(&self, index: usize) -> Option<&Sink> {
        self.sinks.get(index)
    }

    /// Sinks in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, Sink> {
        self.sinks.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.sinks.len())
            .field("capacity", &self.capacity)
            .field("increment", &self.increment)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Sink;
    type IntoIter = std::slice::Iter<'a, Sink>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

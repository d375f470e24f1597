//! In-flight tracking for the surfaces that wait on the assistant.
//!
//! A surface (the chat widget, the admin product form) may have one
//! assistant call outstanding at a time; while it does, its submit action is
//! disabled. Closing the surface invalidates the outstanding call, and a
//! result that arrives afterwards is dropped instead of being applied.
//! Dropping a [`Ticket`] without completing it (a cancelled future, a
//! discarded pending form) releases the surface as well.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A UI surface that can wait on the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Shopper chat widget.
    Chat,
    /// Admin "add product" form.
    ProductForm,
}

/// Proof that a call was started on a surface.
///
/// The surface stays busy for as long as the ticket lives.
#[derive(Debug)]
#[must_use = "dropping a ticket releases the surface immediately"]
pub struct Ticket {
    gate: SurfaceGate,
    surface: Surface,
    generation: u64,
}

impl Ticket {
    /// The surface this ticket belongs to.
    pub const fn surface(&self) -> Surface {
        self.surface
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.gate.release(self.surface, self.generation);
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    generation: u64,
    in_flight: bool,
}

/// Tracks outstanding calls per surface.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct SurfaceGate {
    surfaces: Arc<Mutex<HashMap<Surface, SurfaceState>>>,
}

impl SurfaceGate {
    /// Create a gate with every surface idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a call on `surface`.
    ///
    /// Returns `None` while a previous call on the same surface is still
    /// outstanding.
    pub fn begin(&self, surface: Surface) -> Option<Ticket> {
        let mut surfaces = self.lock();
        let state = surfaces.entry(surface).or_default();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        Some(Ticket {
            gate: self.clone(),
            surface,
            generation: state.generation,
        })
    }

    /// Whether `surface` has a call outstanding.
    #[must_use]
    pub fn is_busy(&self, surface: Surface) -> bool {
        self.lock().get(&surface).is_some_and(|s| s.in_flight)
    }

    /// Close `surface`, abandoning any outstanding call.
    pub fn close(&self, surface: Surface) {
        let mut surfaces = self.lock();
        let state = surfaces.entry(surface).or_default();
        state.generation = state.generation.wrapping_add(1);
        state.in_flight = false;
    }

    /// Finish the call `ticket` was issued for.
    ///
    /// Returns `value` if the surface was not closed since the call began,
    /// otherwise drops it and returns `None`.
    pub fn complete<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        let generation = self.lock().get(&ticket.surface).map_or(0, |s| s.generation);
        if generation != ticket.generation {
            tracing::debug!(surface = ?ticket.surface, "discarding result for closed surface");
            return None;
        }
        // `ticket` drops here and frees the surface.
        Some(value)
    }

    /// Free `surface` if `generation` is still its current call.
    fn release(&self, surface: Surface, generation: u64) {
        let mut surfaces = self.lock();
        if let Some(state) = surfaces.get_mut(&surface).filter(|s| s.generation == generation) {
            state.in_flight = false;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Surface, SurfaceState>> {
        // State is two plain fields; a panic elsewhere cannot leave it torn.
        self.surfaces.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

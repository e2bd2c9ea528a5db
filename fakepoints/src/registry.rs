//! Registry that fakepoint files register their setup callbacks into.
//!
//! The registry is an ordinary value owned by the caller (usually a test
//! harness context), so resetting it between tests is explicit.

use tracing::debug;

type Callback<T> = Box<dyn FnMut() -> Option<T> + Send>;

/// Ordered list of fakepoint callbacks.
pub struct FakepointRegistry<T> {
    callbacks: Vec<Callback<T>>,
}

impl<T> FakepointRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Append a callback. Returning `None` means "nothing to collect".
    pub fn register<F>(&mut self, callback: F)
    where
        F: FnMut() -> Option<T> + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
        debug!("Registered fakepoint #{}", self.callbacks.len());
    }

    /// Call every callback in registration order and collect the values.
    ///
    /// Values are kept as returned; a callback yielding a `Vec` contributes
    /// one element, not its contents.
    pub fn run_all(&mut self) -> Vec<T> {
        let results: Vec<T> = self.callbacks.iter_mut().filter_map(|f| f()).collect();
        debug!(
            "Ran {} fakepoint(s), collected {} result(s)",
            self.callbacks.len(),
            results.len()
        );
        results
    }

    /// Forget every callback.
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T> Default for FakepointRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

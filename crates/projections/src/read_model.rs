//! Read model trait for query-side views.

/// A read model providing query access to denormalized data.
pub trait ReadModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the number of entries, or 0 while the view is being written.
    fn count(&self) -> usize;
}

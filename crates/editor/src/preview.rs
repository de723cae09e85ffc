//! Preview surface contract.

/// Rendering target that reflects the current entity state.
///
/// `redraw` must be idempotent: editors call it once per change event and
/// several widgets may change during one user action.
pub trait Preview {
    fn redraw(&self);
}

impl<F: Fn()> Preview for F {
    fn redraw(&self) {
        self()
    }
}

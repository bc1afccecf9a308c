//! UI component bindings
//!
//! Every UI element that depends on shared state follows the same
//! lifecycle: on activation, read the keys it needs and subscribe to
//! them; on notification, re-derive local state; on deactivation,
//! unsubscribe every handle it acquired. The store guarantees that an
//! unsubscribed handle never fires again, and a binding guarantees it
//! never retains a handle for a key it no longer displays.

use std::sync::Arc;

mod canvas;
mod control_panel;

pub use canvas::{CanvasBinding, ScreenshotSource};
pub use control_panel::ControlPanelBinding;

/// Activation/deactivation contract shared by all bindings
///
/// Bindings are held in `Arc` so their subscriber callbacks can hold weak
/// references back to them; `activate` therefore takes the `Arc` receiver.
pub trait ComponentBinding: Send + Sync {
    /// Binding name, for logs
    fn name(&self) -> &str;

    /// Read initial state and subscribe to the keys this binding displays
    fn activate(self: Arc<Self>);

    /// Unsubscribe every held handle and stop reacting
    ///
    /// In-flight asynchronous work started before deactivation is not
    /// aborted; it checks liveness before touching binding state.
    fn deactivate(&self);

    /// Whether the binding is currently active
    fn is_active(&self) -> bool;
}

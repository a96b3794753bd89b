pub mod host_bus;
pub mod lifecycle;
pub mod tracker;

pub use host_bus::{serve, HostBus, ServeStats};
pub use lifecycle::{run_load_sequence, run_unload_sequence, MessengerPlugin, PluginState};
pub use tracker::{ActivityTrackerPlugin, PLUGIN_NAME};

pub mod allocator;
pub mod data_store;
pub mod descriptor;
pub mod frame;
pub mod key;
pub mod liveness;
pub mod settings;

pub use allocator::{Allocation, KeyAllocator, Observation};
pub use data_store::{DataSnapshot, DataStore};
pub use descriptor::{DescriptorError, PlotOptions, WindowDescriptor, WindowKind};
pub use frame::Frame;
pub use key::WindowKey;
pub use liveness::{LivenessMap, LivenessReport, LivenessView, WindowState};
pub use settings::{load_settings_file, save_settings_file, AgentSettings, SettingsError};

pub mod props;
pub mod registry;
pub mod store;

pub use props::ScreenProps;
pub use registry::{ScreenDescriptor, ScreenName, ScreenRegistry};
pub use store::{FileScreenStore, MemoryScreenStore, ScreenStore};

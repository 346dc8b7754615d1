//! Domain logic - pure version rules independent of manifests and processes

pub mod prerelease;
pub mod version;

pub use prerelease::{PreRelease, DEFAULT_LABEL};
pub use version::{bump, bump_with_label, BumpType, Version};

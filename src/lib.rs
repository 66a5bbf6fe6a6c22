//! Windows Version Helper
//!
//! Classifies a Windows host's edition and version from the attributes a
//! fact collector already attached to its node record.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────────────────┐
//! │   Fact collector output  │      │            VersionHelper             │
//! │   (JSON / YAML / struct) ├─────►│  validate_platform ─► query ─► bool  │
//! │                          │      │                              ─► f64  │
//! │   NodeAttributes         │      │  CoreSku table   ProductType codes   │
//! └──────────────────────────┘      └──────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Typed node attribute record and loaders
//! - [`windows`]: Core SKU table, product types, and the version helper
//! - [`error`]: Error types and handling
//!
//! # Example
//!
//! ```
//! use windows_version_helper::{NodeAttributes, VersionHelper};
//!
//! let helper = VersionHelper::new();
//! let node = NodeAttributes::windows(0x0D, 2, "10.0");
//!
//! assert!(helper.is_core_version(&node).unwrap());
//! assert!(helper.is_server_version(&node).unwrap());
//! assert_eq!(helper.nt_version(&node).unwrap(), 10.0);
//! ```

pub mod domain;
pub mod error;
pub mod windows;

// Re-export commonly used types
pub use domain::node::{KernelAttributes, NodeAttributes, OsInfo, PlatformVersion};

pub use error::{Error, Result, UNSUPPORTED_PLATFORM_MESSAGE};

pub use windows::{
    CoreSku, HelperConfig, ProductType, VersionHelper, VersionParsePolicy,
    WindowsClassification, WINDOWS_PLATFORM,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Node Attributes
//!
//! Typed view over the node record produced by the fact collector.
//! Only the fields the Windows helper reads are modelled; every other key
//! in the serialized record is ignored on load.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

// =============================================================================
// Attribute Paths
// =============================================================================

pub const PLATFORM_VERSION_PATH: &str = "platform_version";
pub const KERNEL_PATH: &str = "kernel";
pub const OS_INFO_PATH: &str = "kernel.os_info";
pub const OPERATING_SYSTEM_SKU_PATH: &str = "kernel.os_info.operating_system_sku";
pub const PRODUCT_TYPE_PATH: &str = "kernel.os_info.product_type";

// =============================================================================
// Platform Version
// =============================================================================

/// Raw `platform_version` value, either as reported text or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlatformVersion {
    Number(f64),
    Text(String),
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformVersion::Number(n) => write!(f, "{}", n),
            PlatformVersion::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PlatformVersion {
    fn from(value: &str) -> Self {
        PlatformVersion::Text(value.to_string())
    }
}

impl From<f64> for PlatformVersion {
    fn from(value: f64) -> Self {
        PlatformVersion::Number(value)
    }
}

// =============================================================================
// Node Record
// =============================================================================

/// `kernel.os_info` as reported on Windows hosts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsInfo {
    /// Windows product SKU code
    #[serde(default)]
    pub operating_system_sku: Option<u32>,
    /// Windows product type code (1 = workstation)
    #[serde(default)]
    pub product_type: Option<u32>,
}

/// `kernel` attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KernelAttributes {
    #[serde(default)]
    pub os_info: Option<OsInfo>,
}

/// Node record owned by the fact collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Operating system family ("windows", "ubuntu", ...)
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub platform_version: Option<PlatformVersion>,
    #[serde(default)]
    pub kernel: Option<KernelAttributes>,
}

impl NodeAttributes {
    /// Build a Windows node from the three facts the helper reads
    pub fn windows(
        operating_system_sku: u32,
        product_type: u32,
        platform_version: impl Into<PlatformVersion>,
    ) -> Self {
        Self {
            platform: Some("windows".to_string()),
            platform_version: Some(platform_version.into()),
            kernel: Some(KernelAttributes {
                os_info: Some(OsInfo {
                    operating_system_sku: Some(operating_system_sku),
                    product_type: Some(product_type),
                }),
            }),
        }
    }

    /// Build a node that only carries a platform
    pub fn with_platform(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            ..Default::default()
        }
    }

    /// Parse a node record from JSON text
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Parse a node record from YAML text
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load a node record from a file.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        debug!(path = %path.display(), yaml = is_yaml, "Loading node attributes");

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Reported platform, if any
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn platform_version(&self) -> Result<&PlatformVersion> {
        self.platform_version
            .as_ref()
            .ok_or_else(|| Error::missing(PLATFORM_VERSION_PATH))
    }

    pub fn os_info(&self) -> Result<&OsInfo> {
        self.kernel
            .as_ref()
            .ok_or_else(|| Error::missing(KERNEL_PATH))?
            .os_info
            .as_ref()
            .ok_or_else(|| Error::missing(OS_INFO_PATH))
    }

    /// `kernel.os_info.operating_system_sku`
    pub fn operating_system_sku(&self) -> Result<u32> {
        self.os_info()?
            .operating_system_sku
            .ok_or_else(|| Error::missing(OPERATING_SYSTEM_SKU_PATH))
    }

    /// `kernel.os_info.product_type`
    pub fn product_type(&self) -> Result<u32> {
        self.os_info()?
            .product_type
            .ok_or_else(|| Error::missing(PRODUCT_TYPE_PATH))
    }
}

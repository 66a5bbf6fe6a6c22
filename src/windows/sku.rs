//! Core SKU Table
//!
//! Product SKU codes of the "Server Core" installation options, as listed
//! for `GetProductInfo` (`PRODUCT_<NAME>_CORE`, prefix and suffix removed).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server Core product SKUs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum CoreSku {
    /// Server Datacenter Core
    DatacenterServer = 0x0C,
    /// Server Datacenter without Hyper-V Core
    DatacenterServerV = 0x27,
    /// Server Enterprise Core
    EnterpriseServer = 0x0E,
    /// Server Enterprise without Hyper-V Core
    EnterpriseServerV = 0x29,
    /// Server Standard Core
    StandardServer = 0x0D,
    /// Server Standard without Hyper-V Core
    StandardServerV = 0x28,
}

impl CoreSku {
    /// Every Core SKU, each code exactly once
    pub const ALL: [CoreSku; 6] = [
        CoreSku::DatacenterServer,
        CoreSku::DatacenterServerV,
        CoreSku::EnterpriseServer,
        CoreSku::EnterpriseServerV,
        CoreSku::StandardServer,
        CoreSku::StandardServerV,
    ];

    /// Vendor SKU code
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Constant name without the `PRODUCT_` prefix and `_CORE` suffix
    pub const fn name(self) -> &'static str {
        match self {
            CoreSku::DatacenterServer => "DATACENTER_SERVER",
            CoreSku::DatacenterServerV => "DATACENTER_SERVER_V",
            CoreSku::EnterpriseServer => "ENTERPRISE_SERVER",
            CoreSku::EnterpriseServerV => "ENTERPRISE_SERVER_V",
            CoreSku::StandardServer => "STANDARD_SERVER",
            CoreSku::StandardServerV => "STANDARD_SERVER_V",
        }
    }

    pub fn from_code(code: u32) -> Option<CoreSku> {
        Self::ALL.iter().copied().find(|sku| sku.code() == code)
    }

    /// Check whether a SKU code is one of the Core installation options
    pub fn contains(code: u32) -> bool {
        Self::from_code(code).is_some()
    }
}

impl fmt::Display for CoreSku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

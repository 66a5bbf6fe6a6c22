//! Product Type
//!
//! Decodes the `wProductType` code reported in `kernel.os_info.product_type`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Workstation product type code (`VER_NT_WORKSTATION`)
pub const VER_NT_WORKSTATION: u32 = 0x1;
/// Domain controller product type code (`VER_NT_DOMAIN_CONTROLLER`)
pub const VER_NT_DOMAIN_CONTROLLER: u32 = 0x2;
/// Server product type code (`VER_NT_SERVER`)
pub const VER_NT_SERVER: u32 = 0x3;

/// Role of a Windows host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Workstation,
    DomainController,
    Server,
    /// Code outside the documented set
    Other(u32),
}

impl ProductType {
    pub fn from_code(code: u32) -> Self {
        match code {
            VER_NT_WORKSTATION => ProductType::Workstation,
            VER_NT_DOMAIN_CONTROLLER => ProductType::DomainController,
            VER_NT_SERVER => ProductType::Server,
            other => ProductType::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            ProductType::Workstation => VER_NT_WORKSTATION,
            ProductType::DomainController => VER_NT_DOMAIN_CONTROLLER,
            ProductType::Server => VER_NT_SERVER,
            ProductType::Other(code) => code,
        }
    }

    pub fn is_workstation(self) -> bool {
        matches!(self, ProductType::Workstation)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Workstation => write!(f, "workstation"),
            ProductType::DomainController => write!(f, "domain_controller"),
            ProductType::Server => write!(f, "server"),
            ProductType::Other(code) => write!(f, "other({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(ProductType::from_code(1), ProductType::Workstation);
        assert_eq!(ProductType::from_code(2), ProductType::DomainController);
        assert_eq!(ProductType::from_code(3), ProductType::Server);
        assert_eq!(ProductType::from_code(0), ProductType::Other(0));
        assert_eq!(ProductType::from_code(7), ProductType::Other(7));
    }

    #[test]
    fn test_code_preserved() {
        for code in 0..16 {
            assert_eq!(ProductType::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_only_workstation_code_is_workstation() {
        assert!(ProductType::from_code(VER_NT_WORKSTATION).is_workstation());
        for code in (0..256).filter(|c| *c != VER_NT_WORKSTATION) {
            assert!(!ProductType::from_code(code).is_workstation());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductType::DomainController.to_string(), "domain_controller");
        assert_eq!(ProductType::Other(9).to_string(), "other(9)");
    }
}

//! Windows Version Helper
//!
//! Answers edition and version questions about a Windows node from the
//! attributes already collected for it: Core installation, workstation
//! or server role, and NT version number.
//!
//! Every query validates the node platform before reading any other
//! attribute, and re-reads the node on each call.

use crate::domain::node::{NodeAttributes, PlatformVersion};
use crate::error::{Error, Result};
use crate::windows::product_type::ProductType;
use crate::windows::sku::CoreSku;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Platform value the helper accepts
pub const WINDOWS_PLATFORM: &str = "windows";

// =============================================================================
// Helper Configuration
// =============================================================================

/// How `platform_version` text is turned into an NT version number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionParsePolicy {
    /// Longest leading decimal number, `0.0` when there is none
    #[default]
    Lenient,
    /// Whole value must be a finite number
    Strict,
}

/// Configuration for the version helper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperConfig {
    pub version_policy: VersionParsePolicy,
}

// =============================================================================
// Classification Result
// =============================================================================

/// All answers for a node at once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowsClassification {
    /// Core installation option
    pub core: bool,
    /// Matching Core SKU, if any
    pub core_sku: Option<CoreSku>,
    pub workstation: bool,
    pub server: bool,
    pub product_type: ProductType,
    pub nt_version: f64,
}

// =============================================================================
// Version Helper
// =============================================================================

/// Classifies Windows nodes by edition and version
#[derive(Debug, Clone, Default)]
pub struct VersionHelper {
    config: HelperConfig,
}

impl VersionHelper {
    /// Create a helper with default config
    pub fn new() -> Self {
        Self {
            config: HelperConfig::default(),
        }
    }

    /// Create a helper with custom config
    pub fn with_config(config: HelperConfig) -> Self {
        Self { config }
    }

    /// Configuration this helper was built with
    pub fn config(&self) -> &HelperConfig {
        &self.config
    }

    /// Determine whether the node runs a Windows Core installation
    pub fn is_core_version(&self, node: &NodeAttributes) -> Result<bool> {
        validate_platform(node)?;

        let sku = node.operating_system_sku()?;
        let core = CoreSku::contains(sku);
        debug!(sku, core, "Classified Core installation");
        Ok(core)
    }

    /// Determine whether the node is a workstation version
    pub fn is_workstation_version(&self, node: &NodeAttributes) -> Result<bool> {
        validate_platform(node)?;

        let product_type = ProductType::from_code(node.product_type()?);
        Ok(product_type.is_workstation())
    }

    /// Determine whether the node is a server version.
    ///
    /// Server and domain controller roles both count as server.
    pub fn is_server_version(&self, node: &NodeAttributes) -> Result<bool> {
        Ok(!self.is_workstation_version(node)?)
    }

    /// Determine the NT version of the node (`"10.0"` gives `10.0`)
    pub fn nt_version(&self, node: &NodeAttributes) -> Result<f64> {
        validate_platform(node)?;

        let version = match node.platform_version()? {
            PlatformVersion::Number(n) if n.is_finite() => *n,
            PlatformVersion::Number(n) => match self.config.version_policy {
                VersionParsePolicy::Lenient => 0.0,
                VersionParsePolicy::Strict => {
                    return Err(Error::InvalidVersion {
                        value: n.to_string(),
                    })
                }
            },
            PlatformVersion::Text(text) => match self.config.version_policy {
                VersionParsePolicy::Lenient => parse_leading_float(text),
                VersionParsePolicy::Strict => parse_strict_float(text)?,
            },
        };
        debug!(version, "Resolved NT version");
        Ok(version)
    }

    /// Run every query and collect the answers
    pub fn classify(&self, node: &NodeAttributes) -> Result<WindowsClassification> {
        let core = self.is_core_version(node)?;
        let workstation = self.is_workstation_version(node)?;
        let server = self.is_server_version(node)?;
        let nt_version = self.nt_version(node)?;

        Ok(WindowsClassification {
            core,
            core_sku: CoreSku::from_code(node.operating_system_sku()?),
            workstation,
            server,
            product_type: ProductType::from_code(node.product_type()?),
            nt_version,
        })
    }
}

/// Reject any node whose platform is not Windows
fn validate_platform(node: &NodeAttributes) -> Result<()> {
    if node.platform() != Some(WINDOWS_PLATFORM) {
        debug!(platform = ?node.platform(), "Rejected non-Windows node");
        return Err(Error::UnsupportedPlatform {
            platform: node.platform.clone(),
        });
    }
    Ok(())
}

/// Parse the longest leading decimal number, `0.0` when there is none.
///
/// A single underscore between two digits is skipped, so `"1_0.5"` reads
/// as `10.5`. Results that overflow to infinity also give `0.0`.
fn parse_leading_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut number = String::new();
    let mut i = 0;
    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        number.push(sign as char);
        i = 1;
    }

    let (int_end, mut digits) = scan_digits(bytes, i, &mut number);
    i = int_end;

    if i < len && bytes[i] == b'.' {
        let mut fraction = String::new();
        let (frac_end, frac_digits) = scan_digits(bytes, i + 1, &mut fraction);
        if frac_digits > 0 {
            number.push('.');
            number.push_str(&fraction);
            digits += frac_digits;
            i = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if i < len && matches!(bytes[i], b'e' | b'E') {
        let mut exponent = String::from("e");
        let mut j = i + 1;
        if j < len && matches!(bytes[j], b'+' | b'-') {
            exponent.push(bytes[j] as char);
            j += 1;
        }
        let (_, exp_digits) = scan_digits(bytes, j, &mut exponent);
        if exp_digits > 0 {
            number.push_str(&exponent);
        }
    }

    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Copy a run of digits starting at `start` into `out`, returning the end
/// index and the digit count
fn scan_digits(bytes: &[u8], start: usize, out: &mut String) -> (usize, usize) {
    let mut i = start;
    let mut count = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            out.push(bytes[i] as char);
            count += 1;
            i += 1;
        } else if bytes[i] == b'_'
            && count > 0
            && bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit())
        {
            i += 1;
        } else {
            break;
        }
    }
    (i, count)
}

fn parse_strict_float(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidVersion {
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UNSUPPORTED_PLATFORM_MESSAGE;
    use assert_matches::assert_matches;

    fn strict_helper() -> VersionHelper {
        VersionHelper::with_config(HelperConfig {
            version_policy: VersionParsePolicy::Strict,
        })
    }

    fn node_with_platform(platform: Option<&str>) -> NodeAttributes {
        let mut node = NodeAttributes::windows(0x0D, 2, "10.0");
        node.platform = platform.map(str::to_string);
        node
    }

    #[test]
    fn test_core_server_scenario() {
        let helper = VersionHelper::new();
        let node = NodeAttributes::windows(0x0D, 2, "10.0");

        assert!(helper.is_core_version(&node).unwrap());
        assert!(!helper.is_workstation_version(&node).unwrap());
        assert!(helper.is_server_version(&node).unwrap());
        assert_eq!(helper.nt_version(&node).unwrap(), 10.0);
    }

    #[test]
    fn test_workstation_scenario() {
        let helper = VersionHelper::new();
        let node = NodeAttributes::windows(0x01, 1, "6.1");

        assert!(!helper.is_core_version(&node).unwrap());
        assert!(helper.is_workstation_version(&node).unwrap());
        assert!(!helper.is_server_version(&node).unwrap());
        assert_eq!(helper.nt_version(&node).unwrap(), 6.1);
    }

    #[test]
    fn test_every_core_sku_is_core() {
        let helper = VersionHelper::new();
        for sku in CoreSku::ALL {
            let node = NodeAttributes::windows(sku.code(), 3, "6.3");
            assert!(helper.is_core_version(&node).unwrap(), "{} not core", sku);
        }
    }

    #[test]
    fn test_other_skus_are_not_core() {
        let helper = VersionHelper::new();
        let core_codes: Vec<u32> = CoreSku::ALL.iter().map(|sku| sku.code()).collect();

        for code in (0..=0xFFFF).filter(|c| !core_codes.contains(c)) {
            let node = NodeAttributes::windows(code, 3, "6.3");
            assert!(!helper.is_core_version(&node).unwrap(), "{:#x} is core", code);
        }
    }

    #[test]
    fn test_workstation_server_negation() {
        let helper = VersionHelper::new();
        for product_type in 0..=16 {
            let node = NodeAttributes::windows(0x30, product_type, "10.0");
            let workstation = helper.is_workstation_version(&node).unwrap();
            let server = helper.is_server_version(&node).unwrap();

            assert_eq!(workstation, !server);
            assert_eq!(workstation, product_type == 1);
        }
    }

    #[test]
    fn test_non_windows_rejected_before_field_access() {
        let helper = VersionHelper::new();

        for platform in [Some("linux"), Some(""), Some("Windows"), Some("mac_os_x"), None] {
            // No kernel or version attributes: a field read would be MissingField
            let node = NodeAttributes {
                platform: platform.map(str::to_string),
                ..Default::default()
            };

            let errors = [
                helper.is_core_version(&node).unwrap_err(),
                helper.is_workstation_version(&node).unwrap_err(),
                helper.is_server_version(&node).unwrap_err(),
                helper.nt_version(&node).unwrap_err(),
                helper.classify(&node).unwrap_err(),
            ];
            for err in errors {
                assert_matches!(&err, Error::UnsupportedPlatform { platform: p }
                    if p.as_deref() == platform);
                assert_eq!(err.to_string(), UNSUPPORTED_PLATFORM_MESSAGE);
            }
        }
    }

    #[test]
    fn test_linux_node_with_full_facts_rejected() {
        let helper = VersionHelper::new();
        let node = node_with_platform(Some("linux"));

        assert_matches!(helper.is_core_version(&node), Err(Error::UnsupportedPlatform { .. }));
        assert_matches!(
            helper.is_workstation_version(&node),
            Err(Error::UnsupportedPlatform { .. })
        );
        assert_matches!(helper.is_server_version(&node), Err(Error::UnsupportedPlatform { .. }));
        assert_matches!(helper.nt_version(&node), Err(Error::UnsupportedPlatform { .. }));
    }

    #[test]
    fn test_missing_fields_on_windows() {
        let helper = VersionHelper::new();
        let node = NodeAttributes::with_platform("windows");

        assert_matches!(
            helper.is_core_version(&node),
            Err(Error::MissingField { path }) if path == "kernel"
        );
        assert_matches!(
            helper.is_server_version(&node),
            Err(Error::MissingField { path }) if path == "kernel"
        );
        assert_matches!(
            helper.nt_version(&node),
            Err(Error::MissingField { path }) if path == "platform_version"
        );
    }

    #[test]
    fn test_nt_version_numeric_input() {
        let helper = strict_helper();
        let node = NodeAttributes::windows(0x30, 1, 6.3);
        assert_eq!(helper.nt_version(&node).unwrap(), 6.3);
    }

    #[test]
    fn test_nt_version_lenient() {
        let helper = VersionHelper::new();
        let cases = [
            ("10.0", 10.0),
            ("6.3", 6.3),
            ("10.0.17763", 10.0),
            ("  6.1 ", 6.1),
            ("10", 10.0),
            ("10.", 10.0),
            (".5", 0.5),
            ("-1.5x", -1.5),
            ("1e1", 10.0),
            ("1e", 1.0),
            ("1e400", 0.0),
            ("-1e400", 0.0),
            ("1_0.5", 10.5),
            ("1__0", 1.0),
            ("_1", 0.0),
            ("1_", 1.0),
            ("1.2_5", 1.25),
            ("1e1_0", 1e10),
            ("abc", 0.0),
            ("", 0.0),
            (".", 0.0),
            ("-", 0.0),
        ];

        for (text, expected) in cases {
            let node = NodeAttributes::windows(0x30, 1, text);
            assert_eq!(helper.nt_version(&node).unwrap(), expected, "input {:?}", text);
        }
    }

    #[test]
    fn test_nt_version_non_finite_number() {
        let node = NodeAttributes::from_yaml_str(
            "platform: windows\nplatform_version: .inf\nkernel:\n  os_info:\n    operating_system_sku: 48\n    product_type: 1\n",
        )
        .unwrap();

        let helper = VersionHelper::new();
        assert_eq!(helper.nt_version(&node).unwrap(), 0.0);

        let result = helper.classify(&node).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["nt_version"], 0.0);

        assert_matches!(
            strict_helper().nt_version(&node),
            Err(Error::InvalidVersion { value }) if value == "inf"
        );
    }

    #[test]
    fn test_overflowing_version_stays_numeric() {
        let helper = VersionHelper::new();
        let node = NodeAttributes::windows(0x30, 1, "1e400");

        let version = helper.nt_version(&node).unwrap();
        assert!(version.is_finite());
        assert_eq!(serde_json::Value::from(version), serde_json::json!(0.0));
    }

    #[test]
    fn test_config_accessor() {
        assert_eq!(VersionHelper::new().config().version_policy, VersionParsePolicy::Lenient);
        assert_eq!(strict_helper().config().version_policy, VersionParsePolicy::Strict);
    }

    #[test]
    fn test_nt_version_strict() {
        let helper = strict_helper();

        let node = NodeAttributes::windows(0x30, 1, " 6.3 ");
        assert_eq!(helper.nt_version(&node).unwrap(), 6.3);

        for text in ["10.0.17763", "abc", "", "inf", "NaN"] {
            let node = NodeAttributes::windows(0x30, 1, text);
            assert_matches!(
                helper.nt_version(&node),
                Err(Error::InvalidVersion { value }) if value == text
            );
        }
    }

    #[test]
    fn test_classify() {
        let helper = VersionHelper::new();

        let result = helper
            .classify(&NodeAttributes::windows(0x28, 3, "10.0.20348"))
            .unwrap();
        assert_eq!(
            result,
            WindowsClassification {
                core: true,
                core_sku: Some(CoreSku::StandardServerV),
                workstation: false,
                server: true,
                product_type: ProductType::Server,
                nt_version: 10.0,
            }
        );

        let result = helper
            .classify(&NodeAttributes::windows(0x30, 1, "10.0"))
            .unwrap();
        assert!(!result.core);
        assert_eq!(result.core_sku, None);
        assert!(result.workstation);
        assert_eq!(result.product_type, ProductType::Workstation);
    }

    #[test]
    fn test_classification_json() {
        let helper = VersionHelper::new();
        let result = helper
            .classify(&NodeAttributes::windows(0x0C, 2, "6.3"))
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["core"], true);
        assert_eq!(json["core_sku"], "DATACENTER_SERVER");
        assert_eq!(json["product_type"], "domain_controller");
        assert_eq!(json["nt_version"], 6.3);
    }

    #[test]
    fn test_queries_reread_node() {
        let helper = VersionHelper::new();
        let mut node = NodeAttributes::windows(0x01, 1, "6.1");
        assert!(helper.is_workstation_version(&node).unwrap());

        node.kernel = Some(crate::domain::node::KernelAttributes {
            os_info: Some(crate::domain::node::OsInfo {
                operating_system_sku: Some(0x0E),
                product_type: Some(3),
            }),
        });
        assert!(helper.is_server_version(&node).unwrap());
        assert!(helper.is_core_version(&node).unwrap());
    }

    #[test]
    fn test_shared_across_threads() {
        let helper = VersionHelper::new();
        let node = NodeAttributes::windows(0x0D, 2, "10.0");

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    assert!(helper.is_core_version(&node).unwrap());
                    assert!(helper.is_server_version(&node).unwrap());
                });
            }
        });
    }
}

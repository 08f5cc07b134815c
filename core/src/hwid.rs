//! Hardware identifier used to bind a license to one machine.
//!
//! The identifier is the 48-bit address of a local network adapter rendered
//! as colon-separated lowercase hex (`aa:bb:cc:dd:ee:ff`). Adapter discovery
//! is platform specific:
//! - Linux: `/sys/class/net/*/address`
//! - macOS: `ether` lines of `ifconfig`
//! - Windows: `getmac /fo csv /nh`
//!
//! Universally administered addresses win over locally administered ones so
//! the result does not change when a VPN or container bridge comes up.

use crate::error::{HyperError, Result};

const NODE_MASK: u64 = 0xffff_ffff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HardwareId(String);

impl HardwareId {
    /// Identifier of the machine this process runs on.
    pub fn local() -> Result<Self> {
        let candidates = adapter_addresses()?;
        pick_node(&candidates)
            .map(Self::from_node)
            .ok_or_else(|| HyperError::HardwareId("no network adapter with a hardware address".to_string()))
    }

    /// Render the low 48 bits of `node`.
    pub fn from_node(node: u64) -> Self {
        let hex = format!("{:012x}", node & NODE_MASK);
        let pairs: Vec<&str> = (0..hex.len()).step_by(2).map(|i| &hex[i..i + 2]).collect();
        Self(pairs.join(":"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HardwareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HardwareId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HardwareId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parse `aa:bb:cc:dd:ee:ff` or `AA-BB-CC-DD-EE-FF`.
fn parse_mac(raw: &str) -> Option<u64> {
    let octets: Vec<&str> = raw.trim().split([':', '-']).collect();
    if octets.len() != 6 {
        return None;
    }
    octets.iter().try_fold(0u64, |node, octet| {
        if octet.len() != 2 {
            return None;
        }
        u8::from_str_radix(octet, 16).ok().map(|b| (node << 8) | u64::from(b))
    })
}

fn is_locally_administered(node: u64) -> bool {
    (node >> 40) & 0x02 != 0
}

/// First universally administered address, else the first usable one.
fn pick_node(candidates: &[u64]) -> Option<u64> {
    let usable = || candidates.iter().copied().filter(|&node| node != 0);
    usable()
        .find(|&node| !is_locally_administered(node))
        .or_else(|| usable().next())
}

#[cfg(target_os = "linux")]
fn adapter_addresses() -> Result<Vec<u64>> {
    let entries = std::fs::read_dir("/sys/class/net").map_err(|e| HyperError::HardwareId(e.to_string()))?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "lo")
        .collect();
    names.sort();

    Ok(names
        .iter()
        .filter_map(|name| std::fs::read_to_string(format!("/sys/class/net/{name}/address")).ok())
        .filter_map(|raw| parse_mac(&raw))
        .collect())
}

#[cfg(target_os = "macos")]
fn adapter_addresses() -> Result<Vec<u64>> {
    let output = std::process::Command::new("ifconfig")
        .output()
        .map_err(|e| HyperError::HardwareId(format!("failed to run ifconfig: {e}")))?;
    let text = String::from_utf8_lossy(&output.stdout);

    Ok(text
        .lines()
        .filter_map(|line| line.trim().strip_prefix("ether "))
        .filter_map(|rest| rest.split_whitespace().next())
        .filter_map(parse_mac)
        .collect())
}

#[cfg(target_os = "windows")]
fn adapter_addresses() -> Result<Vec<u64>> {
    let output = std::process::Command::new("getmac")
        .args(["/fo", "csv", "/nh"])
        .output()
        .map_err(|e| HyperError::HardwareId(format!("failed to run getmac: {e}")))?;
    let text = String::from_utf8_lossy(&output.stdout);

    Ok(text
        .lines()
        .filter_map(|line| line.split(',').next())
        .map(|field| field.trim_matches('"'))
        .filter_map(parse_mac)
        .collect())
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn adapter_addresses() -> Result<Vec<u64>> {
    Err(HyperError::HardwareId(
        "hardware id lookup is not supported on this platform".to_string(),
    ))
}

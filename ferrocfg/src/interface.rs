//! Interface family classification and display labels.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static INTERFACE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(TenGigabitEthernet|GigabitEthernet|FastEthernet|Ten|Te|Gi|Fa)\s*(\d+(?:/\d+)*(?:\.\d+)?)$",
    )
    .expect("static interface pattern")
});

/// Interface speed family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum InterfaceFamily {
    FastEthernet,
    GigabitEthernet,
    TenGigabitEthernet,
}

impl InterfaceFamily {
    /// Family used for names that match no known prefix.
    pub const LOWEST: InterfaceFamily = InterfaceFamily::FastEthernet;

    /// Short prefix shown on port buttons.
    pub fn short(&self) -> &'static str {
        match self {
            InterfaceFamily::FastEthernet => "Fa",
            InterfaceFamily::GigabitEthernet => "Gi",
            InterfaceFamily::TenGigabitEthernet => "Ten",
        }
    }

    /// Full IOS prefix.
    pub fn long(&self) -> &'static str {
        match self {
            InterfaceFamily::FastEthernet => "FastEthernet",
            InterfaceFamily::GigabitEthernet => "GigabitEthernet",
            InterfaceFamily::TenGigabitEthernet => "TenGigabitEthernet",
        }
    }

    fn from_prefix(prefix: &str) -> Self {
        match prefix.to_ascii_lowercase().as_str() {
            "tengigabitethernet" | "ten" | "te" => InterfaceFamily::TenGigabitEthernet,
            "gigabitethernet" | "gi" => InterfaceFamily::GigabitEthernet,
            _ => InterfaceFamily::FastEthernet,
        }
    }
}

impl fmt::Display for InterfaceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// A raw interface name with its family and display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceLabel {
    pub raw_name: String,
    pub family: InterfaceFamily,
    pub display_label: String,
}

impl InterfaceLabel {
    /// Classify one interface name. Never fails.
    pub fn classify(raw_name: &str) -> Self {
        match INTERFACE_NAME.captures(raw_name.trim()) {
            Some(caps) => {
                let family = InterfaceFamily::from_prefix(&caps[1]);
                Self {
                    raw_name: raw_name.to_string(),
                    family,
                    display_label: format!("{}{}", family.short(), &caps[2]),
                }
            }
            None => Self {
                raw_name: raw_name.to_string(),
                family: InterfaceFamily::LOWEST,
                display_label: raw_name.to_string(),
            },
        }
    }
}

/// Label every interface, preserving order and count.
pub fn label_interfaces<S: AsRef<str>>(interface_names: &[S]) -> Vec<InterfaceLabel> {
    interface_names
        .iter()
        .map(|name| InterfaceLabel::classify(name.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_names() {
        let label = InterfaceLabel::classify("GigabitEthernet0/1");
        assert_eq!(label.family, InterfaceFamily::GigabitEthernet);
        assert_eq!(label.display_label, "Gi0/1");
        assert_eq!(label.raw_name, "GigabitEthernet0/1");

        let label = InterfaceLabel::classify("TenGigabitEthernet1/1/1");
        assert_eq!(label.family, InterfaceFamily::TenGigabitEthernet);
        assert_eq!(label.display_label, "Ten1/1/1");

        let label = InterfaceLabel::classify("FastEthernet0/0.10");
        assert_eq!(label.family, InterfaceFamily::FastEthernet);
        assert_eq!(label.display_label, "Fa0/0.10");
    }

    #[test]
    fn test_short_names() {
        assert_eq!(
            InterfaceLabel::classify("Gi1/0/48").family,
            InterfaceFamily::GigabitEthernet
        );
        assert_eq!(
            InterfaceLabel::classify("Te1/1/1").family,
            InterfaceFamily::TenGigabitEthernet
        );
        assert_eq!(InterfaceLabel::classify("Fa0/0").display_label, "Fa0/0");
    }

    #[test]
    fn test_unmatched_defaults_to_lowest_family() {
        for name in ["eth0", "lan1", "wan", "", "Gi"] {
            let label = InterfaceLabel::classify(name);
            assert_eq!(label.family, InterfaceFamily::FastEthernet, "{name}");
            assert_eq!(label.display_label, name);
        }
    }

    #[test]
    fn test_label_interfaces_total_and_deterministic() {
        let names = ["Fa0/0", "Fa0/0", "GigabitEthernet0/1", "eth2", "Te1/0/1"];
        let first = label_interfaces(&names[..]);
        let second = label_interfaces(&names[..]);
        assert_eq!(first, second);
        assert_eq!(first.len(), names.len());
        for (label, name) in first.iter().zip(names) {
            assert_eq!(label.raw_name, name);
        }
    }

    #[test]
    fn test_family_order() {
        assert!(InterfaceFamily::FastEthernet < InterfaceFamily::GigabitEthernet);
        assert!(InterfaceFamily::GigabitEthernet < InterfaceFamily::TenGigabitEthernet);
        assert_eq!(InterfaceFamily::TenGigabitEthernet.long(), "TenGigabitEthernet");
    }
}

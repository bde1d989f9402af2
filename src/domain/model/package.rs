use anyhow::Result;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// A package to install, identified by its distribution name only.
///
/// There are no version or constraint fields: whatever the package index
/// resolves for the bare name is what gets installed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    name: String,
}

impl PackageSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether two specs name the same distribution.
    ///
    /// Package indexes treat `-`, `_` and `.` as equivalent and ignore case.
    pub fn same_distribution(&self, other: &PackageSpec) -> bool {
        self.normalized_name() == other.normalized_name()
    }

    pub fn normalized_name(&self) -> String {
        self.name
            .chars()
            .map(|c| match c {
                '_' | '.' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect()
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for PackageSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty.");
        }
        if name.starts_with('-') {
            anyhow::bail!(
                "Invalid package name '{}': options are not allowed in the package list.",
                name
            );
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            anyhow::bail!(
                "Invalid package name '{}': unexpected character '{}'. Version constraints are not supported.",
                name,
                c
            );
        }
        Ok(PackageSpec {
            name: name.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for PackageSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Drop repeated distributions, keeping the first occurrence of each.
pub fn dedup_packages(packages: impl IntoIterator<Item = PackageSpec>) -> Vec<PackageSpec> {
    let mut unique: Vec<PackageSpec> = Vec::new();
    for package in packages {
        if !unique.iter().any(|p| p.same_distribution(&package)) {
            unique.push(package);
        }
    }
    unique
}

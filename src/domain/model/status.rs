use std::fmt;

use super::PackageSpec;

/// What the package manager knows about an installed distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub version: Option<String>,
    pub location: Option<String>,
}

/// Result of the post-install status query for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageStatus {
    Installed(PackageInfo),
    Absent,
    /// The query itself failed; says nothing about the install outcome.
    Unavailable { reason: String },
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::Installed(info) => {
                f.write_str(info.version.as_deref().unwrap_or("(unknown version)"))?;
                if let Some(location) = &info.location {
                    write!(f, " ({})", location)?;
                }
                Ok(())
            }
            PackageStatus::Absent => f.write_str("not installed"),
            PackageStatus::Unavailable { reason } => {
                write!(f, "status unavailable: {}", reason)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub package: PackageSpec,
    pub status: PackageStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let installed = PackageStatus::Installed(PackageInfo {
            version: Some("1.26.4".to_string()),
            location: Some("/work/.venv/lib/python3.12/site-packages".to_string()),
        });
        assert_eq!(
            installed.to_string(),
            "1.26.4 (/work/.venv/lib/python3.12/site-packages)"
        );

        let bare = PackageStatus::Installed(PackageInfo::default());
        assert_eq!(bare.to_string(), "(unknown version)");

        assert_eq!(PackageStatus::Absent.to_string(), "not installed");
        assert_eq!(
            PackageStatus::Unavailable {
                reason: "pip missing".to_string()
            }
            .to_string(),
            "status unavailable: pip missing"
        );
    }
}

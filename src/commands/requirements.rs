use anyhow::{Context, Result};
use log::warn;

use crate::domain::model::PackageSpec;

/// Characters that end the distribution name in a requirement line.
const NAME_TERMINATORS: &[char] = &['<', '>', '=', '!', '~', ';', '[', '@', ' ', '\t'];

/// Read the package names from a pip requirements file.
///
/// Blank lines and comments are skipped. Option lines (`-r`, `--index-url`,
/// ...) are not supported and are skipped with a warning, as are version
/// constraints: only the distribution name is kept.
pub fn parse_requirements(content: &str) -> Result<Vec<PackageSpec>> {
    let mut packages = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('-') {
            warn!("Ignoring requirements option on line {}: {}", line_no, line);
            continue;
        }

        let (name, rest) = match line.find(NAME_TERMINATORS) {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        };
        if !rest.trim().is_empty() {
            warn!(
                "Ignoring version constraint for {} on line {}: {}",
                name,
                line_no,
                rest.trim()
            );
        }

        let package = name
            .parse::<PackageSpec>()
            .with_context(|| format!("Invalid requirement on line {}: {}", line_no, raw.trim()))?;
        packages.push(package);
    }

    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(packages: &[PackageSpec]) -> Vec<&str> {
        packages.iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_parse_plain_names_in_order() {
        let packages = parse_requirements("flask\nnumpy\n\nrequests\n").unwrap();
        assert_eq!(names(&packages), vec!["flask", "numpy", "requests"]);
    }

    #[test]
    fn test_parse_skips_comments() {
        let content = "# core\nflask  # web framework\n   # indented comment\nnumpy\n";
        let packages = parse_requirements(content).unwrap();
        assert_eq!(names(&packages), vec!["flask", "numpy"]);
    }

    #[test]
    fn test_parse_strips_constraints_and_extras() {
        let content = "numpy>=1.20\nflask==2.3.0\nrequests[socks]\npywin32; sys_platform == 'win32'\nPyJWT ~= 2.0\n";
        let packages = parse_requirements(content).unwrap();
        assert_eq!(names(&packages), vec!["numpy", "flask", "requests", "pywin32", "PyJWT"]);
    }

    #[test]
    fn test_parse_skips_option_lines() {
        let content = "-r base.txt\n--index-url https://example.com/simple\nnumpy\n";
        let packages = parse_requirements(content).unwrap();
        assert_eq!(names(&packages), vec!["numpy"]);
    }

    #[test]
    fn test_parse_reports_line_of_invalid_entry() {
        let err = parse_requirements("numpy\n>=1.0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_parse_empty_file() {
        assert!(parse_requirements("").unwrap().is_empty());
        assert!(parse_requirements("# nothing here\n\n").unwrap().is_empty());
    }
}

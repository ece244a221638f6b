//! Production Code Enforcement
//!
//! Production code propagates errors instead of panicking and does not keep
//! dead code alive. Everything from a file's first `#[cfg(test)]` on is test
//! code and exempt, as are test-only files such as mocks.

use std::fs;
use std::path::{Path, PathBuf};

const FORBIDDEN: &[(&str, &str)] = &[
    (".unwrap()", "unwrap in production code"),
    (".expect(", "expect in production code"),
    ("#[allow(dead_code)]", "dead code allowance"),
];

/// A forbidden pattern found in production code
#[derive(Debug)]
struct Violation {
    file_path: String,
    line_number: usize,
    rule: &'static str,
    context: String,
}

/// Checker for forbidden patterns in production code
struct ProductionCodeChecker {
    violations: Vec<Violation>,
    files_checked: usize,
}

impl ProductionCodeChecker {
    fn new() -> Self {
        Self {
            violations: Vec::new(),
            files_checked: 0,
        }
    }

    /// Source directories of the workspace crates, excluding this one
    fn source_dirs(workspace: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(workspace)? {
            let path = entry?.path();
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if name.starts_with("reelscout-") && name != "reelscout-tests" {
                let src = path.join("src");
                if src.is_dir() {
                    dirs.push(src);
                }
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn find_rust_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::find_rust_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
        Ok(())
    }

    /// Check if a file path represents test-only code
    fn is_test_file(path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        name == "mock.rs" || name.starts_with("test_") || name.ends_with("_test.rs")
    }

    fn check_source(&mut self, file_path: &str, content: &str) {
        for (index, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed == "#[cfg(test)]" {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            for (pattern, rule) in FORBIDDEN {
                if trimmed.contains(pattern) {
                    self.violations.push(Violation {
                        file_path: file_path.to_string(),
                        line_number: index + 1,
                        rule,
                        context: trimmed.to_string(),
                    });
                }
            }
        }
    }

    fn check_workspace(&mut self, workspace: &Path) -> std::io::Result<()> {
        let mut files = Vec::new();
        for dir in Self::source_dirs(workspace)? {
            Self::find_rust_files(&dir, &mut files)?;
        }

        for file in files {
            if Self::is_test_file(&file) {
                continue;
            }
            let content = fs::read_to_string(&file)?;
            self.files_checked += 1;
            self.check_source(&file.to_string_lossy(), &content);
        }
        Ok(())
    }

    /// Report violations and return whether the check passed
    fn report_violations(&self) -> bool {
        if self.violations.is_empty() {
            println!(
                "Production code enforcement: {} files checked, no violations found",
                self.files_checked
            );
            return true;
        }

        println!("Production code violations found:");
        for violation in &self.violations {
            println!(
                "{}:{} ({})",
                violation.file_path, violation.line_number, violation.rule
            );
            println!("  {}", violation.context);
        }
        println!();
        println!("Return a Result and propagate with `?`, or move the code into a test module.");
        false
    }
}

#[test]
fn test_code_after_cfg_test_is_exempt() {
    let mut checker = ProductionCodeChecker::new();
    let source = r#"
fn parse(raw: &str) -> Option<u16> {
    // .unwrap() in a comment is fine
    raw.parse().ok()
}

#[allow(dead_code)]
fn unused() -> u16 {
    "1".parse().unwrap()
}

#[cfg(test)]
mod tests {
    #[test]
    fn parses() {
        assert_eq!(super::parse("1").unwrap(), 1);
    }
}
"#;

    checker.check_source("lib.rs", source);

    let rules: Vec<_> = checker.violations.iter().map(|v| v.rule).collect();
    assert_eq!(rules, vec!["dead code allowance", "unwrap in production code"]);
    assert_eq!(checker.violations[0].line_number, 7);
}

#[test]
fn test_mock_files_are_test_code() {
    assert!(ProductionCodeChecker::is_test_file(Path::new(
        "reelscout-search/src/providers/mock.rs"
    )));
    assert!(!ProductionCodeChecker::is_test_file(Path::new(
        "reelscout-search/src/providers/proxy.rs"
    )));
}

#[test]
fn production_code_enforcement() {
    let mut checker = ProductionCodeChecker::new();

    checker
        .check_workspace(Path::new(".."))
        .expect("Failed to check workspace");

    let passed = checker.report_violations();
    assert!(
        passed,
        "Forbidden patterns found in production code - see output above"
    );
}

//! Strip stale two-digit variant codes from the car data file.
//!
//! Lines like `variant: "'07",` become `variant: "",`. The fixed text goes to
//! a sibling `<stem>.new.<ext>` file; the input is never touched.

use crate::result::{PaddockError, PaddockResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

const VARIANT_PATTERN: &str = r#"variant: "'\d{2}""#;
const VARIANT_REPLACEMENT: &str = r#"variant: """#;

/// Outcome of fixing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFixReport {
    /// Where the fixed text was written
    pub output: PathBuf,
    /// Number of variant fields cleared
    pub replacements: usize,
}

/// Variant field fixer
#[derive(Debug, Clone)]
pub struct VariantFixer {
    pattern: Regex,
}

impl VariantFixer {
    /// Compile the variant pattern
    ///
    /// # Errors
    ///
    /// Only if the built-in pattern fails to compile.
    pub fn new() -> PaddockResult<Self> {
        let pattern = Regex::new(VARIANT_PATTERN)
            .map_err(|e| PaddockError::config(format!("invalid variant pattern: {e}")))?;
        Ok(Self { pattern })
    }

    /// Clear every quoted two-digit variant, returning the text and the count
    #[must_use]
    pub fn fix(&self, source: &str) -> (String, usize) {
        let replacements = self.pattern.find_iter(source).count();
        let fixed = self.pattern.replace_all(source, VARIANT_REPLACEMENT);
        (fixed.into_owned(), replacements)
    }

    /// Fix `path`, writing the result beside it
    ///
    /// A file with nothing to fix still gets an (identical) output file.
    ///
    /// # Errors
    ///
    /// I/O failure reading the input or writing the output.
    pub fn fix_file(&self, path: &Path) -> PaddockResult<VariantFixReport> {
        let source = std::fs::read_to_string(path)?;
        let (fixed, replacements) = self.fix(&source);
        let output = output_path_for(path);
        std::fs::write(&output, fixed)?;
        info!(
            input = %path.display(),
            output = %output.display(),
            replacements,
            "variant fields cleared"
        );
        Ok(VariantFixReport {
            output,
            replacements,
        })
    }
}

/// `dir/name.ext` becomes `dir/name.new.ext`
#[must_use]
pub fn output_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.new.{}", ext.to_string_lossy()),
        None => format!("{stem}.new"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SPECS: &str = r#"export const carSpecs = [
  { name: "Roadster", variant: "'07", power: 210 },
  {
    name: "Coupe",
    variant: "'12",
  },
  { name: "Wagon", variant: "" },
  { name: "Classic", variant: "'123", power: 90 },
  { name: "Plain", variant: "07", power: 90 },
  { name: "Tail", variant: "'99" }
];
"#;

    #[test]
    fn test_clears_two_digit_variants() {
        let fixer = VariantFixer::new().unwrap();
        let (fixed, count) = fixer.fix(SPECS);

        assert_eq!(count, 3);
        assert!(fixed.contains(r#"{ name: "Roadster", variant: "", power: 210 }"#));
        assert!(fixed.contains("    variant: \"\",\n"));
        assert!(fixed.contains(r#"{ name: "Tail", variant: "" }"#));
    }

    #[test]
    fn test_leaves_other_variants_alone() {
        let fixer = VariantFixer::new().unwrap();
        let (fixed, _) = fixer.fix(SPECS);

        assert!(fixed.contains(r#"variant: "'123""#));
        assert!(fixed.contains(r#"variant: "07""#));
        assert!(fixed.contains(r#"{ name: "Wagon", variant: "" }"#));
    }

    #[test]
    fn test_idempotent() {
        let fixer = VariantFixer::new().unwrap();
        let (once, _) = fixer.fix(SPECS);
        let (twice, count) = fixer.fix(&once);
        assert_eq!(once, twice);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path_for(Path::new("game/carSpecs.js")),
            PathBuf::from("game/carSpecs.new.js")
        );
        assert_eq!(
            output_path_for(Path::new("data")),
            PathBuf::from("data.new")
        );
    }

    #[test]
    fn test_fix_file_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("carSpecs.js");
        std::fs::write(&input, SPECS).unwrap();

        let fixer = VariantFixer::new().unwrap();
        let report = fixer.fix_file(&input).unwrap();

        assert_eq!(report.output, dir.path().join("carSpecs.new.js"));
        assert_eq!(report.replacements, 3);
        assert_eq!(std::fs::read_to_string(&input).unwrap(), SPECS);
        let written = std::fs::read_to_string(&report.output).unwrap();
        assert_eq!(written, fixer.fix(SPECS).0);
    }

    #[test]
    fn test_fix_file_without_matches_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("carSpecs.js");
        std::fs::write(&input, "export const carSpecs = [];\n").unwrap();

        let report = VariantFixer::new().unwrap().fix_file(&input).unwrap();
        assert_eq!(report.replacements, 0);
        assert_eq!(
            std::fs::read_to_string(&report.output).unwrap(),
            "export const carSpecs = [];\n"
        );
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VariantFixer::new()
            .unwrap()
            .fix_file(&dir.path().join("nope.js"))
            .unwrap_err();
        assert!(matches!(err, PaddockError::Io(_)));
    }
}

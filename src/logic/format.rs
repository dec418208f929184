use super::types::FileFormat;

/// Lowercased suffix after the final `.` of the file name, dot included.
///
/// Returns an empty string when the name has no suffix. A leading dot alone
/// (`.env`) does not count as an extension, matching how paths are split.
pub fn extension_of(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub fn detect_format(name: &str) -> FileFormat {
    match extension_of(name).as_str() {
        ".csv" => FileFormat::Csv,
        ".xlsx" => FileFormat::Excel,
        _ => FileFormat::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("a.csv"), FileFormat::Csv);
        assert_eq!(detect_format("b.xlsx"), FileFormat::Excel);
        assert_eq!(detect_format("c.txt"), FileFormat::Unsupported);
        assert_eq!(detect_format("legacy.xls"), FileFormat::Unsupported);
        assert_eq!(detect_format("no_extension"), FileFormat::Unsupported);
    }

    #[test]
    fn test_detect_format_is_case_insensitive() {
        assert_eq!(detect_format("REPORT.CSV"), FileFormat::Csv);
        assert_eq!(detect_format("Book1.XlSx"), FileFormat::Excel);
    }

    #[test]
    fn test_only_final_suffix_counts() {
        assert_eq!(detect_format("data.xlsx.csv"), FileFormat::Csv);
        assert_eq!(detect_format("data.csv.txt"), FileFormat::Unsupported);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("c.txt"), ".txt");
        assert_eq!(extension_of("Sheet.XLSX"), ".xlsx");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".env"), "");
    }
}

use std::io::{self, Write};

use colored::Colorize;
use log::debug;

use crate::types::{CompressionStats, WeaveResult, plural};

/// Formats `n` with thousands separators.
fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn print_warnings<W: Write>(writer: &mut W, warnings: &[String]) -> io::Result<()> {
    debug!("Printing {} warnings", warnings.len());
    for warning in warnings {
        writeln!(writer, "{} {}", "⚠".yellow().bold(), warning.yellow())?;
    }
    Ok(())
}

pub fn print_found_files<W: Write>(writer: &mut W, result: &WeaveResult) -> io::Result<()> {
    let minify = result.minify.map(|l| format!(" (minify: {})", l.as_str())).unwrap_or_default();
    writeln!(
        writer,
        "{} Found {} {} to process ({}{})",
        "✓".green().bold(),
        result.files.len().to_string().cyan(),
        plural(result.files.len(), "file"),
        result.mode.summary(),
        minify
    )
}

pub fn print_compression_stats<W: Write>(writer: &mut W, stats: &CompressionStats) -> io::Result<()> {
    writeln!(writer, "\n{}", "Compression Statistics:".cyan())?;
    writeln!(writer, "{} {} bytes", "Original size:".green(), group_digits(stats.original_size))?;
    writeln!(writer, "{} {} bytes", "Minified size:".green(), group_digits(stats.minified_size))?;
    writeln!(
        writer,
        "{} {} bytes ({}%)",
        "Reduction:".green(),
        group_digits(stats.reduction),
        stats.percentage()
    )?;
    Ok(())
}

pub fn print_success<W: Write>(writer: &mut W, result: &WeaveResult) -> io::Result<()> {
    writeln!(
        writer,
        "{} Successfully processed {} {} and saved to {} ({})",
        "✓".green().bold(),
        result.files_processed.to_string().cyan(),
        plural(result.files_processed, "file"),
        result.output_path.display(),
        result.mode.describe()
    )?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::MinifyLevel, types::WeaveMode};
    use std::path::PathBuf;

    fn result() -> WeaveResult {
        WeaveResult {
            files: vec![PathBuf::from("/p/a.js"), PathBuf::from("/p/b.js")],
            base_dir: PathBuf::from("/p"),
            output_path: PathBuf::from("/out/output.txt"),
            files_processed: 1,
            mode: WeaveMode::Directory,
            minify: Some(MinifyLevel::Medium),
            stats: None,
            warnings: vec![],
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1234567), "1,234,567");
    }

    #[test]
    fn test_print_found_and_success() {
        let res = result();
        let found = render(|w| print_found_files(w, &res));
        assert_eq!(found, "✓ Found 2 files to process (directory scan (minify: medium))\n");

        let success = render(|w| print_success(w, &res));
        assert_eq!(
            success,
            "✓ Successfully processed 1 file and saved to /out/output.txt (Directory scan)\n"
        );
    }

    #[test]
    fn test_print_compression_stats() {
        let out = render(|w| print_compression_stats(w, &CompressionStats::new(12000, 9000)));
        assert!(out.contains("Original size: 12,000 bytes"));
        assert!(out.contains("Minified size: 9,000 bytes"));
        assert!(out.contains("Reduction: 3,000 bytes (25.0%)"));
    }

    #[test]
    fn test_print_warnings() {
        let out = render(|w| print_warnings(w, &["first".to_string(), "second".to_string()]));
        assert_eq!(out, "⚠ first\n⚠ second\n");
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::logger::LoggerConfig;
use crate::venn::{OutputFormat, VennOptions};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub log_file: Option<PathBuf>,
    pub no_console: bool,
    pub no_log_file: bool,
    pub formats: Vec<OutputFormat>,
    pub font_family: Option<String>,
    pub dpi: Option<u32>,
    pub write_table: bool,
    pub debug: bool,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            no_console: self.no_console || other.no_console,
            no_log_file: self.no_log_file || other.no_log_file,
            formats: if other.formats.is_empty() {
                self.formats.clone()
            } else {
                other.formats.clone()
            },
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
            dpi: other.dpi.or(self.dpi),
            write_table: self.write_table || other.write_table,
            debug: self.debug || other.debug,
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        let defaults = LoggerConfig::default();
        LoggerConfig {
            sink_path: self.log_file.clone().unwrap_or(defaults.sink_path),
            console_enabled: !self.no_console,
            file_enabled: !self.no_log_file,
        }
    }

    pub fn venn_options(&self) -> VennOptions {
        let defaults = VennOptions::default();
        VennOptions {
            formats: if self.formats.is_empty() {
                defaults.formats.clone()
            } else {
                self.formats.clone()
            },
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| defaults.font_family.clone()),
            dpi: self.dpi.unwrap_or(defaults.dpi),
            ..defaults
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("bioreport").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("bioreport")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("bioreport").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("bioreport")
                .join("config");
        }
    }

    PathBuf::from(".bioreportrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".bioreportrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

// `--flag=value` lines keep their spaces so font names survive a round trip.
fn line_tokens(line: &str) -> Vec<String> {
    if line.starts_with("--") && line.contains('=') {
        vec![line.to_string()]
    } else {
        line.split_whitespace().map(ToOwned::to_owned).collect()
    }
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# bioreport defaults (saved with --save)".to_string());
    if let Some(log_file) = &flags.log_file {
        lines.push(format!("--log-file={}", log_file.display()));
    }
    if flags.no_console {
        lines.push("--no-console".to_string());
    }
    if flags.no_log_file {
        lines.push("--no-log-file".to_string());
    }
    for format in &flags.formats {
        lines.push(format!("--format {}", format.extension()));
    }
    if let Some(family) = &flags.font_family {
        lines.push(format!("--font-family={family}"));
    }
    if let Some(dpi) = flags.dpi {
        lines.push(format!("--dpi {dpi}"));
    }
    if flags.write_table {
        lines.push("--write-table".to_string());
    }
    if flags.debug {
        lines.push("--debug".to_string());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (token.as_str(), None),
        };
        let takes_value = matches!(name, "--log-file" | "--format" | "--font-family" | "--dpi");
        let value = if takes_value && inline.is_none() {
            let next = tokens.get(i + 1).cloned();
            if next.is_some() {
                i += 1;
            }
            next
        } else {
            inline
        };

        match (name, value) {
            ("--no-console", None) => flags.no_console = true,
            ("--no-log-file", None) => flags.no_log_file = true,
            ("--write-table", None) => flags.write_table = true,
            ("--debug", None) => flags.debug = true,
            ("--log-file", Some(value)) => flags.log_file = Some(PathBuf::from(value)),
            ("--format", Some(value)) => {
                if let Some(format) = OutputFormat::parse(&value) {
                    flags.formats.push(format);
                }
            }
            ("--font-family", Some(value)) => flags.font_family = Some(value),
            ("--dpi", Some(value)) => flags.dpi = value.trim().parse().ok(),
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "bioreport",
            "sets.csv",
            "--no-console",
            "--log-file",
            "run.log",
            "--format",
            "svg",
            "--format=PNG",
            "--dpi=150",
            "--write-table",
        ]));
        assert!(flags.no_console);
        assert!(!flags.no_log_file);
        assert_eq!(flags.log_file, Some(PathBuf::from("run.log")));
        assert_eq!(flags.formats, vec![OutputFormat::Svg, OutputFormat::Png]);
        assert_eq!(flags.dpi, Some(150));
        assert!(flags.write_table);
    }

    #[test]
    fn test_parse_flag_tokens_ignores_unknown_and_bad_values() {
        let flags = parse_flag_tokens(&args(&["--format", "pdf", "--dpi", "high", "--verbose"]));
        assert!(flags.formats.is_empty());
        assert_eq!(flags.dpi, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_console: true,
            formats: vec![OutputFormat::Png],
            dpi: Some(300),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            write_table: true,
            formats: vec![OutputFormat::Svg],
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_console);
        assert!(merged.write_table);
        assert_eq!(merged.formats, vec![OutputFormat::Svg]);
        assert_eq!(merged.dpi, Some(300));
    }

    #[test]
    fn test_flags_map_onto_logger_and_venn_options() {
        let flags = ConfigFlags {
            log_file: Some(PathBuf::from("logs/run.txt")),
            no_log_file: true,
            font_family: Some("Noto Sans".to_string()),
            ..ConfigFlags::default()
        };

        let logger = flags.logger_config();
        assert_eq!(logger.sink_path, PathBuf::from("logs/run.txt"));
        assert!(logger.console_enabled);
        assert!(!logger.file_enabled);

        let options = flags.venn_options();
        assert_eq!(options.font_family, "Noto Sans");
        assert_eq!(options.formats, VennOptions::default().formats);
        assert_eq!(options.dpi, 300);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".bioreportrc");
        let flags = ConfigFlags {
            log_file: Some(PathBuf::from("run log.txt")),
            no_console: true,
            no_log_file: true,
            formats: vec![OutputFormat::Svg],
            font_family: Some("Noto Sans CJK SC".to_string()),
            dpi: Some(600),
            write_table: true,
            debug: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}

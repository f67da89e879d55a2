//! Saved defaults.
//!
//! Defaults live in an rc file holding command-line flags, one or more per
//! line, with `#` comments. A global file is read first, then a local
//! `.grideditrc` in the working directory, then the actual command line; later
//! sources win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Spaces per tab stop when nothing else is configured.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Options the editor reads at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Tab inserts spaces up to the next multiple of this.
    pub tab_width: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Flags that can be saved as defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub tab_width: Option<usize>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            tab_width: other.tab_width.or(self.tab_width),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            tab_width: self.tab_width.unwrap_or(DEFAULT_TAB_WIDTH).max(1),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("gridedit").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("gridedit")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("gridedit").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("gridedit")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".grideditrc")
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
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# gridedit defaults (saved with --save)".to_string()];
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if let Some(log) = &flags.log_file {
        lines.push(format!("--log-file {}", log.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
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

/// Pick the known flags out of `tokens`. Anything else is skipped, so a
/// whole command line can be passed in.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--tab-width" {
            if let Some(next) = tokens.get(i + 1) {
                flags.tab_width = parse_tab_width(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--tab-width=") {
            flags.tab_width = parse_tab_width(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_tab_width(s: &str) -> Option<usize> {
    s.parse().ok().filter(|&width| width > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "gridedit".to_string(),
            "--tab-width".to_string(),
            "8".to_string(),
            "--log-file=edit.log".to_string(),
            "--plain".to_string(),
            "notes.txt".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.tab_width, Some(8));
        assert_eq!(flags.log_file, Some(PathBuf::from("edit.log")));
    }

    #[test]
    fn test_parse_rejects_bad_tab_width() {
        let args = vec!["--tab-width".to_string(), "0".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
        let args = vec!["--tab-width=wide".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            tab_width: Some(2),
            log_file: Some(PathBuf::from("file.log")),
        };
        let cli = ConfigFlags {
            tab_width: Some(8),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.tab_width, Some(8));
        assert_eq!(merged.log_file, Some(PathBuf::from("file.log")));
    }

    #[test]
    fn test_editor_config_defaults() {
        assert_eq!(ConfigFlags::default().editor_config().tab_width, 4);
        let flags = ConfigFlags {
            tab_width: Some(3),
            ..ConfigFlags::default()
        };
        assert_eq!(flags.editor_config(), EditorConfig { tab_width: 3 });
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".grideditrc");
        let flags = ConfigFlags {
            tab_width: Some(2),
            log_file: Some(PathBuf::from("edit.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}

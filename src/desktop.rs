//! Desktop integration.
//!
//! Freedesktop launcher entries for the applications menu and autostart, plus
//! the small helpers that hand files and URLs to the system's default
//! programs and put text on the clipboard.

use crate::error::{IntroError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Program name used for the launcher entry and the window title.
pub const PROGRAM_NAME: &str = "article-introduction-generator";

/// One-line description shown by launchers.
pub const DESCRIPTION: &str = "Program to generate an introduction from a JSON File";

/// Upstream project page.
pub const SOURCE_URL: &str = "https://github.com/trucomanx/ArticleIntroductionGenerator";

/// Where a launcher entry is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopTarget {
    /// `~/.config/autostart`
    Autostart,
    /// `~/.local/share/applications`
    Applications,
}

impl DesktopTarget {
    /// Directory relative to the home directory.
    fn relative_dir(self) -> PathBuf {
        match self {
            DesktopTarget::Autostart => Path::new(".config").join("autostart"),
            DesktopTarget::Applications => Path::new(".local").join("share").join("applications"),
        }
    }

    pub fn dir_in(self, home: &Path) -> PathBuf {
        home.join(self.relative_dir())
    }
}

/// Contents of the `.desktop` file launching `exec`.
pub fn desktop_entry(exec: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={name}\n\
         Comment={comment}\n\
         Exec=\"{exec}\"\n\
         Terminal=true\n\
         Categories=Education;Office;\n",
        name = PROGRAM_NAME,
        comment = DESCRIPTION,
        exec = exec.display(),
    )
}

/// Write the launcher entry under `home`. Existing files are kept unless
/// `overwrite` is set. Returns the entry path.
pub fn install_entry_in(
    home: &Path,
    target: DesktopTarget,
    exec: &Path,
    overwrite: bool,
) -> Result<PathBuf> {
    let dir = target.dir_in(home);
    let path = dir.join(format!("{}.desktop", PROGRAM_NAME));
    if path.exists() && !overwrite {
        debug!(path = %path.display(), "Desktop entry already present");
        return Ok(path);
    }
    std::fs::create_dir_all(&dir)?;
    std::fs::write(&path, desktop_entry(exec))?;
    info!(path = %path.display(), ?target, "Wrote desktop entry");
    Ok(path)
}

/// [`install_entry_in`] for the current user and executable.
pub fn install_entry(target: DesktopTarget, overwrite: bool) -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| IntroError::Config("Cannot determine home directory".to_string()))?;
    let exec = std::env::current_exe()?;
    install_entry_in(&home, target, &exec, overwrite)
}

/// Open a file with the system's default program (text editor for JSON).
pub fn open_path(path: &Path) -> Result<()> {
    info!(path = %path.display(), "Opening file externally");
    open::that_detached(path)
        .map_err(|e| IntroError::Desktop(format!("Failed to open {}: {}", path.display(), e)))
}

/// Open a URL in the default browser.
pub fn open_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| IntroError::Config(format!("Invalid URL '{}': {}", url, e)))?;
    info!(url = %parsed, "Opening URL");
    open::that_detached(parsed.as_str())
        .map_err(|e| IntroError::Desktop(format!("Failed to open {}: {}", parsed, e)))
}

/// Replace the clipboard contents with `text`.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| IntroError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| IntroError::Clipboard(e.to_string()))
}

/// Side effects the editor hands to the desktop environment.
pub trait Desktop {
    fn open_path(&mut self, path: &Path) -> Result<()>;
    fn open_url(&mut self, url: &str) -> Result<()>;
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
}

/// [`Desktop`] backed by the system opener and clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn open_path(&mut self, path: &Path) -> Result<()> {
        open_path(path)
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        open_url(url)
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        copy_to_clipboard(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_mentions_exec() {
        let entry = desktop_entry(Path::new("/opt/bin/aig"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=\"/opt/bin/aig\"\n"));
        assert!(entry.contains(&format!("Name={}\n", PROGRAM_NAME)));
    }

    #[test]
    fn test_install_respects_overwrite() -> Result<()> {
        let home = TempDir::new()?;
        let exec = Path::new("/usr/bin/first");

        let path = install_entry_in(home.path(), DesktopTarget::Applications, exec, false)?;
        assert_eq!(
            path,
            home.path()
                .join(".local/share/applications")
                .join(format!("{}.desktop", PROGRAM_NAME))
        );

        install_entry_in(
            home.path(),
            DesktopTarget::Applications,
            Path::new("/usr/bin/second"),
            false,
        )?;
        assert!(std::fs::read_to_string(&path)?.contains("/usr/bin/first"));

        install_entry_in(
            home.path(),
            DesktopTarget::Applications,
            Path::new("/usr/bin/second"),
            true,
        )?;
        assert!(std::fs::read_to_string(&path)?.contains("/usr/bin/second"));
        Ok(())
    }

    #[test]
    fn test_autostart_dir() {
        assert_eq!(
            DesktopTarget::Autostart.dir_in(Path::new("/home/u")),
            PathBuf::from("/home/u/.config/autostart")
        );
    }

    #[test]
    fn test_open_url_rejects_garbage() {
        assert!(matches!(open_url("not a url"), Err(IntroError::Config(_))));
    }
}

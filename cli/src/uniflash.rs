//! Finding and opening the TI UniFlash desktop application.

use anyhow::{Context, Result};
use globset::GlobBuilder;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Where a UniFlash installation may live: folders under `root` whose name matches `dir_pattern`
/// and that contain `launcher`.
#[derive(Clone, Debug)]
pub struct Install {
    pub root: PathBuf,
    pub dir_pattern: &'static str,
    pub launcher: &'static str,
}

#[cfg(windows)]
pub fn default_installs() -> Vec<Install> {
    vec![
        Install {
            root: PathBuf::from(r"C:\ti"),
            dir_pattern: "uniflash_*",
            launcher: "uniflash.bat",
        },
        Install {
            root: PathBuf::from(r"C:\Program Files\Texas Instruments"),
            dir_pattern: "UniFlash",
            launcher: "uniflash.exe",
        },
    ]
}

#[cfg(not(windows))]
pub fn default_installs() -> Vec<Install> {
    std::env::var_os("HOME")
        .map(|home| Install {
            root: PathBuf::from(home).join("ti"),
            dir_pattern: "uniflash_*",
            launcher: "uniflash.sh",
        })
        .into_iter()
        .collect()
}

/// First launcher found, in the order of `installs`. Among several matching versions of one
/// install the newest (last by name) wins.
pub fn find_launcher(installs: &[Install]) -> Result<Option<PathBuf>> {
    for install in installs {
        let matcher = GlobBuilder::new(install.dir_pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("bad install pattern {}", install.dir_pattern))?
            .compile_matcher();

        let entries = match std::fs::read_dir(&install.root) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| matcher.is_match(entry.file_name()))
            .map(|entry| entry.path().join(install.launcher))
            .filter(|launcher| launcher.is_file())
            .collect();
        found.sort();
        if let Some(launcher) = found.pop() {
            return Ok(Some(launcher));
        }
    }
    Ok(None)
}

/// Start UniFlash without waiting for it.
pub fn launch(launcher: &Path) -> Result<()> {
    let mut command = Command::new(launcher);
    if let Some(install_dir) = launcher.parent() {
        command.current_dir(install_dir);
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to open {}", launcher.display()))?;
    tracing::debug!(launcher = %launcher.display(), "UniFlash started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn install(root: &Path) -> Install {
        Install {
            root: root.to_path_buf(),
            dir_pattern: "uniflash_*",
            launcher: "uniflash.bat",
        }
    }

    fn fake_uniflash(root: &Path, dir: &str) -> PathBuf {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        let launcher = dir.join("uniflash.bat");
        fs::write(&launcher, "@echo off\n").unwrap();
        launcher
    }

    #[test]
    fn newest_matching_version_wins() {
        let ti = tempfile::tempdir().unwrap();
        fake_uniflash(ti.path(), "uniflash_8.4.0");
        let newest = fake_uniflash(ti.path(), "uniflash_8.7.0");
        fake_uniflash(ti.path(), "ccs1240");
        assert_eq!(find_launcher(&[install(ti.path())]).unwrap(), Some(newest));
    }

    #[test]
    fn folder_without_launcher_is_skipped() {
        let ti = tempfile::tempdir().unwrap();
        fs::create_dir_all(ti.path().join("uniflash_9.0.0")).unwrap();
        let usable = fake_uniflash(ti.path(), "UniFlash_8.7.0");
        assert_eq!(find_launcher(&[install(ti.path())]).unwrap(), Some(usable));
    }

    #[test]
    fn earlier_install_location_takes_precedence() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let expected = fake_uniflash(first.path(), "uniflash_7.0.0");
        fake_uniflash(second.path(), "uniflash_8.0.0");
        let installs = [install(first.path()), install(second.path())];
        assert_eq!(find_launcher(&installs).unwrap(), Some(expected));
    }

    #[test]
    fn nothing_installed() {
        let ti = tempfile::tempdir().unwrap();
        fake_uniflash(ti.path(), "ccs1240");
        let missing = install(&ti.path().join("no-such-root"));
        assert_eq!(find_launcher(&[missing, install(ti.path())]).unwrap(), None);
    }
}

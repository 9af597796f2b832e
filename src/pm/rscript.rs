//! Rscript-backed package manager
//!
//! All interaction with R flows through [`RscriptManager::run_r`], the one
//! place that interprets exit codes and captured output. Installation code is
//! generated so R itself exits non-zero on failure: pak raises error
//! conditions, and `install.packages` (which only warns) is run under
//! `options(warn = 2)` with a `tryCatch` that quits with status 1.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::env::EnvironmentDescriptor;
use crate::error::{Result, RprovError};

use super::PackageManager;

/// Lines of captured stderr kept as the failure diagnostic
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Production package manager shelling out to Rscript + pak
pub struct RscriptManager {
    rscript: PathBuf,
}

/// Structured result of one Rscript invocation
struct RunOutput {
    success: bool,
    stderr_tail: String,
}

impl RscriptManager {
    pub fn new(env: &EnvironmentDescriptor) -> Self {
        RscriptManager {
            rscript: env.rscript.clone(),
        }
    }

    /// Ensure the pak package manager is available, installing it from its
    /// canonical distribution source if absent
    ///
    /// Wrapped with the same fail-fast policy as the environment probe: a
    /// broken bootstrap invalidates every subsequent step.
    pub fn ensure_pak(&self, debug: bool) -> Result<()> {
        if self.pak_available()? {
            return Ok(());
        }

        let code = "install.packages(\"pak\", repos = sprintf(\
            \"https://r-lib.github.io/p/pak/stable/%s/%s/%s\", \
            .Platform$pkgType, R.Version()$os, R.Version()$arch))";
        let output = self.run_r(code, debug)?;
        if !output.success {
            return Err(RprovError::BootstrapFailed {
                reason: output.stderr_tail,
            });
        }

        if !self.pak_available()? {
            return Err(RprovError::BootstrapFailed {
                reason: "pak is still not loadable after installation".to_string(),
            });
        }
        Ok(())
    }

    fn pak_available(&self) -> Result<bool> {
        let code = "quit(status = if (requireNamespace(\"pak\", quietly = TRUE)) 0L else 1L)";
        Ok(self.run_r(code, false)?.success)
    }

    /// Run one R expression, the narrow adapter between rprov and R
    ///
    /// In debug mode the full installer output streams to the user live;
    /// otherwise output is captured silently. Either way a stderr tail is
    /// kept so failed outcomes always carry a diagnostic. Spawn failures are
    /// invocation errors, not package failures.
    fn run_r(&self, code: &str, debug: bool) -> Result<RunOutput> {
        let mut cmd = Command::new(&self.rscript);
        cmd.args(["--vanilla", "-e", code]);

        if debug {
            return run_streaming(cmd);
        }

        let output = cmd.output().map_err(|e| RprovError::InstallerInvocation {
            reason: e.to_string(),
        })?;

        Ok(RunOutput {
            success: output.status.success(),
            stderr_tail: diagnostic_tail(output.status, &String::from_utf8_lossy(&output.stderr)),
        })
    }

    fn pak_install(&self, targets: &str, library: &Path, debug: bool) -> Result<RunOutput> {
        let code = format!(
            "tryCatch(pak::pkg_install({targets}, lib = {lib}, ask = FALSE), \
             error = function(e) {{ message(conditionMessage(e)); quit(status = 1) }})",
            lib = r_string(&library.display().to_string()),
        );
        self.run_r(&code, debug)
    }
}

impl PackageManager for RscriptManager {
    fn batch_install(&self, names: &[String], library: &Path, debug: bool) -> Result<()> {
        let quoted: Vec<String> = names.iter().map(|n| r_string(n)).collect();
        let targets = format!("c({})", quoted.join(", "));
        let output = self.pak_install(&targets, library, debug)?;
        if output.success {
            Ok(())
        } else {
            // pak reports only an aggregate result for the batch
            Err(RprovError::InstallationFailed {
                identifier: format!("CRAN batch ({} packages)", names.len()),
                diagnostic: output.stderr_tail,
            })
        }
    }

    fn install_from_reference(&self, reference: &str, library: &Path, debug: bool) -> Result<()> {
        let output = self.pak_install(&r_string(reference), library, debug)?;
        if output.success {
            Ok(())
        } else {
            Err(RprovError::InstallationFailed {
                identifier: reference.to_string(),
                diagnostic: output.stderr_tail,
            })
        }
    }

    fn install_from_url(&self, url: &str, library: &Path, debug: bool) -> Result<()> {
        let code = format!(
            "options(warn = 2); tryCatch(install.packages({url}, repos = NULL, \
             lib = {lib}, type = \"source\"), \
             error = function(e) {{ message(conditionMessage(e)); quit(status = 1) }})",
            url = r_string(url),
            lib = r_string(&library.display().to_string()),
        );
        let output = self.run_r(&code, debug)?;
        if output.success {
            Ok(())
        } else {
            Err(RprovError::InstallationFailed {
                identifier: url.to_string(),
                diagnostic: output.stderr_tail,
            })
        }
    }

    fn is_installed_and_loadable(&self, name: &str, library: &Path) -> Result<bool> {
        let code = format!(
            "quit(status = if (requireNamespace({name}, lib.loc = {lib}, quietly = TRUE)) 0L else 1L)",
            name = r_string(name),
            lib = r_string(&library.display().to_string()),
        );
        Ok(self.run_r(&code, false)?.success)
    }
}

/// Debug-mode invocation: stdout is inherited, stderr is piped through so it
/// can be echoed to the user and captured for the final report at the same
/// time
fn run_streaming(mut cmd: Command) -> Result<RunOutput> {
    let mut child = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RprovError::InstallerInvocation {
            reason: e.to_string(),
        })?;

    let mut captured = String::new();
    if let Some(stderr) = child.stderr.take() {
        for line in BufReader::new(stderr).lines() {
            let Ok(line) = line else { break };
            eprintln!("{line}");
            captured.push_str(&line);
            captured.push('\n');
        }
    }

    let status = child
        .wait()
        .map_err(|e| RprovError::InstallerInvocation {
            reason: e.to_string(),
        })?;

    Ok(RunOutput {
        success: status.success(),
        stderr_tail: diagnostic_tail(status, &captured),
    })
}

/// Quote a value as an R string literal
fn r_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Keep the stderr tail for diagnostics, falling back to the exit status
/// when a failing installer produced no stderr at all
fn diagnostic_tail(status: ExitStatus, stderr: &str) -> String {
    let tail = tail_lines(stderr);
    if tail.is_empty() && !status.success() {
        format!("Rscript exited with {status}")
    } else {
        tail
    }
}

fn tail_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_string_escaping() {
        assert_eq!(r_string("dplyr"), "\"dplyr\"");
        assert_eq!(r_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(r_string("C:\\lib"), "\"C:\\\\lib\"");
    }

    #[test]
    fn test_tail_lines_short_input() {
        assert_eq!(tail_lines("one\ntwo"), "one\ntwo");
    }

    #[test]
    fn test_tail_lines_truncates() {
        let long: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let tail = tail_lines(&long);
        assert_eq!(tail.lines().count(), DIAGNOSTIC_TAIL_LINES);
        assert!(tail.ends_with("line 49"));
        assert!(!tail.contains("line 29"));
    }

    #[cfg(unix)]
    fn write_stub(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.path().join("rscript-stub");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_debug_mode_failure_keeps_stderr_diagnostic() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = RscriptManager {
            rscript: write_stub(&dir, "echo 'compilation failed' >&2\nexit 1"),
        };

        let err = manager
            .install_from_url("https://example.org/pkg_1.0.tar.gz", dir.path(), true)
            .unwrap_err();
        match err {
            RprovError::InstallationFailed { diagnostic, .. } => {
                assert!(diagnostic.contains("compilation failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_failure_reports_exit_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = RscriptManager {
            rscript: write_stub(&dir, "exit 3"),
        };

        let err = manager
            .install_from_reference("owner/repo", dir.path(), false)
            .unwrap_err();
        match err {
            RprovError::InstallationFailed { diagnostic, .. } => {
                assert!(diagnostic.contains("exit status"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_debug_failure_reports_exit_status() {
        let dir = tempfile::TempDir::new().unwrap();
        let manager = RscriptManager {
            rscript: write_stub(&dir, "exit 1"),
        };

        let err = manager
            .install_from_url("https://example.org/pkg_1.0.tar.gz", dir.path(), true)
            .unwrap_err();
        match err {
            RprovError::InstallationFailed { diagnostic, .. } => {
                assert!(diagnostic.contains("exit status"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

/*  Strongpw - a randomized password generator
    Copyright (C) 2025 The strongpw developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Runs the PowerShell implementation of the generator, which hands back the password together
//! with a `SecureString`.

use std::{
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use log::debug;

use strongpw::{charsets::Category, GenerationConfig};

/// How long one PowerShell attempt may run before it's killed.
pub const TIMEOUT: Duration = Duration::from_secs(20);

pub fn module_path(cwd: &Path) -> PathBuf {
    cwd.join("ps")
        .join("src")
        .join("StrongPwGenerator.Core.psm1")
}

/// PowerShell executables to try, in order.
pub fn candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["powershell.exe", "pwsh"]
    } else {
        &["pwsh", "powershell"]
    }
}

pub fn build_command(module: &Path, config: &GenerationConfig) -> String {
    let mut call = vec![
        "New-StrongPasswordObject".to_owned(),
        format!("-Length {}", config.length),
    ];

    for (category, switch) in [
        (Category::Latin, "IncludeLatin"),
        (Category::Numbers, "IncludeNumbers"),
        (Category::Signs, "IncludeSigns"),
    ] {
        if config.categories.contains(&category) {
            call.push(format!("-{switch} $true"));
        }
    }
    for (enabled, switch) in [
        (config.include_emoji, "IncludeEmoji"),
        (config.include_symbols, "IncludeSymbols"),
        (config.include_dingbats, "IncludeDingbats"),
    ] {
        if enabled {
            call.push(format!("-{switch} $true"));
        }
    }
    if config.include_all_unicode {
        call.push("-IncludeAllUnicode".to_owned());
    }
    for range in config.exclude_ranges.iter().filter(|r| !r.is_inverted()) {
        call.push(format!(
            "-ExcludeRanges @{{ Start = {}; End = {} }}",
            range.start, range.end
        ));
    }

    [
        format!("Import-Module \"{}\" -Force", module.display()),
        format!("$o = {}", call.join(" ")),
        "$o | ConvertTo-Json -Compress".to_owned(),
    ]
    .join("; ")
}

/// Runs `exe -NoProfile -Command command`, killing it once `timeout` has passed.
pub fn run_with_timeout(exe: &str, command: &str, timeout: Duration) -> Result<String> {
    let mut child = Command::new(exe)
        .args(["-NoProfile", "-Command", command])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("failed to start {exe}"))?;

    let mut stdout = child.stdout.take().context("no stdout")?;
    let reader = thread::spawn(move || -> std::io::Result<String> {
        let mut output = String::new();
        stdout.read_to_string(&mut output)?;
        Ok(output)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            bail!("{exe} timed out after {} seconds", timeout.as_secs());
        }
        thread::sleep(Duration::from_millis(50));
    };

    let output = match reader.join() {
        Ok(output) => output?,
        Err(_) => bail!("reading the output of {exe} failed"),
    };
    if !status.success() {
        bail!("{exe} exited with {status}");
    }

    Ok(output)
}

/// Checks that PowerShell printed a password object rather than something else.
fn check_output(output: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(output).context("PowerShell output was not valid JSON")?;
    if value.get("Password").is_none() {
        bail!("PowerShell output has no Password field");
    }
    Ok(())
}

pub fn run(config: &GenerationConfig, cwd: &Path) -> Result<String> {
    let command = build_command(&module_path(cwd), config);

    for exe in candidates() {
        match run_with_timeout(exe, &command, TIMEOUT) {
            Ok(output) => {
                let output = output.trim();
                check_output(output)?;
                return Ok(output.to_owned());
            }
            Err(err) => debug!("{exe}: {err:#}"),
        }
    }

    bail!(
        "No PowerShell executable found (tried {}).",
        candidates().join(" and ")
    )
}

#[cfg(test)]
#[path = "tests/powershell.rs"]
mod powershell_tests;

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

use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{Args, Parser};
use log::{info, warn};

use strongpw::{
    charsets::Category,
    generate,
    secure_string::{powershell_secure_string_command, PasswordReport},
    settings::{self, Settings},
    GenerationConfig, PasswordResult,
};

mod powershell;

/// Generates strong passwords from latin, script, symbol and Unicode character pools.
#[derive(Parser, Debug)]
#[command(name = "strongpw", author, version)]
struct Cli {
    /// Number of characters (Unicode code points) in the password
    #[arg(long, value_name = "N")]
    length: Option<usize>,

    #[command(flatten)]
    include: Includes,

    /// Never emit code points in this inclusive range, bounds in decimal or 0x hexadecimal
    #[arg(long = "exclude-range", value_name = "START:END")]
    exclude_ranges: Vec<String>,

    /// Print only the password
    #[arg(long, conflicts_with_all = ["json", "ps", "ps_run"])]
    plain: bool,

    /// Print the report as compact JSON
    #[arg(long, conflicts_with_all = ["ps", "ps_run"])]
    json: bool,

    /// Print a PowerShell command creating the password as a SecureString
    #[arg(long, conflicts_with = "ps_run")]
    ps: bool,

    /// Generate the password with the PowerShell generator instead
    #[arg(long = "ps-run", visible_aliases = ["pwsh", "secure"])]
    ps_run: bool,

    /// Store the effective options as defaults in the settings file
    #[arg(long)]
    save_config: bool,
}

#[derive(Args, Debug, Default)]
struct Includes {
    /// Latin letters, at least two upper and two lower case
    #[arg(long)]
    include_latin: bool,
    /// Digits, at least three
    #[arg(long)]
    include_numbers: bool,
    /// Punctuation signs, at least two
    #[arg(long)]
    include_signs: bool,
    #[arg(long)]
    include_cyrillic: bool,
    #[arg(long)]
    include_greek: bool,
    #[arg(long)]
    include_armenian: bool,
    #[arg(long)]
    include_hangul: bool,
    #[arg(long)]
    include_nordic: bool,
    #[arg(long)]
    include_arabic: bool,
    #[arg(long)]
    include_georgian: bool,
    #[arg(long)]
    include_ethiopian: bool,
    #[arg(long)]
    include_thaana: bool,
    #[arg(long)]
    include_hanzi: bool,
    /// Emoji and pictographs
    #[arg(long)]
    include_emoji: bool,
    /// Arrows, math operators, technical and geometric symbols
    #[arg(long)]
    include_symbols: bool,
    #[arg(long)]
    include_dingbats: bool,
    /// Sample from a broad list of Unicode blocks instead of the pools
    #[arg(long = "include-allunicode", visible_alias = "include-all-unicode")]
    include_all_unicode: bool,
}

impl Includes {
    fn categories(&self) -> Vec<Category> {
        [
            (self.include_latin, Category::Latin),
            (self.include_numbers, Category::Numbers),
            (self.include_signs, Category::Signs),
            (self.include_cyrillic, Category::Cyrillic),
            (self.include_greek, Category::Greek),
            (self.include_armenian, Category::Armenian),
            (self.include_hangul, Category::Hangul),
            (self.include_nordic, Category::Nordic),
            (self.include_arabic, Category::Arabic),
            (self.include_georgian, Category::Georgian),
            (self.include_ethiopian, Category::Ethiopian),
            (self.include_thaana, Category::Thaana),
            (self.include_hanzi, Category::Hanzi),
        ]
        .into_iter()
        .filter_map(|(enabled, category)| enabled.then_some(category))
        .collect()
    }

    /// True if any pool was picked on the command line, which replaces the configured
    /// categories. All-Unicode doesn't count, it keeps them for the class minimums.
    fn picks_pools(&self) -> bool {
        !self.categories().is_empty()
            || self.include_emoji
            || self.include_symbols
            || self.include_dingbats
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputMode {
    Pretty,
    Json,
    Plain,
    Ps,
    PsRun,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.plain {
            OutputMode::Plain
        } else if self.json {
            OutputMode::Json
        } else if self.ps {
            OutputMode::Ps
        } else if self.ps_run {
            OutputMode::PsRun
        } else {
            OutputMode::Pretty
        }
    }

    /// Layers the command line on top of the settings.
    fn generation_config(&self, settings: &Settings) -> GenerationConfig {
        let mut config = settings.to_generation_config();

        if let Some(length) = self.length {
            config.length = length;
        }
        if self.include.picks_pools() {
            config.categories = self.include.categories().into_iter().collect();
            config.include_emoji = self.include.include_emoji;
            config.include_symbols = self.include.include_symbols;
            config.include_dingbats = self.include.include_dingbats;
        }
        config.include_all_unicode |= self.include.include_all_unicode;
        config
            .exclude_ranges
            .extend(settings::parse_ranges(&self.exclude_ranges));

        config
    }
}

fn render(result: &PasswordResult, mode: OutputMode) -> Result<String> {
    let rendered = match mode {
        OutputMode::Plain => result.password().to_owned(),
        OutputMode::Ps => powershell_secure_string_command(result.password()),
        OutputMode::Json => serde_json::to_string(&PasswordReport::new(result))?,
        OutputMode::Pretty | OutputMode::PsRun => {
            serde_json::to_string_pretty(&PasswordReport::new(result))?
        }
    };
    Ok(rendered)
}

fn load_settings(
    home: Option<&Path>,
    xdg_config_home: Option<&Path>,
) -> (Settings, Option<PathBuf>) {
    match settings::read_config(home, xdg_config_home) {
        Ok((settings, location)) => (settings, Some(location)),
        Err(err) => {
            warn!("using default settings: {err}");
            (Settings::default(), None)
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let (settings, location) = load_settings(home.as_deref(), xdg_config_home.as_deref());

    let config = cli.generation_config(&settings);

    if cli.save_config {
        let location = location.context("no location for the settings file")?;
        settings::save_config(&Settings::from(&config), &location)
            .with_context(|| format!("saving settings to {}", location.display()))?;
        info!("saved settings to {}", location.display());
    }

    match cli.output_mode() {
        OutputMode::PsRun => {
            let cwd = std::env::current_dir()?;
            powershell::run(&config, &cwd).context("PowerShell invocation failed")
        }
        mode => {
            let result = generate(&config).context("generating the password")?;
            render(&result, mode)
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(2);
        }
    }
}

#[cfg(test)]
#[path = "tests/main.rs"]
mod main_tests;

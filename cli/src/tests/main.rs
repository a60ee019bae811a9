use clap::CommandFactory;
use strongpw::charsets::CodePointRange;

use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("strongpw").chain(args.iter().copied())).unwrap()
}

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn no_arguments_use_settings() {
    let cli = parse(&[]);

    assert_eq!(OutputMode::Pretty, cli.output_mode());
    assert_eq!(
        GenerationConfig::default(),
        cli.generation_config(&Settings::default())
    );
}

#[test]
fn length_and_categories_override_settings() {
    let cli = parse(&["--length", "16", "--include-latin", "--include-greek"]);
    let config = cli.generation_config(&Settings::default());

    assert_eq!(16, config.length);
    assert_eq!(
        vec![Category::Latin, Category::Greek],
        config.categories.into_iter().collect::<Vec<_>>()
    );
}

#[test]
fn range_pool_alone_replaces_default_categories() {
    let cli = parse(&["--include-emoji"]);
    let config = cli.generation_config(&Settings::default());

    assert!(config.include_emoji);
    assert!(config.categories.is_empty());
}

#[test]
fn all_unicode_keeps_default_categories() {
    let cli = parse(&["--include-allunicode"]);
    let config = cli.generation_config(&Settings::default());

    assert!(config.include_all_unicode);
    assert_eq!(3, config.categories.len());

    let alias = parse(&["--include-all-unicode"]);
    assert!(alias.include.include_all_unicode);
}

#[test]
fn exclude_ranges_are_lenient() {
    let cli = parse(&[
        "--exclude-range",
        "0x1740:0x175F",
        "--exclude-range=48:57",
        "--exclude-range",
        "garbage",
        "--exclude-range",
        "0x20:0x10",
    ]);
    let config = cli.generation_config(&Settings::default());

    assert_eq!(
        vec![
            CodePointRange::new(0x1740, 0x175F),
            CodePointRange::new(48, 57)
        ],
        config.exclude_ranges
    );
}

#[test]
fn exclude_ranges_add_to_settings() {
    let settings = Settings {
        exclude_ranges: vec!["0x30:0x39".to_owned()],
        ..Settings::default()
    };
    let cli = parse(&["--exclude-range", "0x41:0x5A"]);

    assert_eq!(2, cli.generation_config(&settings).exclude_ranges.len());
}

#[test]
fn output_modes() {
    assert_eq!(OutputMode::Plain, parse(&["--plain"]).output_mode());
    assert_eq!(OutputMode::Json, parse(&["--json"]).output_mode());
    assert_eq!(OutputMode::Ps, parse(&["--ps"]).output_mode());
    assert_eq!(OutputMode::PsRun, parse(&["--ps-run"]).output_mode());
    assert_eq!(OutputMode::PsRun, parse(&["--pwsh"]).output_mode());
    assert_eq!(OutputMode::PsRun, parse(&["--secure"]).output_mode());
}

#[test]
fn output_modes_conflict() {
    assert!(Cli::try_parse_from(["strongpw", "--plain", "--json"]).is_err());
    assert!(Cli::try_parse_from(["strongpw", "--ps", "--ps-run"]).is_err());
}

#[test]
fn render_plain_and_ps() -> Result<()> {
    let config = GenerationConfig::new(16).with_category(Category::Latin);
    let result = generate(&config)?;

    assert_eq!(result.password(), render(&result, OutputMode::Plain)?);
    assert_eq!(
        format!(
            "ConvertTo-SecureString -String \"{}\" -AsPlainText -Force",
            result.password()
        ),
        render(&result, OutputMode::Ps)?
    );
    Ok(())
}

#[test]
fn render_json() -> Result<()> {
    let result = generate(&GenerationConfig::default())?;

    let compact = render(&result, OutputMode::Json)?;
    assert!(!compact.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&compact)?;
    assert_eq!(value["Password"], result.password());

    let pretty = render(&result, OutputMode::Pretty)?;
    assert!(pretty.contains("\n  \"Password\": "));
    Ok(())
}

#[test]
fn load_settings_without_home_uses_defaults() {
    let (settings, location) = load_settings(None, None);

    assert_eq!(Settings::default(), settings);
    assert!(location.is_none());
}

#[test]
fn load_settings_from_xdg_config_home() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("strongpw")).unwrap();
    std::fs::write(
        dir.path().join("strongpw").join("settings.toml"),
        "length = 12\n",
    )
    .unwrap();

    let (settings, location) = load_settings(None, Some(dir.path()));

    assert_eq!(12, settings.length);
    assert_eq!(
        Some(dir.path().join("strongpw").join("settings.toml")),
        location
    );
}

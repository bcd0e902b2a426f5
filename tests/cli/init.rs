use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["symbols", "directives", "includes", "outDir", "sourceRoot"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["outDir"], "./dist");

    // 2-space indentation
    assert!(content.contains("\n  \""), "Config should use 2-space indentation");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Created .ifdefrc.json\n");
    assert!(test.root().join(".ifdefrc.json").exists());

    let content = test.read_file(".ifdefrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".ifdefrc.json", "{}")?;

    let out = run(test.command().arg("init"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains(".ifdefrc.json already exists"));
    assert_eq!(test.read_file(".ifdefrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(&mut test.command())?;

    assert!(out.stdout.contains("Usage"));

    Ok(())
}

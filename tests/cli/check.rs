use anyhow::Result;

use crate::{CliTest, run};

const BROWSER_SWITCH: &str = r#"// #if BROWSER
console.log('This is browser');
// #else
console.log('unknown');
// #endif
done();
"#;

#[test]
fn test_check_reports_ranges() -> Result<()> {
    let test = CliTest::with_file("src/app.js", BROWSER_SWITCH)?;

    let out = run(test.check_command().args(["-D", "BROWSER"]))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "src/app.js\n  3-5  #else\n✓ Checked 1 file - 1 excluded range in 1 file\n"
    );

    Ok(())
}

#[test]
fn test_check_reads_symbols_from_config() -> Result<()> {
    let test = CliTest::with_file("src/app.js", BROWSER_SWITCH)?;
    test.write_file(".ifdefrc.json", r#"{ "symbols": { "BROWSER": true } }"#)?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("3-5  #else"));

    Ok(())
}

#[test]
fn test_cli_define_overrides_config() -> Result<()> {
    let test = CliTest::with_file("src/app.js", BROWSER_SWITCH)?;
    test.write_file(".ifdefrc.json", r#"{ "symbols": { "BROWSER": true } }"#)?;

    let out = run(test.check_command().args(["-D", "BROWSER=false"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("1-3  #if BROWSER"));

    Ok(())
}

#[test]
fn test_check_clean_project() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "run();\n")?;
    test.write_file("src/util.ts", "export const x: number = 1;\n")?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 2 files - nothing to exclude\n");

    Ok(())
}

#[test]
fn test_check_disabled_custom_directive() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "// #debug\nlog();\nrun();\n")?;

    let out = run(test.check_command().args(["--disable", "debug"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("1-2  #debug"));

    Ok(())
}

#[test]
fn test_check_only_scans_includes() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "run();\n")?;
    test.write_file("scripts/tool.js", "// #if X\nrun();\n// #endif\n")?;
    test.write_file("src/readme.md", "# not code\n")?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.stdout, "✓ Checked 1 file - nothing to exclude\n");

    Ok(())
}

#[test]
fn test_check_parse_error_fails() -> Result<()> {
    let test = CliTest::with_file("src/bad.js", "const = ;\n")?;
    test.write_file("src/good.js", "run();\n")?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("1 file could not be processed"));
    assert!(out.stdout.contains("Checked 2 files"));

    Ok(())
}

#[test]
fn test_check_invalid_define_is_error() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "run();\n")?;

    let out = run(test.check_command().args(["-D", "NOT-AN-IDENT=1"]))?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("is not an identifier"));

    Ok(())
}

#[test]
fn test_check_invalid_config_is_error() -> Result<()> {
    let test = CliTest::with_file("src/app.js", "run();\n")?;
    test.write_file(".ifdefrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let out = run(&mut test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Invalid glob pattern in 'ignores'"));

    Ok(())
}

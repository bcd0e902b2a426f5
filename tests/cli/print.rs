use anyhow::Result;

use crate::{CliTest, run};

#[test]
fn test_print_writes_transformed_source() -> Result<()> {
    let test = CliTest::with_file(
        "src/view.tsx",
        r#"export const View = () => (
  <div>
    {/* #if MOBILE */}
    <Touch />
    {/* #else */}
    <Mouse />
    {/* #endif */}
  </div>
);
"#,
    )?;

    let out = run(&mut test.print_command("src/view.tsx"))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "export const View = () => (\n  <div>\n    <Mouse />\n  </div>\n);\n"
    );

    Ok(())
}

#[test]
fn test_print_custom_directive() -> Result<()> {
    let test = CliTest::with_file("src/app.ts", "// #debug\nlog();\nrun();\n")?;

    let out = run(test.print_command("src/app.ts").args(["--disable", "debug"]))?;
    assert_eq!(out.stdout, "run();\n");

    let out = run(test.print_command("src/app.ts").args(["--enable", "debug"]))?;
    assert_eq!(out.stdout, "log();\nrun();\n");

    Ok(())
}

#[test]
fn test_print_parse_error() -> Result<()> {
    let test = CliTest::with_file("src/bad.js", "const = ;\n")?;

    let out = run(&mut test.print_command("src/bad.js"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.starts_with("error:"));

    Ok(())
}

#[test]
fn test_print_missing_file() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(&mut test.print_command("src/missing.js"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("missing.js"));

    Ok(())
}

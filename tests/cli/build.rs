use anyhow::Result;

use crate::{CliTest, run};

const APP: &str = r#"// #if BROWSER
console.log('This is browser');
// #else
console.log('unknown');
// #endif
done();
"#;

#[test]
fn test_build_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/plain.js", "plain();\n")?;

    let out = run(test.build_command().args(["-D", "BROWSER"]))?;

    assert_eq!(out.code, Some(0));
    assert!(
        out.stdout
            .contains("src/app.js  1 node removed, 3 directives stripped")
    );
    assert!(!out.stdout.contains("plain.js"));
    assert!(out.stdout.contains("1 of 2 files would change"));
    assert!(!test.root().join("dist").exists());

    Ok(())
}

#[test]
fn test_build_apply_writes_out_dir() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/lib/plain.js", "plain();\n")?;

    let out = run(test.build_command().args(["--apply", "-D", "BROWSER"]))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Wrote 2 files"));
    assert_eq!(
        test.read_file("dist/src/app.js")?,
        "console.log('This is browser');\ndone();\n"
    );
    assert_eq!(test.read_file("dist/src/lib/plain.js")?, "plain();\n");
    // Sources are never touched.
    assert_eq!(test.read_file("src/app.js")?, APP);

    Ok(())
}

#[test]
fn test_build_out_dir_flag_overrides_config() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(".ifdefrc.json", r#"{ "outDir": "from-config" }"#)?;

    let out = run(test.build_command().args(["--apply", "--out-dir", "out"]))?;

    assert_eq!(out.code, Some(0));
    assert_eq!(test.read_file("out/src/app.js")?, "console.log('unknown');\ndone();\n");
    assert!(!test.root().join("from-config").exists());

    Ok(())
}

#[test]
fn test_build_skips_previous_output() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file(
        ".ifdefrc.json",
        r#"{ "includes": ["."], "outDir": "dist" }"#,
    )?;
    test.write_file("dist/src/app.js", "stale();\n")?;

    let out = run(test.build_command().arg("--apply"))?;

    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("Wrote 1 file"));
    assert!(!test.root().join("dist/dist").exists());

    Ok(())
}

#[test]
fn test_build_parse_error_skips_file() -> Result<()> {
    let test = CliTest::with_file("src/app.js", APP)?;
    test.write_file("src/bad.js", "const = ;\n")?;

    let out = run(test.build_command().args(["--apply", "-v"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("error:"));
    assert!(test.root().join("dist/src/app.js").exists());
    assert!(!test.root().join("dist/src/bad.js").exists());

    Ok(())
}

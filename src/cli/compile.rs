//! Compile command implementation.
//!
//! Reads an XML theme document and saves it in the format named by the
//! output path's extension.

use std::path::PathBuf;

use clap::Args;

use crate::encode::{save_registry, OutputTarget};
use crate::error::{Result, ThemeError};
use crate::output::{display_path, plural, Printer};
use crate::parser::read_xml_file;

/// Re-encode an XML theme document as pkgdef or XML
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// XML theme document to read
    pub input: PathBuf,

    /// Output file (.pkgdef or .xml)
    #[arg(long, short)]
    pub output: PathBuf,
}

pub fn run(args: CompileArgs, printer: &Printer) -> Result<()> {
    OutputTarget::from_path(&args.output)?;

    if !args.input.is_file() {
        return Err(ThemeError::Io {
            path: args.input.clone(),
            message: "Input does not exist".to_string(),
        });
    }

    printer.status("Reading", &display_path(&args.input));
    let registry = read_xml_file(&args.input)?;

    save_registry(&registry, &args.output)?;
    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(registry.user_theme_count(), "theme", "themes"),
            display_path(&args.output)
        ),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Themes>
  <Theme Name="Night" GUID="{00000000-0000-0000-0000-000000000042}" FallbackId="{1ded0138-47ce-435e-84ef-9ec1f439b749}">
    <Category Name="Environment" GUID="{624ed9c3-bdfd-41fa-96c3-7c824ea32e3d}">
      <Color Name="ToolWindowText">
        <Foreground Type="CT_RAW" Source="FF0000FF" />
      </Color>
    </Category>
  </Theme>
</Themes>"#;

    #[test]
    fn test_compile_to_pkgdef() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Night.xml");
        fs::write(&input, XML).unwrap();
        let output = dir.path().join("out/Night.pkgdef");

        run(
            CompileArgs {
                input,
                output: output.clone(),
            },
            &Printer::new(),
        )
        .unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("[$RootKey$\\Themes\\{00000000-0000-0000-0000-000000000042}]"));
        assert!(text.contains("\"Name\"=\"Night\""));
    }

    #[test]
    fn test_compile_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Night.xml");
        fs::write(&input, XML).unwrap();

        let err = run(
            CompileArgs {
                input,
                output: dir.path().join("Night.txt"),
            },
            &Printer::new(),
        )
        .unwrap_err();

        assert!(err
            .to_string()
            .contains("Invalid file extension '.txt'. Only XML files and PKGDEF files are allowed."));
    }

    #[test]
    fn test_compile_missing_input() {
        let dir = tempdir().unwrap();
        let result = run(
            CompileArgs {
                input: dir.path().join("absent.xml"),
                output: dir.path().join("out.pkgdef"),
            },
            &Printer::new(),
        );
        assert!(result.is_err());
    }
}

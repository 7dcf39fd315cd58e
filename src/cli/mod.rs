//! CLI module for doc2md

mod args;

pub use args::Args;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging;
use crate::output::MarkdownRenderer;
use crate::parser::PythonParser;
use std::path::Path;
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let program = std::env::args().next().unwrap_or_else(|| "doc2md".to_string());

    match execute(args, &program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e {
                Error::Usage { .. } => eprintln!("{}", e),
                _ => eprintln!("Error: {}", e),
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Document every file in turn. The first failure stops the run; pages
/// already written stay on disk.
pub fn execute(args: Args, program: &str) -> Result<()> {
    if args.files.is_empty() {
        return Err(Error::usage(program));
    }

    let mut cfg = Config::load_optional(args.config.as_deref())?;
    cfg.merge_cli(args.output);
    cfg.validate()?;

    tracing::debug!(
        output = %cfg.output.directory.display(),
        class_docs = cfg.inspect.class_docs,
        method_placeholder = cfg.render.method_placeholder,
        "configuration"
    );

    let mut parser = PythonParser::with_options(cfg.inspect.clone())?;
    let renderer = MarkdownRenderer::new(cfg.render.clone());

    for file in &args.files {
        let module = parser.load(file)?;
        let page = renderer.render(&module);

        if args.stdout {
            println!("{}", page);
        } else {
            write_page(&cfg.output.directory, file, &module.name, &page)?;
        }
    }

    Ok(())
}

/// Write one page as `<dir>/<module>.md`, creating the directory if needed
fn write_page(dir: &Path, file: &Path, module_name: &str, page: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let shown = dir.display().to_string();
    println!(
        "Writing documentation for {} in {}/",
        file.display(),
        shown.trim_end_matches('/')
    );

    let target = dir.join(format!("{}.md", module_name));
    std::fs::write(&target, page)?;
    tracing::debug!(path = %target.display(), bytes = page.len(), "wrote page");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args_for(files: Vec<PathBuf>, output: &Path) -> Args {
        Args {
            files,
            output: Some(output.to_path_buf()),
            config: None,
            stdout: false,
            verbose: false,
        }
    }

    #[test]
    fn test_no_files_is_usage_error() {
        let dir = TempDir::new().unwrap();
        let err = execute(args_for(vec![], dir.path()), "doc2md").unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Usage: doc2md <file.py>");
    }

    #[test]
    fn test_writes_page_per_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("shapes.py");
        std::fs::write(&src, "\"\"\"Shapes.\"\"\"\n\ndef area(w, h=1):\n    pass\n").unwrap();
        let out = dir.path().join("doc");

        execute(args_for(vec![src], &out), "doc2md").unwrap();

        let page = std::fs::read_to_string(out.join("shapes.md")).unwrap();
        assert!(page.starts_with("# shapes  \nShapes.  \n"));
        assert!(page.contains("### `area(w, h=1)`"));
    }

    #[test]
    fn test_stops_at_first_load_error() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.py");
        let later = dir.path().join("later.py");
        std::fs::write(&good, "X = 1\n").unwrap();
        std::fs::write(&later, "Y = 2\n").unwrap();
        let missing = dir.path().join("missing.py");
        let out = dir.path().join("doc");

        let err = execute(args_for(vec![good, missing, later], &out), "doc2md").unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(out.join("good.md").exists());
        assert!(!out.join("missing.md").exists());
        assert!(!out.join("later.md").exists());
    }

    #[test]
    fn test_config_file_applies() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("widgets.py");
        std::fs::write(&src, "class Widget:\n    \"\"\"A widget.\"\"\"\n").unwrap();
        let out = dir.path().join("site");
        let config = dir.path().join("doc2md.toml");
        std::fs::write(
            &config,
            format!("[output]\ndirectory = {:?}\n\n[inspect]\nclass_docs = true\n", out),
        )
        .unwrap();

        let args = Args {
            files: vec![src],
            output: None,
            config: Some(config),
            stdout: false,
            verbose: false,
        };
        execute(args, "doc2md").unwrap();

        let page = std::fs::read_to_string(out.join("widgets.md")).unwrap();
        assert!(page.contains("### class `Widget()`\nA widget.  "));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("m.py");
        std::fs::write(&src, "").unwrap();
        let mut args = args_for(vec![src], dir.path());
        args.config = Some(dir.path().join("absent.toml"));

        let err = execute(args, "doc2md").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.exit_code(), 1);
    }
}

use std::process::ExitCode;

fn main() -> ExitCode {
    doc2md::cli::run()
}

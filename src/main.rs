//! gitgate binary entry point.

fn main() {
    if let Err(e) = gitgate::cli::run() {
        gitgate::ui::output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}

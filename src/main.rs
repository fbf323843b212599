fn main() {
    if let Err(e) = homescout::app::run_cli() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

use demonstrativo_core::cli::run_cli;

fn main() {
    demonstrativo_core::init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

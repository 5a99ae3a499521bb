use forgeboard::cli;

fn main() {
    if let Err(err) = cli::main() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

use sovq::error::ErrorKind;

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        let code = match e.kind() {
            ErrorKind::Validation => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Storage => 1,
        };
        std::process::exit(code);
    }
}

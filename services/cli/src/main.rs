fn main() {
    if let Err(err) = grantdesk_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

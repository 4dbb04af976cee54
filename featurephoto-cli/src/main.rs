//! Entry point for the `featurephoto` command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = featurephoto_cli::run() {
        eprintln!("featurephoto: {err}");
        std::process::exit(1);
    }
}

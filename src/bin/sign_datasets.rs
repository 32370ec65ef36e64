use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    sign_language_datasets::cli::run(std::env::args().skip(1))
}

use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    lanchat::cli::main()
}

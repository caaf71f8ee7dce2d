use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    friendchat::cli::main()
}

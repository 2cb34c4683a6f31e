fn main() -> Result<(), Box<dyn std::error::Error>> {
    tribe::cli::main()
}

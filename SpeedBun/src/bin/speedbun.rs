fn main() -> anyhow::Result<()> {
    speedbun::cli::run_cli()
}

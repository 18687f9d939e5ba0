fn main() -> anyhow::Result<()> {
    study_cli::run()
}

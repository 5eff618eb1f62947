fn main() -> anyhow::Result<()> {
    let settings = potion_table::AppConfig::load()?;
    potion_table::run(settings)
}

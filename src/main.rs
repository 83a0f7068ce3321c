fn main() -> anyhow::Result<()> {
    casebook::run()
}

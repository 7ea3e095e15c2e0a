fn main() -> anyhow::Result<()> {
    fuo_launch::run()
}

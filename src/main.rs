fn main() -> anyhow::Result<()> {
    env_logger::init();

    swingset::default()?.run()
}

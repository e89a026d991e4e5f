fn main() -> anyhow::Result<()> {
    popcorn_app::run()
}

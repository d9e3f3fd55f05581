#[tokio::main]
async fn main() -> anyhow::Result<()> {
    panda_bridge::run().await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ctfrag_server::start().await
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    labtrack_backend::run().await
}

#[tokio::main]
async fn main() {
    pawhub_backend::run().await;
}

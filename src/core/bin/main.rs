use lms::core::library::LibraryError;

#[tokio::main]
async fn main() -> Result<(), LibraryError> {
    lms::core::server::run().await
}

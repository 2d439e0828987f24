use ipboard::{Client, Error};
#[tokio::main]
async fn main() {
    let client = Client::builder()
        .base_url("http://127.0.0.1:1/")
        .unwrap()
        .api_key("secret-key")
        .build()
        .unwrap();
    let err = client.hello().await.unwrap_err();
    eprintln!("{:?}", err);
}

//! Batched tag history retrieval with explicit options.
//!
//! ```sh
//! cargo run --example history
//! ```

use ip21_client::{
    Config, Credentials, HistoryOptions, Ip21Client, ResponseResult, RetrievalType,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Ip21Client::new(
        Config::new()
            .credentials(Credentials::new("john.doe", "CONTOSO", "set_your_own_password"))
            .sqlplus_address("127.0.0.1")
            .ip21_address("127.0.0.1"),
    )?;

    // Last hour, hourly averages, both tags in one request.
    let end_ms = 1_700_003_600_000;
    let start_ms = end_ms - 3_600_000;
    let result = client
        .history(
            ["FC101.PV", "TC102.PV"],
            start_ms,
            end_ms,
            HistoryOptions::new()
                .limit(1000)
                .retrieval_type(RetrievalType::Average),
        )
        .await?;

    match result {
        ResponseResult::Payload(data) => println!("{data:#}"),
        ResponseResult::Error(err) => eprintln!("{} ({})", err.message, err.status),
    }

    Ok(())
}

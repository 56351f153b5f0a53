//! Basic usage: run an ad-hoc SQL query against the historian.
//!
//! ```sh
//! cargo run --example basic
//! ```

use ip21_client::{Config, Credentials, Ip21Client, ResponseResult};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ip21_client=debug".into()),
        )
        .init();

    let client = Ip21Client::new(
        Config::new()
            .credentials(Credentials::new("john.doe", "CONTOSO", "set_your_own_password"))
            .sqlplus_address("127.0.0.1")
            .ip21_address("127.0.0.1")
            .debug(true),
    )?;

    match client
        .query("SELECT IP_PLANT_AREA, Name, IP_DESCRIPTION FROM IP_AnalogDef")
        .await?
    {
        ResponseResult::Payload(rows) => println!("rows: {rows:#}"),
        ResponseResult::Error(err) => eprintln!("{} ({})", err.message, err.status),
    }

    Ok(())
}

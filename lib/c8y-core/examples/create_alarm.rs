//! Reads an alarm, then creates a copy of it on another device.
//!
//! ```sh
//! C8Y_BASEURL=https://t12345.cumulocity.com C8Y_TOKEN=... \
//!     cargo run --example create_alarm -- <alarm id> <device id>
//! ```

use anyhow::Context;
use c8y_core::{ApiClient, Authentication, catalog};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let base_url = std::env::var("C8Y_BASEURL").context("C8Y_BASEURL is not set")?;
    let token = std::env::var("C8Y_TOKEN").context("C8Y_TOKEN is not set")?;
    let mut args = std::env::args().skip(1);
    let alarm_id = args.next().context("missing alarm id")?;
    let device_id = args.next().context("missing device id")?;

    let client = ApiClient::builder()
        .with_base_url(&base_url)?
        .with_authentication(Authentication::Bearer(token.into()))
        .build()?;

    let mut alarm = client
        .operation(&catalog::GET_ALARM)?
        .with_path_param("id", &alarm_id)
        .await?
        .as_payload()?;

    // Read-only fields (`id`, `count`, `source.self`, ...) are dropped on the way out
    if let Some(fields) = alarm.as_object_mut() {
        let _ = fields.insert("source".to_string(), json!({"id": device_id}).try_into()?);
    }
    let created = client
        .operation(&catalog::CREATE_ALARM)?
        .json(&alarm)?
        .await?
        .as_json::<serde_json::Value>()?;

    tracing::info!(id = %created["id"], "alarm created");
    Ok(())
}

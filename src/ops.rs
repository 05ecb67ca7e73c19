use crate::api_client::CliClient;
use anyhow::{Context, Result};
use serde_json::json;

/// GET example: storage efficiency savings for volumes on vserver vs1.
pub fn show_efficiency_savings(client: &CliClient) -> Result<()> {
    let query = [("vserver", "vs1"), ("fields", "size,used,sis-space-saved")];
    let output = client
        .execute("volume show", &query, None)
        .context("running REST CLI get call")?;

    for record in output["records"].as_array().into_iter().flatten() {
        println!("{record}");
    }
    Ok(())
}

/// POST example: create a new efficiency policy.
pub fn create_efficiency_policy(client: &CliClient) -> Result<()> {
    let body = json!({
        "vserver": "vs1",
        "policy": "AlwaysOn",
        "schedule": "5min",
        "qos-policy": "background"
    });
    let output = client
        .execute("volume efficiency policy create", &[], Some(&body))
        .context("running REST CLI post call")?;

    println!("{output}");
    Ok(())
}

/// PATCH example: update the efficiency policy assigned to a volume.
pub fn assign_efficiency_policy(client: &CliClient) -> Result<()> {
    let query = [("vserver", "vs1"), ("volume", "clitestvol")];
    let body = json!({ "policy": "AlwaysOn" });
    let output = client
        .execute("volume efficiency modify", &query, Some(&body))
        .context("running REST CLI patch call")?;

    println!("{output}");
    Ok(())
}

/// DELETE example: delete an efficiency policy.
pub fn delete_efficiency_policy(client: &CliClient) -> Result<()> {
    let body = json!({ "vserver": "vs1", "policy": "AlwaysOn" });
    let output = client
        .execute("volume efficiency policy delete", &[], Some(&body))
        .context("running REST CLI delete call")?;

    println!("{output}");
    Ok(())
}

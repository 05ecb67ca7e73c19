use anyhow::Result;
use clap::{Parser, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Password};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Examples of GET, POST, PATCH, and DELETE ONTAP REST API CLI passthrough operations"
)]
pub struct Args {
    /// Cluster name or IP
    #[arg(short, long, required = true, env = "ONTAP_CLUSTER")]
    pub cluster: String,

    /// Username to connect with
    #[arg(short, long, default_value = "admin", env = "ONTAP_USERNAME")]
    pub username: String,

    /// Password for username; prompted for when omitted
    #[arg(short, long, env = "ONTAP_PASSWORD")]
    pub password: Option<String>,

    /// Log every API call and response
    #[arg(short, long)]
    pub debug: bool,

    /// Operation to run against the cluster
    #[arg(value_enum, default_value = "GET")]
    pub operation: Operation,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum Operation {
    Get,
    Post,
    Patch,
    Delete,
}

impl Args {
    pub fn password(&self) -> Result<String> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => Ok(Password::with_theme(&ColorfulTheme::default())
                .with_prompt("Password")
                .interact()?),
        }
    }
}

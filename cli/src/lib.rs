//! Script driven front end for the autocomplete text field.
//!
//! Interactions are read from stdin one per line and applied to a
//! [`TextField`] that queries an HTTP lookup endpoint. Everything the field
//! does is printed to stdout as JSON lines; logs go to stderr.

mod cli;
mod driver;
mod host;
mod script;

use std::collections::HashMap;
use std::sync::Arc;

use oxi_lookup_client::HttpLookupTransport;
use oxi_text_field::FieldContent;
use oxi_text_field::FieldServices;
use oxi_text_field::FieldSettings;
use oxi_text_field::TextField;
use oxi_text_field::field_event_channel;
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use serde_json::json;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
pub use driver::Driver;
pub use host::CliHost;
pub use host::HostNotice;
pub use script::Command;
pub use script::ParseCommandError;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = match &cli.settings {
        Some(path) => FieldSettings::load(path)?,
        None => FieldSettings::default(),
    };
    debug!(?settings, "field settings");

    let mut transport = HttpLookupTransport::new(cli.endpoint.clone())?
        .with_user_agent(format!("oxi-field/{}", env!("CARGO_PKG_VERSION")));
    if let Some(token) = &cli.bearer_token {
        transport = transport.with_bearer_token(token.clone());
    }

    let (host, notices) = CliHost::new(form_values(&cli));
    let (events, rx) = field_event_channel();
    let field = TextField::new(
        field_content(&cli),
        FieldServices {
            host: Arc::new(host),
            transport: Arc::new(transport),
            events,
        },
    )?
    .with_settings(settings);

    let mut driver = Driver::new(field, rx, notices, std::io::stdout());
    driver.run(BufReader::new(tokio::io::stdin())).await
}

/// The autocomplete descriptor assembled from the command line.
fn field_content(cli: &Cli) -> FieldContent {
    let params: JsonMap<String, JsonValue> = cli
        .params
        .iter()
        .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
        .collect();
    let form_params: Vec<&str> = cli.form_params.iter().map(|(name, _)| name.as_str()).collect();
    FieldContent {
        value: cli.value.clone(),
        autocomplete: Some(json!({
            "action": cli.action,
            "params": params,
            "form_params": form_params,
        })),
    }
}

fn form_values(cli: &Cli) -> HashMap<String, JsonValue> {
    cli.form_params
        .iter()
        .map(|(name, value)| (name.clone(), JsonValue::String(value.clone())))
        .collect()
}

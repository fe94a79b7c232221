use clap::Parser;
use std::path::PathBuf;

/// Drive an autocomplete text field from a script read on stdin.
///
/// Each line is one interaction (`type <text>`, `paste <text>`, `up`, `down`,
/// `enter`, `esc`, `focus`, `blur`, `click <n>`, `wait`, `quit`). The field
/// state is printed to stdout as one JSON object per line.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// URL the lookup requests are POSTed to.
    #[arg(long)]
    pub endpoint: String,

    /// Name of the server side search action.
    #[arg(long)]
    pub action: String,

    /// Static parameter sent with every lookup.
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Value of a sibling form field. Every name given here is sent along
    /// with the lookups.
    #[arg(long = "form-param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub form_params: Vec<(String, String)>,

    /// Initial value of the field.
    #[arg(long)]
    pub value: Option<String>,

    /// TOML file with `debounce_ms` and `min_query_chars`.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Bearer token for the lookup endpoint.
    #[arg(long, env = "OXI_LOOKUP_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

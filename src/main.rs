use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use swagger_guard::{
    load_swagger_spec, ApiValidator, HttpMethod, Outcome, RequestParts, ValidatorOptions,
};

/// Check one HTTP request against a Swagger 2.0 document
#[derive(Parser, Debug)]
#[command(name = "swagger-guard", version)]
struct Cli {
    /// Swagger document (YAML or JSON)
    spec: PathBuf,

    /// Request method, e.g. GET
    method: String,

    /// Request URL including base path and query string
    url: String,

    /// JSON request body
    #[arg(long)]
    body: Option<String>,

    /// Reject fields the document does not declare
    #[arg(long)]
    strict: bool,

    /// Reject explicit nulls in the body
    #[arg(long)]
    disallow_null: bool,
}

fn run(cli: Cli) -> Result<bool> {
    let document = load_swagger_spec(&cli.spec)
        .with_context(|| format!("Failed to load {}", cli.spec.display()))?;

    let options = ValidatorOptions {
        strict: cli.strict,
        allow_null: !cli.disallow_null,
    };
    let validator = ApiValidator::new(&document, options)?;

    let method = HttpMethod::from_str(&cli.method)
        .map_err(|_| anyhow!("Unsupported HTTP method: {}", cli.method))?;
    let mut request = RequestParts::new(method, cli.url);
    if let Some(body) = &cli.body {
        request = request.with_body(serde_json::from_str(body).context("Invalid JSON body")?);
    }

    match validator.all().handle(&request)? {
        Outcome::Continue => {
            println!("OK");
            Ok(true)
        }
        Outcome::Rejected(rejection) => {
            let response = rejection.into_response();
            print!("{} {}", response.status, response.body);
            Ok(false)
        }
        Outcome::Handled(response) => {
            print!("{} {}", response.status, response.body);
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use esg_core::config::{ClientConfig, EnvOrigin, StaticOrigin, API_ORIGIN_ENV};
use esg_core::context::{FixedLocation, Location, ServerContext};
use esg_core::signature::RequestSignature;
use esg_core::token::{NoToken, StaticToken, API_TOKEN_ENV};
use esg_core::transport::ReqwestTransport;
use esg_core::{parse_method, ApiClient, ApiClientBuilder, ClientError};

use crate::table;

#[derive(Parser, Debug)]
#[command(name = "esg")]
#[command(about = "Talk to the ESG disclosure API from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a request through the shared API client
    Request(RequestArgs),
    /// Print the origin requests would be sent to
    Resolve(EndpointArgs),
    /// Print the deduplication signature of a request
    Signature(SignatureArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct EndpointArgs {
    /// API origin; placeholders such as ${API_URL} and "undefined" are ignored
    #[arg(long, env = API_ORIGIN_ENV)]
    pub origin: Option<String>,

    /// Page URL to resolve against, as a browser would (gateway port is
    /// substituted for the page port)
    #[arg(long)]
    pub page_url: Option<String>,

    /// Gateway port used with --page-url
    #[arg(long, env = "ESG_GATEWAY_PORT")]
    pub gateway_port: Option<u16>,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method, e.g. GET or POST
    pub method: String,

    /// Path below the API origin, e.g. /api/v1/emissions
    pub path: String,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Extra header as 'Name: value'; may be repeated
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Bearer token; a leading 'Bearer ' is kept as is
    #[arg(long, env = API_TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Print status and response headers before the body
    #[arg(short, long)]
    pub include: bool,

    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Args, Debug)]
pub struct SignatureArgs {
    pub method: String,
    pub url: String,

    /// JSON request body
    #[arg(short, long)]
    pub data: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Request(args) => run_request(args).await,
            Commands::Resolve(args) => run_resolve(args),
            Commands::Signature(args) => run_signature(args),
        }
    }
}

pub(crate) fn parse_body(data: Option<&str>) -> Result<Option<Value>> {
    data.map(|raw| serde_json::from_str(raw).with_context(|| format!("invalid JSON body: {raw}")))
        .transpose()
}

pub(crate) fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("header must look like 'Name: value', got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("header name is empty in {raw:?}");
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn client_builder(endpoint: &EndpointArgs) -> Result<ApiClientBuilder> {
    let mut config = ClientConfig::from_env();
    if let Some(port) = endpoint.gateway_port {
        config = config.with_gateway_port(port);
    }

    let mut builder = ApiClient::builder()
        .transport(ReqwestTransport::new(&config)?)
        .config(config);

    builder = match &endpoint.origin {
        Some(origin) => builder.origin_source(StaticOrigin::new(origin.clone())),
        None => builder.origin_source(EnvOrigin::default()),
    };

    builder = match &endpoint.page_url {
        Some(page) => {
            let location =
                Location::parse(page).ok_or_else(|| anyhow!("invalid page URL: {page}"))?;
            builder.context(FixedLocation(location))
        }
        None => builder.context(ServerContext),
    };

    Ok(builder)
}

async fn run_request(args: RequestArgs) -> Result<()> {
    let method = parse_method(&args.method)?;
    let body = parse_body(args.data.as_deref())?;
    let headers = args
        .headers
        .iter()
        .map(|h| parse_header(h))
        .collect::<Result<Vec<_>>>()?;

    let builder = client_builder(&args.endpoint)?;
    let client = match args.token {
        Some(token) => builder.tokens(StaticToken(token)),
        None => builder.tokens(NoToken),
    }
    .build()?;

    log::debug!("Resolved origin: {}", client.resolver().resolve());

    match client.dispatch(method, &args.path, body, &headers).await {
        Ok(response) => {
            if args.include {
                println!("{}", table::render_response_head(&response));
            }
            println!("{}", pretty_body(&response.body));
            Ok(())
        }
        Err(ClientError::HttpStatus { status, body }) => {
            eprintln!("{}", pretty_body(&body));
            bail!("request failed with HTTP {status}")
        }
        Err(e) => Err(e.into()),
    }
}

fn run_resolve(args: EndpointArgs) -> Result<()> {
    let client = client_builder(&args)?.tokens(NoToken).build()?;
    let origin = client.resolver().resolve();
    let pairs = [
        ("configured", args.origin.clone().unwrap_or_else(|| "-".to_string())),
        ("page", args.page_url.clone().unwrap_or_else(|| "-".to_string())),
        ("origin", origin),
    ];
    println!("{}", table::render_pairs(&pairs));
    Ok(())
}

pub(crate) fn signature_for(args: &SignatureArgs) -> Result<RequestSignature> {
    let method = parse_method(&args.method)?;
    let body = parse_body(args.data.as_deref())?;
    Ok(RequestSignature::new(method.as_str(), &args.url, body.as_ref()))
}

fn run_signature(args: SignatureArgs) -> Result<()> {
    println!("{}", signature_for(&args)?);
    Ok(())
}

/// Pretty-print JSON bodies; anything else is returned unchanged.
pub(crate) fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

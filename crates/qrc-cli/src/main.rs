//! `qrc` - drive the QR code editor from a terminal

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use qrc_core::EditorConfig;
use qrc_model::DestinationMode;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

mod commands;

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("QR code id")
}

fn body_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("title")
            .long("title")
            .required(true)
            .help("Title shown to store staff"),
    )
    .arg(
        Arg::new("product-id")
            .long("product-id")
            .required(true)
            .help("Product the code links to"),
    )
    .arg(
        Arg::new("variant-id")
            .long("variant-id")
            .required(true)
            .help("Variant added to the cart in checkout mode"),
    )
    .arg(
        Arg::new("handle")
            .long("handle")
            .required(true)
            .help("Storefront handle of the product"),
    )
    .arg(
        Arg::new("destination")
            .long("destination")
            .default_value("product")
            .value_parser(value_parser!(DestinationMode))
            .help("Scan destination: product or checkout"),
    )
    .arg(
        Arg::new("discount-id")
            .long("discount-id")
            .help("Discount to apply; resolved through the configured catalog"),
    )
}

fn cli() -> Command {
    Command::new("qrc")
        .version(qrc_core::VERSION)
        .about("QR code editor")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the URL a scan would open")
                .arg(
                    Arg::new("handle")
                        .long("handle")
                        .required(true)
                        .help("Storefront handle of the product"),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .default_value("product")
                        .value_parser(value_parser!(DestinationMode))
                        .help("product or checkout"),
                )
                .arg(Arg::new("variant").long("variant").help("Variant id"))
                .arg(Arg::new("discount").long("discount").help("Discount code"))
                .arg(
                    Arg::new("origin")
                        .long("origin")
                        .value_parser(value_parser!(Url))
                        .help("Storefront origin; defaults to the configured one"),
                ),
        )
        .subcommand(body_args(Command::new("create").about("Create a QR code")))
        .subcommand(body_args(
            Command::new("update")
                .about("Replace an existing QR code")
                .arg(id_arg()),
        ))
        .subcommand(
            Command::new("delete")
                .about("Delete a QR code")
                .arg(id_arg()),
        )
        .subcommand(Command::new("discounts").about("List discount codes from the catalog"))
        .subcommand(
            Command::new("image-url")
                .about("Print the QR image URL")
                .arg(id_arg()),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig> {
    let config = match path {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    tracing::debug!(api = %config.api_base_url, storefront = %config.storefront_origin, "config loaded");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    commands::run(&config, &matches).await
}

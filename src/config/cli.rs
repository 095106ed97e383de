use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::domain::content::{Category, Language};

/// Command-line arguments for the koborin binary.
#[derive(Debug, Parser)]
#[command(name = "koborin", version, about = "koborin.ai content feeds")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "KOBORIN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the feed endpoints over HTTP.
    Serve(Box<ServeArgs>),
    /// Write every feed to a directory for static hosting.
    Export(ExportArgs),
    /// Scaffold a new draft article.
    New(NewArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ContentOverride {
    /// Override the content directory.
    #[arg(long = "content-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub content: ContentOverride,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the public site origin used in feed links.
    #[arg(long = "site-origin", value_name = "URL")]
    pub site_origin: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub content: ContentOverride,

    /// Directory receiving the rendered feeds.
    #[arg(value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct NewArgs {
    #[command(flatten)]
    pub content: ContentOverride,

    /// Article language (en|ja).
    #[arg(long = "lang", value_name = "LANG", default_value = "en")]
    pub language: Language,

    /// Article category (tech|life).
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: Category,

    /// Article title; the file slug is derived from it.
    #[arg(long = "title", value_name = "TITLE")]
    pub title: String,

    /// One-line summary stored in the front-matter.
    #[arg(long = "description", value_name = "TEXT")]
    pub description: String,
}

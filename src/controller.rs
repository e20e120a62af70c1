use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, trace};

use crate::domain::{Message, TVConfig, TVError};
use crate::model::Model;
use crate::render::OutputFormat;

/// Load delimited data files and filter or search them.
#[derive(Parser, Debug)]
#[command(name = "tv", version, about)]
pub struct Args {
    /// Data files to add to the file list.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Raw drop payload: space separated paths, `{...}` around paths with spaces.
    #[arg(long, value_name = "RAW")]
    pub drop: Vec<String>,

    /// File name from the file list to display. Defaults to the first file.
    #[arg(long, value_name = "NAME")]
    pub open: Option<String>,

    /// Case-insensitive free text search across all columns.
    #[arg(short, long, value_name = "TERM", conflicts_with = "filters")]
    pub search: Option<String>,

    /// Case-sensitive substring filter on one column, repeat to AND several.
    #[arg(short = 'f', long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<String>,

    /// Accepted extensions for dropped paths (default: csv).
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the file list instead of a table.
    #[arg(long)]
    pub list: bool,

    /// Truncate cells wider than this in table output.
    #[arg(long, value_name = "WIDTH")]
    pub max_width: Option<usize>,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Turns one command line invocation into the messages the model understands.
pub struct Controller {
    args: Args,
}

impl Controller {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn config(&self) -> TVConfig {
        let mut cfg = TVConfig::default();
        if !self.args.extensions.is_empty() {
            let extensions = self
                .args
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
            cfg = cfg.extensions(extensions);
        }
        if let Some(width) = self.args.max_width {
            cfg = cfg.max_column_width(width);
        }
        cfg
    }

    /// Messages that fill the file list. Only positional files are typed by
    /// the user and get `~`/`$VAR` expansion; drop payloads are passed on as is.
    pub fn file_messages(&self) -> Vec<Message> {
        let messages: Vec<Message> = self
            .args
            .files
            .iter()
            .map(|path| Message::AddFile(expand_path(path)))
            .chain(self.args.drop.iter().cloned().map(Message::DropFiles))
            .collect();
        trace!("Mapped file arguments => {messages:?}");
        messages
    }

    /// Messages that open a file and narrow its view. Needs the file list
    /// already populated to pick the default file.
    pub fn view_messages(&self, model: &Model) -> Result<Vec<Message>, TVError> {
        let name = match &self.args.open {
            Some(name) => name.clone(),
            None => model
                .files()
                .names()
                .first()
                .cloned()
                .ok_or_else(|| TVError::LoadingFailed("No data file given".into()))?,
        };

        let mut messages = vec![Message::Open(name)];
        if !self.args.filters.is_empty() {
            messages.push(Message::FilterColumns(parse_column_filters(
                &self.args.filters,
            )?));
        } else if let Some(term) = &self.args.search {
            messages.push(Message::Search(term.clone()));
        }
        trace!("Mapped view arguments => {messages:?}");
        Ok(messages)
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            debug!("Could not expand {raw}: {e}");
            path.to_path_buf()
        }
    }
}

/// Parse `COLUMN=VALUE` arguments into a column filter.
///
/// Only the first `=` splits, so values may contain `=`. A repeated column
/// keeps the last value.
pub fn parse_column_filters(filters: &[String]) -> Result<HashMap<String, String>, TVError> {
    filters
        .iter()
        .map(|filter| match filter.split_once('=') {
            Some((column, value)) if !column.is_empty() => {
                Ok((column.to_string(), value.to_string()))
            }
            Some(_) => Err(TVError::InvalidQuery(format!(
                "missing column name in \"{filter}\""
            ))),
            None => Err(TVError::InvalidQuery(format!(
                "expected COLUMN=VALUE, got \"{filter}\""
            ))),
        })
        .collect()
}

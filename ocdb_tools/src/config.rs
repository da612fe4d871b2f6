use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Log filter directives, in `tracing_subscriber::EnvFilter` syntax.
pub const ENV_VAR_LOG: &str = "OCDB_LOG";
pub const DEFAULT_LOG: &str = "info";

/// Only keys whose name matches this regex are listed.
pub const ENV_VAR_KEY_FILTER: &str = "OCDB_KEY_FILTER";

#[derive(Debug)]
pub struct Config {
    pub log: String,
    pub key_filter: Option<Regex>,
    pub paths: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let log = env::var(ENV_VAR_LOG).ok();
        let key_filter = env::var(ENV_VAR_KEY_FILTER).ok();
        Self::new(log, key_filter.as_deref(), env::args_os().skip(1))
    }

    pub fn new(
        log: Option<String>,
        key_filter: Option<&str>,
        args: impl IntoIterator<Item = OsString>,
    ) -> Result<Self> {
        let key_filter = key_filter
            .map(|pat| Regex::new(pat).with_context(|| format!("{ENV_VAR_KEY_FILTER}={pat:?}")))
            .transpose()?;
        let paths = args.into_iter().map(PathBuf::from).collect::<Vec<_>>();
        if paths.is_empty() {
            return Err(anyhow!("Usage: ocdb_ls <file>..."));
        }
        Ok(Self {
            log: log.unwrap_or_else(|| DEFAULT_LOG.to_owned()),
            key_filter,
            paths,
        })
    }
}

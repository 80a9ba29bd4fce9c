use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug,Error)]
pub enum PvError {
    /// the helper exited non-zero or wrote to stderr
    #[error("Error from pvcmd {args:?} (status {status:?}): {stderr}")]
    RemoteCommand {
        args:Vec<String>,
        status:Option<i32>,
        stderr:String,
    },

    #[error("failed to launch {binary:?}: {source}")]
    Launch {
        binary:PathBuf,
        #[source]
        source:io::Error,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("application '{0}' is not running")]
    AppNotRunning(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config file is corrupt: {0}")]
    Config(#[from] toml::de::Error),

    #[error("cannot write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T,PvError>;

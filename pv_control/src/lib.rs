/*
    Driving ParaVision from outside the gui. There is no rpc api, only the pvcmd helper,
    which runs one command against a named application and whatever dataset that
    application currently has selected.

    PvCmd     -> the suite: discovers running applications
    PvApp     -> one application: parameter get/set and commands
    PvScan    -> scan control and its selection cursor
    PvObj     -> one dataset, re-selected before every access
 */
pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod obj;
pub mod registry;
pub mod scan;
pub mod value;

pub use app::PvApp;
pub use config::PvConfig;
pub use error::{PvError, Result};
pub use gateway::{Gateway, PvCmdProcess};
pub use obj::{AdjustmentCategory, AdjustmentKind, PvObj, UndoTarget};
pub use registry::PvCmd;
pub use scan::{ObjListEntry, PvScan, Target};
pub use value::PvValue;

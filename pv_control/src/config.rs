use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use toml;
use tracing::{info, warn};
use crate::error::Result;

pub const XWINNMRHOME_VAR:&str = "XWINNMRHOME";
pub const DEFAULT_XWINNMRHOME:&str = "/opt/PV5.1";
pub const PVCMD_SUBPATH:&str = "prog/bin/scripts/pvcmd";
pub const FALLBACK_PVCMD:&str = "./pvcmd.tester";
pub const SCAN_APP:&str = "pvScan";
pub const EXIT_APP:&str = "pvCmd";
pub const EXPNO_PATH_TEMPLATE:&str = "{DU}/data/{USER}/nmr/{NAME}/{EXPNO}/pdata/1";

#[derive(Clone,Debug,Serialize,Deserialize)]
#[serde(default)]
pub struct PvConfig {
    pub xwinnmrhome:Option<PathBuf>,
    /// explicit path to the pvcmd helper, overrides xwinnmrhome
    pub pvcmd:Option<PathBuf>,
    pub fallback_pvcmd:PathBuf,
    pub scan_app:String,
    pub exit_app:String,
    pub expno_path_template:String,
    pub adjustment_settle_secs:u64,
    pub obj_list_bound:u32,
}

impl Default for PvConfig {
    fn default() -> Self {
        Self {
            xwinnmrhome: None,
            pvcmd: None,
            fallback_pvcmd: PathBuf::from(FALLBACK_PVCMD),
            scan_app: String::from(SCAN_APP),
            exit_app: String::from(EXIT_APP),
            expno_path_template: String::from(EXPNO_PATH_TEMPLATE),
            adjustment_settle_secs: 10,
            obj_list_bound: 100,
        }
    }
}

impl PvConfig {

    pub fn from_file(filename:&Path) -> Result<Self> {
        let t = fs::read_to_string(filename)?;
        Ok(toml::from_str(&t)?)
    }

    pub fn to_file(&self, filename:&Path) -> Result<()> {
        let t = toml::to_string_pretty(&self)?;
        fs::write(filename,t)?;
        Ok(())
    }

    pub fn load(filename:Option<&Path>) -> Result<Self> {
        match filename {
            Some(f) => Self::from_file(f),
            None => Ok(Self::default())
        }
    }

    pub fn xwinnmrhome(&self) -> PathBuf {
        match &self.xwinnmrhome {
            Some(home) => home.clone(),
            None => match std::env::var_os(XWINNMRHOME_VAR) {
                Some(home) => PathBuf::from(home),
                None => {
                    warn!("{} not set, defaulting to {}",XWINNMRHOME_VAR,DEFAULT_XWINNMRHOME);
                    PathBuf::from(DEFAULT_XWINNMRHOME)
                }
            }
        }
    }

    /// the helper binary to run. An installed pvcmd that isn't executable
    /// falls back to the test harness.
    pub fn pvcmd_binary(&self) -> PathBuf {
        if let Some(p) = &self.pvcmd {
            return p.clone()
        }
        let home = self.xwinnmrhome();
        info!("XWINNMRHOME:{:?}",home);
        let pvcmd = home.join(PVCMD_SUBPATH);
        if is_exe(&pvcmd) {
            pvcmd
        } else {
            warn!("{:?} not executable, pvcmd using test harness {:?}",pvcmd,self.fallback_pvcmd);
            self.fallback_pvcmd.clone()
        }
    }

    pub fn adjustment_settle(&self) -> Duration {
        Duration::from_secs(self.adjustment_settle_secs)
    }
}

#[cfg(unix)]
pub fn is_exe(path:&Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match fs::metadata(path) {
        Ok(m) => m.is_file() && m.permissions().mode() & 0o111 != 0,
        Err(_) => false
    }
}

#[cfg(not(unix))]
pub fn is_exe(path:&Path) -> bool {
    path.is_file()
}

use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{error, info};
use crate::app::PvApp;
use crate::config::PvConfig;
use crate::error::{PvError, Result};
use crate::gateway::{Gateway, PvCmdProcess};
use crate::scan::PvScan;

/// The whole ParaVision suite as seen through pvcmd: one proxy per running application.
/// Applications are discovered once, at construction.
pub struct PvCmd {
    pv:Rc<dyn Gateway>,
    apps:BTreeMap<String,PvApp>,
    scan:Option<PvScan>,
    scan_app:String,
    exit_app:String,
}

impl PvCmd {

    /// connect through the pvcmd binary the config points at
    pub fn from_config(cfg:&PvConfig) -> Self {
        let binary = cfg.pvcmd_binary();
        Self::new(Rc::new(PvCmdProcess::new(&binary)),cfg)
    }

    /// Discovery problems leave the registry degraded rather than failing:
    /// whatever applications are reachable stay usable.
    pub fn new(pv:Rc<dyn Gateway>, cfg:&PvConfig) -> Self {
        let mut apps = BTreeMap::<String,PvApp>::new();
        match running_apps(pv.as_ref()) {
            Ok(names) => names.iter().for_each(|name| {
                apps.insert(name.clone(),PvApp::new(name,pv.clone()));
            }),
            Err(e) => error!("unable to list running apps: {}",e),
        }
        info!("Apps:{:?}",apps.keys().collect::<Vec<_>>());
        let scan = match apps.remove(&cfg.scan_app) {
            Some(app) => Some(PvScan::new(app,cfg)),
            None => {
                error!("{} not in running apps: {:?}",cfg.scan_app,apps.keys().collect::<Vec<_>>());
                None
            }
        };
        Self {
            pv,
            apps,
            scan,
            scan_app: cfg.scan_app.clone(),
            exit_app: cfg.exit_app.clone(),
        }
    }

    pub fn gateway(&self) -> &Rc<dyn Gateway> {
        &self.pv
    }

    pub fn app_names(&self) -> Vec<String> {
        let mut names:Vec<String> = self.apps.keys().cloned().collect();
        if self.scan.is_some() {
            names.push(self.scan_app.clone());
            names.sort();
        }
        names
    }

    pub fn app(&self, name:&str) -> Result<&PvApp> {
        if name == self.scan_app {
            return self.scan().map(|s| s.app())
        }
        self.apps.get(name).ok_or_else(|| PvError::AppNotRunning(name.to_string()))
    }

    pub fn scan(&self) -> Result<&PvScan> {
        self.scan.as_ref().ok_or_else(|| PvError::AppNotRunning(self.scan_app.clone()))
    }

    pub fn set_verbose(&self, verbose:bool) {
        self.pv.set_verbose(verbose)
    }

    pub fn is_verbose(&self) -> bool {
        self.pv.is_verbose()
    }

    /// tell ParaVision to exit
    pub fn exit(&self) -> Result<String> {
        self.app(&self.exit_app)?.command(&["pvCmdExit"])
    }
}

/// names of the applications pvcmd can currently talk to
pub fn running_apps(pv:&dyn Gateway) -> Result<Vec<String>> {
    let names = pv.run(&["-l"])?;
    Ok(names.split_whitespace().map(|s| s.to_string()).collect())
}

use std::fmt;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::thread;
use tracing::info;
use crate::error::{PvError, Result};
use crate::scan::PvScan;
use crate::value::PvValue;

/// A single ParaVision dataset (scan + reco), identified by its procno path.
///
/// The handle caches nothing. Every access first selects the dataset in scan control,
/// because anything else (the gui, another script) may have moved the selection since.
pub struct PvObj<'a> {
    path:String,
    scan:&'a PvScan,
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum AdjustmentKind {
    /// receiver gain
    Rcvr,
    /// center frequency
    Freq,
    /// x,y,z shim
    Shim,
    /// reference transmitter gain
    Transm,
}

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub enum AdjustmentCategory {
    #[default]
    Standard,
    Current,
}

#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub enum UndoTarget {
    #[default]
    Scan,
    Reco,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Rcvr => "RCVR",
            AdjustmentKind::Freq => "FREQ",
            AdjustmentKind::Shim => "SHIM",
            AdjustmentKind::Transm => "TRANSM",
        }
    }
}

impl FromStr for AdjustmentKind {
    type Err = PvError;
    fn from_str(s:&str) -> Result<Self> {
        match s {
            "RCVR" => Ok(AdjustmentKind::Rcvr),
            "FREQ" => Ok(AdjustmentKind::Freq),
            "SHIM" => Ok(AdjustmentKind::Shim),
            "TRANSM" => Ok(AdjustmentKind::Transm),
            _=> Err(PvError::InvalidArgument(format!("Adjustment must be RCVR, FREQ, SHIM or TRANSM, not '{}'",s)))
        }
    }
}

impl AdjustmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentCategory::Standard => "Standard",
            AdjustmentCategory::Current => "Current",
        }
    }
}

impl FromStr for AdjustmentCategory {
    type Err = PvError;
    fn from_str(s:&str) -> Result<Self> {
        match s {
            "Standard" => Ok(AdjustmentCategory::Standard),
            "Current" => Ok(AdjustmentCategory::Current),
            _=> Err(PvError::InvalidArgument(format!("Adjustment category must be Standard or Current, not '{}'",s)))
        }
    }
}

impl UndoTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            UndoTarget::Scan => "Scan",
            UndoTarget::Reco => "Reco",
        }
    }
}

impl FromStr for UndoTarget {
    type Err = PvError;
    fn from_str(s:&str) -> Result<Self> {
        match s {
            "Scan" => Ok(UndoTarget::Scan),
            "Reco" => Ok(UndoTarget::Reco),
            _=> Err(PvError::InvalidArgument(format!("Undo: what must be Scan or Reco, not '{}'",s)))
        }
    }
}

impl<'a> PvObj<'a> {

    pub fn new(path:&str, scan:&'a PvScan) -> Result<Self> {
        if !Path::new(path).is_dir() {
            return Err(PvError::InvalidSelection(format!("invalid object path: '{}'",path)))
        }
        Ok(Self {
            path: path.to_string(),
            scan,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// path to the object's reconstruction
    pub fn proc_path(&self) -> &str {
        &self.path
    }

    /// path to the object's experiment
    pub fn exp_path(&self) -> String {
        parent_components(&self.path,2)
    }

    /// path to the object's study
    pub fn study_path(&self) -> String {
        parent_components(&self.path,3)
    }

    /// make this object the remote selection. A dataset that has been deleted
    /// since the handle was made can't be selected.
    pub fn select(&self) -> Result<()> {
        if !Path::new(&self.path).is_dir() {
            return Err(PvError::InvalidSelection(format!("dataset no longer exists: '{}'",self.path)))
        }
        self.scan.set_obj(self)
    }

    pub fn get_param(&self, name:&str) -> Result<PvValue> {
        self.select()?;
        self.scan.get_param(name)
    }

    pub fn set_param<T:Display>(&self, name:&str, value:T) -> Result<()> {
        self.select()?;
        self.scan.set_param(name,value)
    }

    /// clone the scan; scan control selects the clone, which is read back as the new handle
    pub fn clone_scan(&self) -> Result<PvObj<'a>> {
        info!("[{}] Clone",self.path);
        self.select()?;
        self.scan.command(&["pvDsetClone","Scan","Current"])?;
        self.scan.current_obj()
    }

    pub fn clone_reco(&self) -> Result<PvObj<'a>> {
        info!("[{}] CloneReco",self.path);
        self.select()?;
        self.scan.command(&["pvDsetClone","Reco","Current"])?;
        self.scan.current_obj()
    }

    /// drop the object from the scan control list, the dataset stays on disk
    pub fn remove_from_list(&self) -> Result<()> {
        info!("[{}] RemoveFromList",self.path);
        self.select()?;
        self.scan.command(&["pvDsetObjListRemove",&self.path])?;
        Ok(())
    }

    pub fn export_to_topspin(&self) -> Result<()> {
        info!("[{}] ExportToTopspin",self.path);
        self.run(&["pvDsetExport"])
    }

    pub fn delete(self) -> Result<()> {
        info!("[{}] Delete",self.path);
        self.run(&["pvDsetDel","Scan","Current","-Control","-Alt"])
    }

    pub fn delete_reco(self) -> Result<()> {
        info!("[{}] DeleteReco",self.path);
        self.run(&["pvDsetDel","Reco","Current","-Control","-Alt"])
    }

    /// the traffic light in the scan control window
    pub fn start(&self) -> Result<()> {
        info!("[{}] Start",self.path);
        self.run(&["pvStartScan","-Control","-Alt"])
    }

    /// stop the pipeline and the running scan. May leave a dialog open in the gui.
    pub fn stop(&self) -> Result<()> {
        info!("[{}] Stop",self.path);
        self.select()?;
        self.scan.command(&["pvStopMultiPipe"])?;
        self.scan.command(&["pvStopPipe",&self.path])?;
        self.scan.sync(Some(&self.path))
    }

    pub fn gop(&self) -> Result<()> {
        info!("[{}] Gop",self.path);
        self.run(&["pvStartGop",&self.path,"-Control","-Alt"])
    }

    pub fn gsp(&self) -> Result<()> {
        info!("[{}] Gsp",self.path);
        self.run(&["pvStartGsp",&self.path])
    }

    pub fn undo(&self, what:UndoTarget) -> Result<()> {
        info!("[{}] Undo({})",self.path,what.as_str());
        self.run(&["pvDsetUndo",what.as_str(),"Current","-Control","-Alt"])
    }

    /// run a calibration. The routine keeps going after the command returns, so
    /// wait out the settle time before syncing.
    pub fn adjustment(&self, kind:AdjustmentKind, category:AdjustmentCategory) -> Result<()> {
        info!("[{}] Adjustment({},{})",self.path,kind.as_str(),category.as_str());
        let adj = format!("{}_{}",kind.as_str(),category.as_str());
        self.select()?;
        self.scan.command(&["pvStartGsauto","-cmd",&adj])?;
        thread::sleep(self.scan.adjustment_settle());
        self.scan.sync(Some(&self.path))
    }

    // select, command, sync on our path
    fn run(&self, cmd:&[&str]) -> Result<()> {
        self.select()?;
        self.scan.command(cmd)?;
        self.scan.sync(Some(&self.path))
    }
}

fn parent_components(path:&str, n:usize) -> String {
    let parts:Vec<&str> = path.split('/').collect();
    let keep = parts.len().saturating_sub(n);
    parts[0..keep].join("/")
}

impl PartialEq for PvObj<'_> {
    fn eq(&self, other:&Self) -> bool {
        self.path == other.path
    }
}

impl Eq for PvObj<'_> {}

impl fmt::Display for PvObj<'_> {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.path)
    }
}

impl fmt::Debug for PvObj<'_> {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{{{}}}",self.path)
    }
}

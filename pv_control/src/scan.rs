/*
    PvScan wraps the scan control application. It owns the only selection cursor
    ParaVision gives us: every parameter read/write and every dataset command acts on
    whatever object is currently selected there.
 */
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;
use regex::Regex;
use tracing::{debug, info, warn};
use crate::app::PvApp;
use crate::config::PvConfig;
use crate::error::{PvError, Result};
use crate::obj::PvObj;

pub const EXPNO_TOKEN:&str = "EXPNO";

pub const STUDY_KEYS:[&str;15] = [
    "studyname", "subjectid", "subjectname", "birthdate", "type", "gender",
    "remarks", "name", "studyloc", "coil", "entry", "position",
    "weight", "referral", "purpose"
];

/// what to select: a dataset path, or an experiment number in the loaded study
#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Target {
    Path(String),
    ExpNo(u32),
}

impl FromStr for Target {
    type Err = PvError;
    fn from_str(s:&str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PvError::InvalidSelection(String::from("empty selection")))
        }
        Ok(match s.parse::<u32>() {
            Ok(n) => Target::ExpNo(n),
            Err(_) => Target::Path(s.to_string())
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Path(p) => write!(f,"{}",p),
            Target::ExpNo(n) => write!(f,"{}",n),
        }
    }
}

impl From<u32> for Target {
    fn from(n:u32) -> Self {
        Target::ExpNo(n)
    }
}

impl From<&str> for Target {
    fn from(p:&str) -> Self {
        Target::Path(p.to_string())
    }
}

impl From<String> for Target {
    fn from(p:String) -> Self {
        Target::Path(p)
    }
}

impl From<&PvObj<'_>> for Target {
    fn from(obj:&PvObj<'_>) -> Self {
        Target::Path(obj.path().to_string())
    }
}

pub struct ObjListEntry<'a> {
    pub index:u32,
    pub obj:PvObj<'a>,
    /// empty if the Method parameter couldn't be read
    pub method:String,
}

pub struct PvScan {
    app:PvApp,
    expno_path_template:String,
    adjustment_settle:Duration,
    obj_list_bound:u32,
}

impl Deref for PvScan {
    type Target = PvApp;
    fn deref(&self) -> &PvApp {
        &self.app
    }
}

impl PvScan {

    pub fn new(app:PvApp, cfg:&PvConfig) -> Self {
        Self {
            app,
            expno_path_template: cfg.expno_path_template.clone(),
            adjustment_settle: cfg.adjustment_settle(),
            obj_list_bound: cfg.obj_list_bound,
        }
    }

    pub fn app(&self) -> &PvApp {
        &self.app
    }

    pub fn adjustment_settle(&self) -> Duration {
        self.adjustment_settle
    }

    pub fn study_path(&self) -> Result<String> {
        self.command(&["pvDsetPath","-path","STUDY"])
    }

    pub fn exp_path(&self) -> Result<String> {
        self.command(&["pvDsetPath","-path","EXPNO"])
    }

    pub fn proc_path(&self) -> Result<String> {
        self.command(&["pvDsetPath","-path","PROCNO"])
    }

    pub fn popup(&self, message:&str) -> Result<String> {
        self.command(&["pvErrorAlert","Python",message])
    }

    /// auto-acknowledge the error dialogs that allow it
    pub fn disable_some_errors(&self) -> Result<String> {
        self.command(&["CprNoWait","setdef","ackn","ok"])
    }

    /// dataset path for an experiment number in the currently loaded study
    pub fn expno_path(&self, expno:u32) -> Result<String> {
        compose_template(&self.expno_path_template,expno,|param| self.get_param_raw(param))
    }

    /// make `target` the remote selection
    pub fn set_obj<T:Into<Target>>(&self, target:T) -> Result<()> {
        let target = target.into();
        debug!("SetObj({})",target);
        let path = match target {
            Target::Path(p) => p,
            Target::ExpNo(expno) => {
                let dir = self.expno_path(expno)?;
                if !Path::new(&dir).is_dir() {
                    return Err(PvError::InvalidSelection(format!("invalid (empty) expno: {} ({})",expno,dir)))
                }
                dir
            }
        };
        self.command_quiet(&["pvDsetObjSel",&path])?;
        Ok(())
    }

    /// handle for whatever is selected right now
    pub fn current_obj(&self) -> Result<PvObj<'_>> {
        let path = self.proc_path()?;
        PvObj::new(&path,self)
    }

    /// the currently selected object, or the object at experiment number `index`.
    /// A selection that can't be resolved to a dataset gives None.
    pub fn get_obj(&self, index:Option<u32>, restore:bool) -> Result<Option<PvObj<'_>>> {
        info!("GetObj({:?},{})",index,restore);
        let mut previous = None;
        if let Some(index) = index {
            if restore {
                previous = self.selected_path();
            }
            if let Err(e) = self.set_obj(index) {
                self.reselect(previous)?;
                return Err(e)
            }
        }
        let obj = match self.current_obj() {
            Ok(obj) => Some(obj),
            Err(e) => {
                warn!("GetObj: unable to get obj at ({:?}): {}",index,e);
                None
            }
        };
        self.reselect(previous)?;
        Ok(obj)
    }

    /// walk the experiment numbers of the loaded study until one fails to resolve or
    /// repeats. The selection in place before the call is put back afterwards.
    pub fn get_obj_list(&self) -> Result<Vec<ObjListEntry<'_>>> {
        info!("GetObjList");
        let previous = self.selected_path();
        if previous.is_none() {
            warn!("GetObjList: no selection to restore");
        }
        let list = self.scan_obj_list();
        self.reselect(previous)?;
        Ok(list)
    }

    // remote selection as reported, whether or not it's a local dataset
    fn selected_path(&self) -> Option<String> {
        match self.proc_path() {
            Ok(p) if !p.is_empty() => Some(p),
            Ok(_) => None,
            Err(e) => {
                warn!("unable to read current selection: {}",e);
                None
            }
        }
    }

    fn reselect(&self, previous:Option<String>) -> Result<()> {
        match previous {
            Some(p) => self.set_obj(p),
            None => Ok(())
        }
    }

    fn scan_obj_list(&self) -> Vec<ObjListEntry<'_>> {
        let mut list = Vec::<ObjListEntry>::new();
        let mut seen = HashSet::<String>::new();
        for index in 1..self.obj_list_bound {
            let obj = match self.get_obj(Some(index),false) {
                Ok(Some(obj)) => obj,
                Ok(None) => {
                    warn!("GetObjList: nothing at {}, end of list",index);
                    break
                }
                Err(e) => {
                    warn!("GetObjList: end of list at {}: {}",index,e);
                    break
                }
            };
            if !seen.insert(obj.path().to_string()) {
                break
            }
            let method = obj.get_param("Method").map(|m| m.to_string()).unwrap_or_default();
            list.push(ObjListEntry{index,obj,method});
        }
        list
    }

    /// create a new study, returns what pvDsetCreateStudy reports (the new path)
    pub fn create_study(&self, fields:&[(&str,&str)]) -> Result<String> {
        info!("CreateStudy:{:?}",fields);
        let subject = fields.iter().find(|(k,_)| *k == "subjectid").map(|(_,v)| v.trim());
        if subject.map_or(true,|s| s.is_empty()) {
            return Err(PvError::InvalidArgument(String::from("CreateStudy: invalid (empty) subjectid")))
        }
        let mut args = vec!["pvDsetCreateStudy".to_string()];
        for (k,v) in fields {
            if !STUDY_KEYS.contains(k) {
                warn!("CreateStudy: bad arg {}",k);
                continue
            }
            args.push(format!("-{}",k));
            args.push(v.to_string());
        }
        let args:Vec<&str> = args.iter().map(|a| a.as_str()).collect();
        self.command(&args)
    }

    /// new scan in the current subject/study from a protocol
    pub fn new_scan(&self, location:&str, protocol:&str) -> Result<PvObj<'_>> {
        info!("NewScan({},{})",location,protocol);
        self.command(&["pvDsetSsel","New",location,protocol])?;
        self.current_obj()
    }
}

const TOKEN_PATTERN:&str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

// constant pattern, covered by template_token_pattern below
fn token_regex() -> &'static Regex {
    static RE:OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

/// fill `{PARAM}` tokens from `lookup` and `{EXPNO}` from expno
pub fn compose_template<F>(template:&str, expno:u32, mut lookup:F) -> Result<String>
    where F:FnMut(&str) -> Result<String> {
    let mut values = HashMap::<String,String>::new();
    values.insert(EXPNO_TOKEN.to_string(),expno.to_string());
    for caps in token_regex().captures_iter(template) {
        let name = &caps[1];
        if !values.contains_key(name) {
            values.insert(name.to_string(),lookup(name)?);
        }
    }
    let composed = token_regex().replace_all(template,|caps:&regex::Captures| {
        values.get(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(composed.into_owned())
}

#![allow(dead_code)]
/*
    In-memory stand-in for ParaVision behind pvcmd. It keeps the one selection cursor
    scan control has, backs datasets with real directories under a temp dir, and records
    every request so tests can check the exact sequence that went out.
 */
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use pv_control::{Gateway, PvCmd, PvConfig, PvError, Result};
use tempfile::TempDir;

pub const USER:&str = "nmrsu";
pub const STUDY:&str = "study";

pub struct FakePv {
    pub root:TempDir,
    pub apps:Vec<String>,
    pub calls:RefCell<Vec<Vec<String>>>,
    pub selected:RefCell<Option<String>>,
    pub globals:RefCell<HashMap<String,String>>,
    pub params:RefCell<HashMap<(String,String),String>>,
    /// any request containing this argument fails with stderr output
    pub fail_on:RefCell<Option<String>>,
    /// datasets the remote can select that have no local directory
    pub remote_only:RefCell<HashSet<String>>,
    /// selected path -> path the remote reports back for it
    pub reported:RefCell<HashMap<String,String>>,
}

impl FakePv {

    pub fn new(expnos:&[u32]) -> Rc<Self> {
        Self::with_apps(expnos,&["pvScan","pvCmd","gui"])
    }

    pub fn with_apps(expnos:&[u32], apps:&[&str]) -> Rc<Self> {
        let root = tempfile::tempdir().unwrap();
        let mut globals = HashMap::new();
        globals.insert(String::from("DU"),root.path().to_str().unwrap().to_string());
        globals.insert(String::from("USER"),USER.to_string());
        globals.insert(String::from("NAME"),STUDY.to_string());
        let fake = Self {
            root,
            apps: apps.iter().map(|a| a.to_string()).collect(),
            calls: RefCell::new(vec![]),
            selected: RefCell::new(None),
            globals: RefCell::new(globals),
            params: RefCell::new(HashMap::new()),
            fail_on: RefCell::new(None),
            remote_only: RefCell::new(HashSet::new()),
            reported: RefCell::new(HashMap::new()),
        };
        for n in expnos {
            fs::create_dir_all(fake.expno_path(*n)).unwrap();
        }
        Rc::new(fake)
    }

    pub fn study_dir(&self) -> PathBuf {
        self.root.path().join("data").join(USER).join("nmr").join(STUDY)
    }

    pub fn expno_path(&self, n:u32) -> String {
        self.study_dir().join(n.to_string()).join("pdata").join("1").to_str().unwrap().to_string()
    }

    pub fn select(&self, path:&str) {
        *self.selected.borrow_mut() = Some(path.to_string());
    }

    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn set_dataset_param(&self, path:&str, name:&str, value:&str) {
        self.params.borrow_mut().insert((path.to_string(),name.to_string()),value.to_string());
    }

    pub fn dataset_param(&self, path:&str, name:&str) -> Option<String> {
        self.params.borrow().get(&(path.to_string(),name.to_string())).cloned()
    }

    pub fn add_remote_dataset(&self, path:&str) {
        self.remote_only.borrow_mut().insert(path.to_string());
    }

    /// after `selected` is selected, path queries answer with `reported`
    pub fn report_path(&self, selected:&str, reported:&str) {
        self.reported.borrow_mut().insert(selected.to_string(),reported.to_string());
    }

    pub fn fail_on(&self, arg:&str) {
        *self.fail_on.borrow_mut() = Some(arg.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.join(" ")).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn stderr(&self, args:&[&str], msg:&str) -> PvError {
        PvError::RemoteCommand {
            args: args.iter().map(|a| a.to_string()).collect(),
            status: Some(0),
            stderr: msg.to_string(),
        }
    }

    fn next_expno(&self) -> u32 {
        fs::read_dir(self.study_dir()).unwrap()
            .flat_map(|e| e.ok())
            .flat_map(|e| e.file_name().to_str().and_then(|s| s.parse::<u32>().ok()))
            .max().unwrap_or(0) + 1
    }

    fn get(&self, name:&str) -> Option<String> {
        if let Some(sel) = self.selected() {
            if let Some(v) = self.dataset_param(&sel,name) {
                return Some(v)
            }
        }
        self.globals.borrow().get(name).cloned()
    }

    fn scan_command(&self, args:&[&str], cmd:&[&str]) -> Result<String> {
        let sel = self.selected();
        match cmd {
            ["pvDsetObjSel",path] => {
                if !Path::new(path).is_dir() && !self.remote_only.borrow().contains(*path) {
                    return Err(self.stderr(args,"no such dataset"))
                }
                self.select(path);
                Ok(String::new())
            }
            ["pvDsetPath","-path",level] => {
                let sel = sel.ok_or_else(|| self.stderr(args,"no dataset selected"))?;
                let sel = self.reported.borrow().get(&sel).cloned().unwrap_or(sel);
                let p = PathBuf::from(&sel);
                Ok(match *level {
                    "PROCNO" => sel,
                    "EXPNO" => p.parent().unwrap().parent().unwrap().to_str().unwrap().to_string(),
                    _=> p.parent().unwrap().parent().unwrap().parent().unwrap().to_str().unwrap().to_string(),
                })
            }
            ["pvDsetClone",_,"Current"] => {
                sel.ok_or_else(|| self.stderr(args,"no dataset selected"))?;
                let new = self.expno_path(self.next_expno());
                fs::create_dir_all(&new).unwrap();
                self.select(&new);
                Ok(String::new())
            }
            ["pvDsetDel",_,"Current",..] => {
                let sel = sel.ok_or_else(|| self.stderr(args,"no dataset selected"))?;
                fs::remove_dir_all(Path::new(&sel).parent().unwrap().parent().unwrap()).unwrap();
                *self.selected.borrow_mut() = None;
                Ok(String::new())
            }
            ["pvDsetSsel","New",_,_] => {
                let new = self.expno_path(self.next_expno());
                fs::create_dir_all(&new).unwrap();
                self.select(&new);
                Ok(String::new())
            }
            ["pvDsetCreateStudy",..] => Ok(self.study_dir().to_str().unwrap().to_string()),
            ["CmdList"] => Ok(String::from("pvDsetObjSel pvDsetPath pvDsetClone")),
            _=> Ok(String::new())
        }
    }
}

impl Gateway for FakePv {
    fn run(&self, args:&[&str]) -> Result<String> {
        self.calls.borrow_mut().push(args.iter().map(|a| a.to_string()).collect());
        if let Some(f) = self.fail_on.borrow().as_deref() {
            if args.contains(&f) {
                return Err(self.stderr(args,"rejected by remote"))
            }
        }
        match args {
            ["-l"] => Ok(self.apps.join(" ")),
            ["-s",_] => Ok(String::new()),
            ["-get",_,name] => self.get(name).ok_or_else(|| self.stderr(args,"unknown parameter")),
            ["-set",_,name,value] => {
                let sel = self.selected().unwrap_or_default();
                self.set_dataset_param(&sel,name,value);
                Ok(String::new())
            }
            ["-a","pvScan","-r",cmd @ ..] => self.scan_command(args,cmd),
            ["-a","pvScan",cmd @ ..] => self.scan_command(args,cmd),
            ["-a",_,..] => Ok(String::new()),
            _=> Err(self.stderr(args,"bad arguments"))
        }
    }
}

pub fn config() -> PvConfig {
    let mut cfg = PvConfig::default();
    cfg.adjustment_settle_secs = 0;
    cfg
}

pub fn connect(fake:&Rc<FakePv>) -> PvCmd {
    PvCmd::new(fake.clone(),&config())
}

/// the last `-a pvScan pvDsetObjSel` request before position `index`
pub fn last_select_before(calls:&[String], index:usize) -> Option<&String> {
    calls[..index].iter().rev().find(|c| c.starts_with("-a pvScan pvDsetObjSel "))
}

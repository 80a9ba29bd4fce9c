use std::collections::BTreeMap;
use anyhow::{anyhow, bail, Result};
use pv_control::{AdjustmentCategory, AdjustmentKind, PvCmd, PvObj, PvValue, Target, UndoTarget};
use tracing::warn;
use crate::args::*;

pub const GEOM_PARAMS:[&str;4] = ["PVM_VoxArrSize", "PVM_VoxArrPosition", "PVM_VoxExcOrder", "PVM_VoxArrCSDisplacement"];

const SYSTEM_PARAMS:[(&str,&str);8] = [
    ("Institution:   ", "ACQ_institution"),
    ("System:        ", "ACQ_station"),
    ("PV version:    ", "ACQ_sw_version"),
    ("Status:        ", "ACQ_status"),
    ("Config Status: ", "CONFIG_status_string"),
    ("Shim Status:   ", "CONFIG_shim_status"),
    ("Instrument:    ", "CONFIG_instrument_type"),
    ("Max gradient:  ", "PVM_GradCalConst"),
];

const INFO_PARAMS:[(&str,&str);8] = [
    ("Scan Method:   ", "Method"),
    ("Scan Name:     ", "ACQ_scan_name"),
    ("Scan Completed:", "ACQ_completed"),
    ("Scan Duration: ", "PVM_ScanTimeStr"),
    ("Reco Image:    ", "RECO_image_type"),
    ("BF1:           ", "BF1"),
    ("RG:            ", "RG"),
    ("RefAtt:        ", "PVM_RefAttCh1"),
];

#[derive(Debug,PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct PvShell {
    pv:PvCmd,
    /// geometry clipboard filled by getgeom
    geom:BTreeMap<String,PvValue>,
}

impl PvShell {

    pub fn new(pv:PvCmd) -> Self {
        Self {
            pv,
            geom: BTreeMap::new(),
        }
    }

    pub fn prompt(&self) -> String {
        let current = self.pv.scan().ok()
            .and_then(|s| s.get_obj(None,true).ok().flatten())
            .map(|o| o.to_string())
            .unwrap_or_else(|| String::from("None"));
        format!("{} > ",current)
    }

    fn current(&self) -> Result<PvObj<'_>> {
        self.pv.scan()?.get_obj(None,true)?.ok_or_else(|| anyhow!("no object selected"))
    }

    pub fn run(&mut self, action:&Action) -> Result<Flow> {
        match action {
            Action::System => {
                let scan = self.pv.scan()?;
                for (label,param) in SYSTEM_PARAMS {
                    println!("{} {}",label,show(scan.get_param(param)));
                }
            }
            Action::Ls => {
                for entry in self.pv.scan()?.get_obj_list()? {
                    println!("{} {} {}",entry.index,entry.obj,entry.method);
                }
            }
            Action::Man => println!("{}",self.pv.scan()?.command_list()?),
            Action::Info => {
                let obj = self.current()?;
                for (label,param) in INFO_PARAMS {
                    println!("{} {}",label,show(obj.get_param(param)));
                }
            }
            Action::Pwd => println!("{}",self.pv.scan()?.proc_path()?),
            Action::Verbose => {
                let verbose = !self.pv.is_verbose();
                self.pv.set_verbose(verbose);
                println!("verbose= {}",verbose);
            }
            Action::Rm => {
                let obj = self.current()?;
                println!("deleting {}",obj);
                obj.delete()?;
            }
            Action::Study(args) => {
                let scan = self.pv.scan()?;
                if args.fields.is_empty() {
                    println!("{}",scan.study_path()?);
                } else {
                    let fields = study_fields(&args.fields).map_err(|e| anyhow!(e))?;
                    println!("{}",scan.create_study(&fields)?);
                }
            }
            Action::Clone => println!("{}",self.current()?.clone_scan()?),
            Action::Export => self.current()?.export_to_topspin()?,
            Action::Sel(args) => self.pv.scan()?.set_obj(args.target.parse::<Target>()?)?,
            Action::Cd(args) => self.pv.scan()?.set_obj(args.expno)?,
            Action::P(args) => {
                match self.current()?.get_param(&args.name) {
                    Ok(v) => println!("{} = {}",args.name,v),
                    Err(e) => {
                        warn!("p {}: {}",args.name,e);
                        println!("'{}' not set.",args.name);
                    }
                }
            }
            Action::Set(args) => self.current()?.set_param(&args.name,args.value.join(" "))?,
            Action::Start => self.current()?.start()?,
            Action::Stop => self.current()?.stop()?,
            Action::Undo(args) => {
                let what = match &args.what {
                    Some(w) => w.parse::<UndoTarget>()?,
                    None => UndoTarget::default()
                };
                self.current()?.undo(what)?
            }
            Action::Gop => self.current()?.gop()?,
            Action::Gsp => self.current()?.gsp()?,
            Action::Adjust(args) => {
                let kind = args.kind.parse::<AdjustmentKind>()?;
                let category = match &args.category {
                    Some(c) => c.parse::<AdjustmentCategory>()?,
                    None => AdjustmentCategory::default()
                };
                self.current()?.adjustment(kind,category)?
            }
            Action::Getgeom => {
                let obj = self.current()?;
                let mut geom = BTreeMap::new();
                for param in GEOM_PARAMS {
                    let v = obj.get_param(param)?;
                    println!("{} = {}",param,v);
                    geom.insert(param.to_string(),v);
                }
                self.geom = geom;
            }
            Action::Setgeom => {
                if self.geom.is_empty() {
                    bail!("must run \"getgeom\" before \"setgeom\"");
                }
                let obj = self.current()?;
                for (param,v) in &self.geom {
                    println!("setting {} = {}",param,v);
                    obj.set_param(param,v)?;
                }
            }
            Action::Kill => {
                self.pv.exit()?;
            }
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

fn show(v:pv_control::Result<PvValue>) -> String {
    match v {
        Ok(v) => v.to_string(),
        Err(e) => {
            warn!("{}",e);
            String::from("-")
        }
    }
}

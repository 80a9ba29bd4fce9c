use std::fmt::Display;
use std::rc::Rc;
use tracing::info;
use crate::error::Result;
use crate::gateway::Gateway;
use crate::value::PvValue;

/// One named ParaVision application, reached through pvcmd.
/// Holds no state of its own, everything lives on the remote side.
#[derive(Clone)]
pub struct PvApp {
    name:String,
    pv:Rc<dyn Gateway>,
}

impl PvApp {

    pub fn new(name:&str, pv:Rc<dyn Gateway>) -> Self {
        Self {
            name: name.to_string(),
            pv,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gateway(&self) -> &Rc<dyn Gateway> {
        &self.pv
    }

    pub fn get_param(&self, param:&str) -> Result<PvValue> {
        Ok(PvValue::parse(&self.get_param_raw(param)?))
    }

    /// parameter text as pvcmd returned it
    pub fn get_param_raw(&self, param:&str) -> Result<String> {
        self.pv.run(&["-get",&self.name,param])
    }

    pub fn set_param<T:Display>(&self, param:&str, value:T) -> Result<()> {
        let value = value.to_string();
        self.pv.run(&["-set",&self.name,param,&value])?;
        Ok(())
    }

    /// the remote gui doesn't refresh its caches on its own
    pub fn sync(&self, path:Option<&str>) -> Result<()> {
        info!("[{}] Sync({:?})",self.name,path);
        self.pv.run(&["-s",&self.name])?;
        if let Some(path) = path {
            self.pv.run(&["-s",path])?;
        }
        Ok(())
    }

    /// send command to app and wait for the result
    pub fn command(&self, cmd:&[&str]) -> Result<String> {
        let mut args = vec!["-a",self.name.as_str(),"-r"];
        args.extend_from_slice(cmd);
        let res = self.pv.run(&args)?;
        info!("[{}] Command {:?}->{}",self.name,cmd,res);
        self.sync(None)?;
        Ok(res)
    }

    /// send command to app without asking for a result
    pub fn command_quiet(&self, cmd:&[&str]) -> Result<String> {
        info!("[{}] CommandQuiet({:?})",self.name,cmd);
        let mut args = vec!["-a",self.name.as_str()];
        args.extend_from_slice(cmd);
        let res = self.pv.run(&args)?;
        self.sync(None)?;
        Ok(res)
    }

    pub fn command_list(&self) -> Result<String> {
        self.command(&["CmdList"])
    }
}

use std::path::PathBuf;

#[derive(clap::Parser,Debug)]
#[command(name = "pvshell", about = "command line interface for ParaVision")]
pub struct PvShellArgs {
    /// toml config file
    #[arg(short, long)]
    pub config:Option<PathBuf>,
    /// write a debug log to this file
    #[arg(long)]
    pub log_file:Option<PathBuf>,
    /// run one command and exit. Without one, start the interactive shell
    #[command(subcommand)]
    pub action:Option<Action>,
}

/// one line typed at the interactive prompt
#[derive(clap::Parser,Debug)]
#[command(name = "pvshell", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub action:Action,
}

#[derive(clap::Subcommand,Debug,PartialEq)]
pub enum Action {
    /// print info about the current system
    System,
    /// list the objects in the scan list
    Ls,
    /// list the commands scan control accepts
    Man,
    /// print some info about the current scan
    Info,
    /// print path of current Scan/Reco
    Pwd,
    /// toggle echoing of every pvcmd call
    Verbose,
    /// delete the current Scan
    Rm,
    /// print the current study, or create one from key=value fields
    Study(StudyArgs),
    /// clone the current object
    Clone,
    /// export the current object to TopSpin
    Export,
    /// select an object by path or experiment number
    Sel(SelArgs),
    /// select an experiment number in the current study
    Cd(CdArgs),
    /// print a parameter of the current object
    P(ParamArgs),
    /// set a parameter of the current object
    Set(SetArgs),
    /// traffic light
    Start,
    /// traffic light stop
    Stop,
    /// undo a Scan or a Reco
    Undo(UndoArgs),
    Gop,
    Gsp,
    /// run an adjustment: RCVR, FREQ, SHIM or TRANSM
    Adjust(AdjustArgs),
    /// copy the current geometry to the clipboard
    Getgeom,
    /// apply the clipboard geometry to the current object
    Setgeom,
    /// quit ParaVision
    Kill,
    Quit,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct StudyArgs {
    /// subjectid=..., studyname=..., weight=...
    pub fields:Vec<String>,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct SelArgs {
    pub target:String,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct CdArgs {
    pub expno:u32,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct ParamArgs {
    pub name:String,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct SetArgs {
    pub name:String,
    #[arg(required = true, allow_hyphen_values = true)]
    pub value:Vec<String>,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct UndoArgs {
    /// Scan or Reco
    pub what:Option<String>,
}

#[derive(clap::Args,Debug,PartialEq)]
pub struct AdjustArgs {
    pub kind:String,
    /// Standard or Current
    pub category:Option<String>,
}

/// split key=value study fields
pub fn study_fields(fields:&[String]) -> Result<Vec<(&str,&str)>,String> {
    fields.iter().map(|f| match f.split_once('=') {
        Some((k,v)) if !k.is_empty() => Ok((k,v)),
        _=> Err(format!("study fields must be key=value, got '{}'",f))
    }).collect()
}

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use crate::error::{PvError, Result};

/// Transport to the ParaVision applications. Every call is one synchronous request.
pub trait Gateway {
    fn run(&self, args:&[&str]) -> Result<String>;

    /// echo requests and responses to stdout
    fn set_verbose(&self, _verbose:bool) {}

    fn is_verbose(&self) -> bool {
        false
    }
}

/// Runs the pvcmd helper once per request.
pub struct PvCmdProcess {
    binary:PathBuf,
    verbose:Cell<bool>,
}

impl PvCmdProcess {

    pub fn new(binary:&Path) -> Self {
        Self {
            binary: binary.to_owned(),
            verbose: Cell::new(false),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Gateway for PvCmdProcess {

    fn run(&self, args:&[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        debug!("#{:?}",cmd);
        let out = cmd.output().map_err(|e| PvError::Launch {
            binary: self.binary.clone(),
            source: e
        })?;
        let res = String::from_utf8_lossy(&out.stdout);
        let err = String::from_utf8_lossy(&out.stderr);
        if self.verbose.get() {
            println!("pvcmd: {:?} / {} / {} / {:?}",args,res,err,out.status.code());
        }
        debug!(" ={}/{}/{:?}.",res,err,out.status.code());
        // pvcmd signals failure on stderr, the exit status alone isn't enough
        if !out.status.success() || !err.is_empty() {
            return Err(PvError::RemoteCommand {
                args: args.iter().map(|a| a.to_string()).collect(),
                status: out.status.code(),
                stderr: err.trim().to_string(),
            })
        }
        Ok(res.trim().to_string())
    }

    fn set_verbose(&self, verbose:bool) {
        self.verbose.set(verbose);
    }

    fn is_verbose(&self) -> bool {
        self.verbose.get()
    }
}

#[cfg(all(test,unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir:&Path, body:&str) -> PathBuf {
        let p = dir.join("pvcmd");
        fs::write(&p,format!("#!/bin/sh\n{}\n",body)).unwrap();
        fs::set_permissions(&p,fs::Permissions::from_mode(0o755)).unwrap();
        p
    }

    #[test]
    fn stdout_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&script(dir.path(),"printf '  {1 2 3}\\n\\n'"));
        assert_eq!(g.run(&["-get","pvScan","PVM_Matrix"]).unwrap(),"{1 2 3}");
    }

    #[test]
    fn arguments_are_passed_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&script(dir.path(),"for a in \"$@\"; do printf '[%s]' \"$a\"; done"));
        let out = g.run(&["-a","pvScan","-r","pvErrorAlert","Python","two words; $HOME"]).unwrap();
        assert_eq!(out,"[-a][pvScan][-r][pvErrorAlert][Python][two words; $HOME]");
    }

    #[test]
    fn stderr_with_zero_exit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&script(dir.path(),"echo ok; echo 'no such parameter' >&2; exit 0"));
        match g.run(&["-get","pvScan","BOGUS"]) {
            Err(PvError::RemoteCommand{stderr,status,..}) => {
                assert_eq!(stderr,"no such parameter");
                assert_eq!(status,Some(0));
            }
            other => panic!("expected remote command error, got {:?}",other)
        }
    }

    #[test]
    fn nonzero_exit_without_stderr_fails() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&script(dir.path(),"echo fine; exit 3"));
        match g.run(&["-l"]) {
            Err(PvError::RemoteCommand{stderr,status,..}) => {
                assert!(stderr.is_empty());
                assert_eq!(status,Some(3));
            }
            other => panic!("expected remote command error, got {:?}",other)
        }
    }

    #[test]
    fn stdin_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&script(dir.path(),"cat"));
        assert_eq!(g.run(&[]).unwrap(),"");
    }

    #[test]
    fn missing_binary_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let g = PvCmdProcess::new(&dir.path().join("not_there"));
        assert!(matches!(g.run(&["-l"]),Err(PvError::Launch{..})));
    }

    #[test]
    fn verbose_toggles() {
        let g = PvCmdProcess::new(Path::new("pvcmd"));
        assert!(!g.is_verbose());
        g.set_verbose(true);
        assert!(g.is_verbose());
    }
}

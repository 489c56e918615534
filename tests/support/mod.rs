/*!
Test support helpers shared across integration tests.

- FakeRuntime: records every runtime call; image presence, build and run
  outcomes are configurable
- Sandbox: temp home/cwd/launcher dirs wired into a HostEnv
*/

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use codex_box::{ContainerRuntime, HostEnv, Invocation, LaunchError, BUILD_DESCRIPTOR};

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    Ping,
    ImageExists(String),
    Build {
        image: String,
        descriptor: PathBuf,
        context: PathBuf,
    },
    Run(Vec<String>),
}

#[derive(Debug)]
pub struct FakeRuntime {
    pub available: bool,
    pub image_present: Cell<bool>,
    pub build_ok: bool,
    pub run_code: i32,
    pub calls: RefCell<Vec<Call>>,
    pub last_run_env: RefCell<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl FakeRuntime {
    pub fn new() -> Self {
        FakeRuntime {
            available: true,
            image_present: Cell::new(false),
            build_ok: true,
            run_code: 0,
            calls: RefCell::new(Vec::new()),
            last_run_env: RefCell::new(Vec::new()),
        }
    }

    pub fn with_image() -> Self {
        let rt = Self::new();
        rt.image_present.set(true);
        rt
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn builds(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Build { .. }))
            .count()
    }

    pub fn runs(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Run(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ContainerRuntime for FakeRuntime {
    fn ping(&self) -> Result<(), LaunchError> {
        self.calls.borrow_mut().push(Call::Ping);
        if self.available {
            Ok(())
        } else {
            Err(LaunchError::RuntimeUnavailable {
                reason: "Cannot connect to the Docker daemon".into(),
            })
        }
    }

    fn image_exists(&self, image: &str) -> bool {
        self.calls
            .borrow_mut()
            .push(Call::ImageExists(image.to_string()));
        self.image_present.get()
    }

    fn build(&self, image: &str, descriptor: &Path, context: &Path) -> Result<(), LaunchError> {
        self.calls.borrow_mut().push(Call::Build {
            image: image.to_string(),
            descriptor: descriptor.to_path_buf(),
            context: context.to_path_buf(),
        });
        if self.build_ok {
            self.image_present.set(true);
            Ok(())
        } else {
            Err(LaunchError::BuildFailed {
                image: image.to_string(),
                reason: "exit status: 1".into(),
            })
        }
    }

    fn run(&self, invocation: &Invocation) -> Result<i32, LaunchError> {
        let args = invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.borrow_mut().push(Call::Run(args));
        *self.last_run_env.borrow_mut() = invocation.env.clone();
        Ok(self.run_code)
    }
}

/// Scratch directories for one test: home, cwd and the launcher dir.
pub struct Sandbox {
    pub root: tempfile::TempDir,
    pub host: HostEnv,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tmpdir");
        let base = fs::canonicalize(root.path()).expect("canonical tmpdir");
        let cwd = base.join("cwd");
        let home = base.join("home");
        let launcher = base.join("launcher");
        for d in [&cwd, &home, &launcher] {
            fs::create_dir_all(d).expect("mkdir");
        }
        let host = HostEnv {
            cwd,
            home: Some(home),
            term: None,
            credentials: Default::default(),
            stdin_tty: false,
            stdout_tty: false,
            launcher_dir: Some(launcher),
            lock_dir: base.join("run"),
        };
        Sandbox { root, host }
    }

    /// Same as `new` plus a build descriptor in the launcher dir.
    pub fn with_descriptor() -> Self {
        let sb = Self::new();
        fs::write(sb.launcher_dir().join(BUILD_DESCRIPTOR), "FROM scratch\n").expect("write");
        sb
    }

    pub fn base(&self) -> PathBuf {
        fs::canonicalize(self.root.path()).expect("canonical tmpdir")
    }

    pub fn home(&self) -> &Path {
        self.host.home.as_deref().expect("home")
    }

    pub fn launcher_dir(&self) -> &Path {
        self.host.launcher_dir.as_deref().expect("launcher dir")
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let p = self.base().join(rel);
        fs::create_dir_all(&p).expect("mkdir");
        p
    }
}

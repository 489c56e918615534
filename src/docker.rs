#![allow(clippy::module_name_repetitions)]
//! Container runtime seam: image gate, run invocation assembly and the docker CLI backend.

pub mod env;
pub mod images;
pub mod mounts;
pub mod run;
pub mod runtime;

pub use images::{ensure_image, must_build};
pub use mounts::{collect_mounts, context_file, Mount};
pub use run::{container_command, Invocation};
pub use runtime::{exit_code_of, ContainerRuntime, DockerCli};

//! C/C++ build system.
//!
//! This module implements toolchain detection, flag assembly, build
//! planning and the native compiler driver.

pub mod executor;
pub mod flags;
pub mod native;
pub mod plan;
pub mod toolchain;

pub use executor::BuildExecutor;
pub use flags::{assemble_flags, FlagSet};
pub use native::NativeBuilder;
pub use plan::{BuildPlan, BuildStep};
pub use toolchain::{
    detect_toolchain, CommandSpec, FlagStyle, GccToolchain, MsvcToolchain, Toolchain,
    ToolchainDescriptor,
};

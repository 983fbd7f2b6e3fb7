//! wizard-core
//!
//! Runtime of the study wizard: page navigation, per-page validation, local
//! persistence and resume, response collection and export.
//! Depends on wizard-domain. No terminal I/O and no concrete storage backend;
//! hosts plug in through [`WizardHost`] and [`ProgressStore`].

pub mod autosave;
pub mod collector;
pub mod error;
pub mod navigator;
pub mod registry;
pub mod resume;
pub mod session;
pub mod storage;
pub mod surface;
pub mod time;
pub mod validator;

pub use autosave::*;
pub use collector::*;
pub use error::CoreError;
pub use navigator::*;
pub use registry::*;
pub use resume::*;
pub use session::*;
pub use storage::*;
pub use surface::*;
pub use time::*;
pub use validator::*;

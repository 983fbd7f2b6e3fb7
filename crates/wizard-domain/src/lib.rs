//! wizard-domain
//!
//! Pure data models for the study wizard: the form description document, the
//! rendered answer widgets, and the records exchanged with storage and export.
//! No I/O, no terminal, no storage.

pub mod answer;
pub mod form;
pub mod naming;
pub mod widget;

pub use answer::*;
pub use form::*;
pub use naming::*;
pub use widget::*;

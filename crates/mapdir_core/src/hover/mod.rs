//! Hover reconciliation.
//!
//! `timer` provides keyed one-shot timers with cancel-on-supersede
//! semantics; `reconciler` builds the per-record select/deselect state
//! machine on top of them. Nothing here touches the rendering surface.

pub mod reconciler;
pub mod timer;

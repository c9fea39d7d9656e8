//! execution — explicit worker pool and cooperative cancellation.
//!
//! Purpose
//! -------
//! Provide the handle every parallel computation in this crate receives:
//! a fixed-size `rayon` thread pool plus a shared cancellation flag. No
//! computation reaches for an ambient global executor; callers build an
//! [`ExecContext`] once and pass it into measurement and bootstrap routines.
//!
//! Key behaviors
//! -------------
//! - [`ExecContext::install`] runs fork-join work on the owned pool.
//! - [`CancelFlag`] is checked at each unit boundary (grid row, feature
//!   batch, bootstrap iteration); units that already started finish,
//!   pending units are skipped and the caller reports `Cancelled`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All work units are CPU bound and never block on I/O.
//! - Reductions performed inside the pool are commutative and associative,
//!   so results do not depend on which worker finishes first.

pub mod context;

pub use self::context::{CancelFlag, ExecContext, ExecError};

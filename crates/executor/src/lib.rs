//! Yannakakis Executor Library
//!
//! Evaluates acyclic join trees with the Yannakakis algorithm:
//! * per-node selections,
//! * a bottom-up then a top-down semi-join pass ([`Reducer`]),
//! * a post-order materializing equi-join ([`Joiner`]),
//! * an optional final projection.
//!
//! [`Processor`] drives the phases and reports them to a
//! [`profiler::Observer`]; results leave through a [`ResultSink`].

pub mod error;
pub mod joiner;
pub mod options;
pub mod processor;
pub mod reducer;
pub mod sink;

pub use error::{ExecutorError, Result};
pub use joiner::Joiner;
pub use options::ProcessOptions;
pub use processor::{ProcessOutput, Processor};
pub use reducer::Reducer;
pub use sink::{JsonDirSink, ResultSink, StdoutSink};

//! Operation taxonomy.
//!
//! The fixed vocabulary of mixing operations, their parameter records and
//! defaults, and the mastering sub-chain a `Master` operation expands to.

mod mastering;
mod model;

pub use mastering::{MasterStage, MasteringChain};
pub use model::{
    CompressParams, EqParams, Operation, OperationKind, ReverbParams, VolumeParams, WidthParams,
};

//! Chain-facing pieces of the gateway portal: the RPC Selector (spec.md
//! §4.2) and the Name Resolver (spec.md §4.3).

mod base36;
mod resolver;
mod rpc;
mod wire;

pub use base36::{base36_to_hex, hex_to_base36};
pub use resolver::{NameResolver, ResolutionUnavailable};
pub use rpc::{RpcCallError, RpcResult, RpcSelector};
pub use wire::{BcsData, DisplayData, JsonRpcRequest, JsonRpcResponse, NameRecord, ObjectData, ObjectResponse};

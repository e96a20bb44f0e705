//! Site-facing pieces of the gateway portal: the Resource Fetcher (spec.md
//! §4.4), the Router (§4.5), and the Quilt Patch ID Codec (§4.6).

mod dynamic_field;
mod fetcher;
mod quilt;
mod resource;
mod routes;

pub use dynamic_field::{derive_dynamic_field_id, derive_resource_field_id, derive_routes_field_id};
pub use fetcher::{fetch_resource, RedirectState, ResolvedResource};
pub use quilt::{decode_patch_id, derive_patch_id, QuiltInternalId};
pub use resource::{Range, Resource, ResourcePath, Routes};
pub use routes::{get_routes, RoutingTable};

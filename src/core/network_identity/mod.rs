//! Best-effort geographic label for the server's default address.
//!
//! Private addresses are swapped for the local host name, names are resolved
//! over DNS-over-HTTPS, and the resulting IPv4 literal is looked up in a
//! geo-IP service. Failures surface as sentinel [`LocationRecord`]s.

pub mod address;
pub mod dns;
pub mod geo;
mod http;
pub mod identity;
pub mod location;
pub mod pipeline;
pub mod slot;

pub use address::{is_local, is_quad_shaped};
pub use dns::{parse_dns_response, DohResolver, NameResolver};
pub use geo::{parse_geo_response, GeoLocator, IpApiLocator};
pub use identity::{LocalIdentityProvider, StaticIdentity, SystemIdentity};
pub use location::{LocationRecord, Sentinel};
pub use pipeline::LocationResolver;
pub use slot::{LocationSlot, LocationWatcher};

pub mod decay;
pub mod features;
pub mod http;
pub mod memory;
pub mod pipeline;
pub mod point;
pub mod store;

pub use decay::*;
pub use features::*;
pub use http::*;
pub use memory::*;
pub use pipeline::*;
pub use point::*;
pub use store::*;

pub mod profile_handlers;
pub mod search_handlers;
pub mod system_handlers;

pub use profile_handlers::*;
pub use search_handlers::*;
pub use system_handlers::*;

mod config;
mod docs;
mod ingest;
mod remove;
mod status;

pub use config::{ConfigCommand, handle_config};
pub use docs::handle_docs;
pub use ingest::{IngestArgs, handle_ingest};
pub use remove::{RemoveArgs, handle_remove};
pub use status::handle_status;

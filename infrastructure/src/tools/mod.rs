//! Built-in tool implementations
//!
//! Concrete tools the runner can invoke locally, grouped by category:
//! filesystem (`file`), code exploration (`search`), system (`command`),
//! and network (`mesh`, feature-gated). Each module exposes name
//! constants, `*_definition()` builders, and `execute_*` functions.

pub mod command;
pub mod file;
pub mod search;

#[cfg(feature = "mesh-tools")]
pub mod mesh;

mod runner;

pub use runner::LocalToolRunner;

use weave_domain::ToolCatalog;

/// The full built-in catalog registered at startup
pub fn default_catalog() -> ToolCatalog {
    let catalog = ToolCatalog::new()
        .register(file::read_file_definition())
        .register(file::write_file_definition())
        .register(file::list_dir_definition())
        .register(search::glob_search_definition())
        .register(search::grep_search_definition())
        .register(command::run_command_definition());

    #[cfg(feature = "mesh-tools")]
    let catalog = catalog
        .register(mesh::web_fetch_definition())
        .register(mesh::mesh_send_definition())
        .register(mesh::mesh_query_definition());

    catalog
}

/// Catalog restricted to tools that never mutate anything
pub fn read_only_catalog() -> ToolCatalog {
    let catalog = ToolCatalog::new()
        .register(file::read_file_definition())
        .register(file::list_dir_definition())
        .register(search::glob_search_definition())
        .register(search::grep_search_definition());

    #[cfg(feature = "mesh-tools")]
    let catalog = catalog.register(mesh::mesh_query_definition());

    catalog
}

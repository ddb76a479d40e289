//! SeaORM-backed query functions, wrapped by the repository implementations.

pub mod interface_info_service;

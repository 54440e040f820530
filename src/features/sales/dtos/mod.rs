mod sale_dto;

pub use sale_dto::*;

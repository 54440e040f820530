mod cart;

pub use cart::*;

mod cart_sweeper;

pub use cart_sweeper::CartSweeper;

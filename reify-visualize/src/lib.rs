pub mod visualize;

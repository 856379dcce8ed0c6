pub mod bitpacking;

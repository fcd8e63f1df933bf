pub mod fbp;

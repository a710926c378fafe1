pub mod company;
pub mod errors;
pub mod ports;
pub mod price_list;
pub mod product;

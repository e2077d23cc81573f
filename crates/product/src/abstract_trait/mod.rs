pub mod product;
pub mod storage;

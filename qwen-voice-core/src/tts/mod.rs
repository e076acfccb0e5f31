pub mod dashscope;
pub mod mock;
pub mod provider;
pub mod types;

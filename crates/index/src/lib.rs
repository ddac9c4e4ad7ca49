pub mod cache;
pub mod indexing;
pub mod matching;
pub mod rename;
pub mod resource;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod tests;

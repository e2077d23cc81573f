mod command;
mod query;

pub use self::command::{
    DynProductCommandRepository, MockProductCommandRepositoryTrait, ProductCommandRepositoryTrait,
};
pub use self::query::{
    DynProductQueryRepository, MockProductQueryRepositoryTrait, ProductQueryRepositoryTrait,
};

mod local;

pub use self::local::LocalImageStorage;

mod matching;
pub use matching::ValueMatchStrategy;

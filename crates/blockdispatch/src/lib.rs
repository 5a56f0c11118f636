pub use blockdispatch_core::*;

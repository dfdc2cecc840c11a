// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod model;
pub mod sort;

pub use filter::*;
pub use model::*;
pub use sort::*;

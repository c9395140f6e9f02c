// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod processor;

pub use controller::{Controller, Presenter};
pub use processor::EventProcessor;

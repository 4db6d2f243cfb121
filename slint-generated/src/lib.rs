#![no_std]

extern crate alloc;

slint::include_modules!();

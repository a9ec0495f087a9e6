mod blip;

pub use blip::*;

pub mod bigpoly;
pub mod fft;
pub mod gadget;
pub mod module;
pub mod poly;
pub mod random;
pub mod torus;

pub use bigpoly::*;
pub use fft::*;
pub use gadget::*;
pub use module::*;
pub use poly::*;
pub use random::*;
pub use torus::*;

pub mod amplitude;
pub mod bundle;
pub mod command;
pub mod config;
pub mod constants;
pub mod driver;
pub mod easing;
pub mod engine;
pub mod error;
pub mod interpolate;
pub mod modulate;
pub mod registry;
pub mod transition;
pub mod uniforms;

pub use amplitude::*;
pub use bundle::ParameterBundle;
pub use command::*;
pub use config::*;
pub use driver::*;
pub use easing::Easing;
pub use engine::*;
pub use error::*;
pub use interpolate::*;
pub use modulate::*;
pub use registry::*;
pub use transition::*;
pub use uniforms::*;

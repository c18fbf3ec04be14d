pub mod pipeline;
pub mod png_codec;
pub mod session;

pub use pipeline::Pipeline;
pub use session::EditSession;

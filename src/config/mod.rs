mod render_defaults;

pub use render_defaults::{RenderDefaults, RenderDefaultsError};

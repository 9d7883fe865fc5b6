//! Render: turns parsed records into coloured text lines.

pub mod color;
pub mod line;
pub mod template;

pub use color::{parse_color, ColorMode, ColorName, Colorizer, Palette, Rgb};
pub use line::{LineRenderer, RenderOptions};
pub use template::MessageTemplate;

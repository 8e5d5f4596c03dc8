//! Output options for SVG documents

/// How sheets and previews are written
#[derive(Debug, Clone, PartialEq)]
pub struct SvgConfig {
    /// Emit the XML declaration (off when the SVG is inlined into HTML)
    pub standalone: bool,
    pub pretty_print: bool,
    /// Prepended to every class name, e.g. `cs-unit`
    pub class_prefix: Option<String>,
    /// Stroke color of registration marks
    pub mark_color: String,
    /// Write loaded fonts as `@font-face` rules; off leaves font resolution to the viewer
    pub embed_fonts: bool,
    /// Outline trim and bleed boxes for proofing
    pub show_guides: bool,
    /// Document `<title>`
    pub title: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("cs-".to_string()),
            mark_color: "#000000".to_string(),
            embed_fonts: true,
            show_guides: false,
            title: None,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_mark_color(mut self, color: impl Into<String>) -> Self {
        self.mark_color = color.into();
        self
    }

    pub fn with_embedded_fonts(mut self, embed: bool) -> Self {
        self.embed_fonts = embed;
        self
    }

    /// Draw trim (blue) and bleed (magenta) outlines on every card
    pub fn with_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

//! Fonts, images and text measurement.
//!
//! Widgets never talk to a loader directly. They go through [`Resources`],
//! which caches lookups by name and substitutes the default font when a
//! requested one is missing.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use tracing::warn;
use unicode_width::UnicodeWidthStr;

use crate::geom::Expanse;

/// Opaque font identifier issued by a [`ResourceLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

impl FontHandle {
    /// The font every loader must be able to draw with.
    pub const DEFAULT: Self = Self(0);
}

/// Opaque image identifier issued by a [`ResourceLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Source of fonts and images, and the authority on text extents.
pub trait ResourceLoader {
    /// Resolve a font by name.
    fn font(&self, name: &str) -> Option<FontHandle>;

    /// Resolve an image by name.
    fn image(&self, name: &str) -> Option<ImageHandle>;

    /// The size of `text` set in `font` at `size` points.
    fn text_extent(&self, font: FontHandle, size: f32, text: &str) -> Expanse;
}

/// A loader with a single fixed-advance font and no images.
///
/// Each terminal column is half the point size wide and a line is
/// `1.25 * size` tall.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonospaceLoader;

impl ResourceLoader for MonospaceLoader {
    fn font(&self, name: &str) -> Option<FontHandle> {
        (name == "default").then_some(FontHandle::DEFAULT)
    }

    fn image(&self, _name: &str) -> Option<ImageHandle> {
        None
    }

    fn text_extent(&self, _font: FontHandle, size: f32, text: &str) -> Expanse {
        let columns = text.width() as f32;
        Expanse::new(columns * size * 0.5, size * 1.25)
    }
}

/// Cached access to a [`ResourceLoader`].
pub struct Resources {
    /// Backing loader.
    loader: Box<dyn ResourceLoader>,
    /// Resolved fonts by name.
    fonts: RefCell<HashMap<String, FontHandle>>,
    /// Resolved images by name. Misses are cached too.
    images: RefCell<HashMap<String, Option<ImageHandle>>>,
    /// Names we have already warned about.
    warned: RefCell<HashSet<String>>,
}

impl Resources {
    /// Wrap a loader.
    pub fn new(loader: impl ResourceLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            fonts: RefCell::default(),
            images: RefCell::default(),
            warned: RefCell::default(),
        }
    }

    /// Resolve a font, falling back to [`FontHandle::DEFAULT`].
    pub fn font(&self, name: &str) -> FontHandle {
        if let Some(font) = self.fonts.borrow().get(name) {
            return *font;
        }
        let font = self.loader.font(name).unwrap_or_else(|| {
            self.warn_once(name, "font");
            FontHandle::DEFAULT
        });
        self.fonts.borrow_mut().insert(name.to_string(), font);
        font
    }

    /// Resolve an image. Missing images resolve to `None` and are logged
    /// once.
    pub fn image(&self, name: &str) -> Option<ImageHandle> {
        if let Some(image) = self.images.borrow().get(name) {
            return *image;
        }
        let image = self.loader.image(name);
        if image.is_none() {
            self.warn_once(name, "image");
        }
        self.images.borrow_mut().insert(name.to_string(), image);
        image
    }

    /// Measure a run of text.
    pub fn text_extent(&self, font: FontHandle, size: f32, text: &str) -> Expanse {
        self.loader.text_extent(font, size, text)
    }

    /// Log a missing resource the first time it is requested.
    fn warn_once(&self, name: &str, kind: &str) {
        if self.warned.borrow_mut().insert(format!("{kind}:{name}")) {
            warn!(name, kind, "resource not found, using fallback");
        }
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(MonospaceLoader)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    /// Counts font lookups that reach the loader.
    struct CountingLoader {
        /// Lookups so far.
        lookups: Rc<Cell<usize>>,
    }

    impl ResourceLoader for CountingLoader {
        fn font(&self, name: &str) -> Option<FontHandle> {
            self.lookups.set(self.lookups.get() + 1);
            (name == "mono").then_some(FontHandle(7))
        }

        fn image(&self, _name: &str) -> Option<ImageHandle> {
            None
        }

        fn text_extent(&self, _font: FontHandle, _size: f32, _text: &str) -> Expanse {
            Expanse::zero()
        }
    }

    #[test]
    fn fonts_are_cached_with_fallback() {
        let lookups = Rc::new(Cell::new(0));
        let res = Resources::new(CountingLoader {
            lookups: lookups.clone(),
        });
        assert_eq!(res.font("mono"), FontHandle(7));
        assert_eq!(res.font("mono"), FontHandle(7));
        assert_eq!(res.font("missing"), FontHandle::DEFAULT);
        assert_eq!(res.font("missing"), FontHandle::DEFAULT);
        assert_eq!(lookups.get(), 2);
    }

    #[test]
    fn monospace_extent() {
        let res = Resources::default();
        let font = res.font("default");
        assert_eq!(res.text_extent(font, 12.0, "abcd"), Expanse::new(24.0, 15.0));
        assert_eq!(res.text_extent(font, 12.0, ""), Expanse::new(0.0, 15.0));
        assert_eq!(res.image("arrow"), None);
    }
}

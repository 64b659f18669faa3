// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node style: recognized drawing fields plus an open extension map.
//!
//! ## Copy before render
//!
//! A repaint pass never hands a node its canonical [`Style`]. It hands over
//! [`Style::render_copy`], a deep copy, so render code cannot corrupt shared state.
//!
//! Cached image handles are the exception. The decoded image in [`FillImage::image`] is
//! re-attached to the copy rather than copied. Anywhere else, a [`StyleValue::Handle`]
//! makes the copy fail with [`StyleError::NotClonable`]; keep handles out of
//! [`Style::extra`] or move them into the fill image slot.
//!
//! ```
//! use strata_scene::style::{ImageHandle, Style, StyleValue};
//!
//! let plain = Style::default().with_extra("label", StyleValue::Text("depot".into()));
//! assert!(plain.render_copy().is_ok());
//!
//! let leaky = Style::default().with_extra("icon", StyleValue::Handle(ImageHandle::new(42_u8)));
//! assert!(leaky.render_copy().is_err());
//! ```

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use peniko::Color;

use crate::error::StyleError;

/// Shared, opaque handle to a decoded image (or any other cached resource).
///
/// Cloning the handle shares the resource.
#[derive(Clone)]
pub struct ImageHandle(Rc<dyn Any>);

impl ImageHandle {
    /// Wrap a resource.
    pub fn new<T: Any>(resource: T) -> Self {
        Self(Rc::new(resource))
    }

    /// Borrow the resource as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// True if both handles share the same resource.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageHandle").finish_non_exhaustive()
    }
}

/// Image fill: a source reference plus its decoded, cached form.
#[derive(Debug, Default)]
pub struct FillImage {
    /// Where the image comes from (URL, asset key).
    pub source: String,
    /// Decoded image, once available. Shared between the style and its render copies.
    pub image: Option<ImageHandle>,
}

/// A value in the open part of a style.
#[derive(Debug)]
pub enum StyleValue {
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// A color.
    Color(Color),
    /// A list of values.
    List(Vec<StyleValue>),
    /// A nested map.
    Map(BTreeMap<String, StyleValue>),
    /// A shared handle. Not copyable for rendering.
    Handle(ImageHandle),
}

impl StyleValue {
    fn try_copy(&self, path: &str) -> Result<Self, StyleError> {
        Ok(match self {
            Self::Bool(b) => Self::Bool(*b),
            Self::Number(n) => Self::Number(*n),
            Self::Text(s) => Self::Text(s.clone()),
            Self::Color(c) => Self::Color(*c),
            Self::List(items) => Self::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| v.try_copy(&format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Map(map) => Self::Map(copy_map(map, Some(path))?),
            Self::Handle(_) => {
                return Err(StyleError::NotClonable {
                    key: String::from(path),
                });
            }
        })
    }
}

fn copy_map(
    map: &BTreeMap<String, StyleValue>,
    prefix: Option<&str>,
) -> Result<BTreeMap<String, StyleValue>, StyleError> {
    let mut out = BTreeMap::new();
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        out.insert(key.clone(), value.try_copy(&path)?);
    }
    Ok(out)
}

/// Drawing configuration of a node.
#[derive(Debug)]
pub struct Style {
    /// Outline color. Transparent by default.
    pub stroke_color: Color,
    /// Outline width in surface pixels.
    pub stroke_width: f64,
    /// Solid fill, if any.
    pub fill_color: Option<Color>,
    /// Image fill, if any.
    pub fill_image: Option<FillImage>,
    /// Keys this crate does not interpret, passed through to render code.
    pub extra: BTreeMap<String, StyleValue>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: Color::from_rgba8(0, 0, 0, 0),
            stroke_width: 1.0,
            fill_color: None,
            fill_image: None,
            extra: BTreeMap::new(),
        }
    }
}

impl Style {
    /// Set an extension entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: StyleValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up an extension entry.
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.extra.get(key)
    }

    /// Deep copy for one render call.
    ///
    /// The fill image handle is re-attached, not copied. Any other handle fails.
    pub fn render_copy(&self) -> Result<Self, StyleError> {
        let fill_image = self.fill_image.as_ref().map(|fill| FillImage {
            source: fill.source.clone(),
            image: fill.image.clone(),
        });
        Ok(Self {
            stroke_color: self.stroke_color,
            stroke_width: self.stroke_width,
            fill_color: self.fill_color,
            fill_image,
            extra: copy_map(&self.extra, None)?,
        })
    }
}
